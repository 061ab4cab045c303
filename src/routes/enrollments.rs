use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{delete, get},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{AuthUser, Role},
    middleware::{RequireRoleLayer, require_auth},
    models::{EnrollmentResponse, EnrollmentWithClass},
    response::{ApiResult, JsonApiResponse},
    routes::{
        extract::{ClassId, Validate, ValidJson},
        validation,
    },
    state::AppState,
};

const MIN_CODE_CHARS: usize = 4;
const MAX_CODE_CHARS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub class_code: Option<String>,
}

impl Validate for EnrollRequest {
    fn validate(&self) -> Result<(), String> {
        let code = validation::required("class_code", &self.class_code)?;
        validation::char_len("class_code", code, MIN_CODE_CHARS, MAX_CODE_CHARS)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/enrollments", get(my_classes).post(enroll))
        .route("/enrollments/{class_id}", delete(unenroll))
        .route_layer(RequireRoleLayer::new(&[Role::Student]))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

async fn enroll(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(body): ValidJson<EnrollRequest>,
) -> ApiResult<EnrollmentResponse> {
    let code = body.class_code.unwrap_or_default();
    let enrollment = state
        .services
        .enrollments()
        .enroll_by_code(&code, user.user_id)
        .await?;
    info!(
        student_id = %enrollment.student_id,
        class_id = %enrollment.class_id,
        "student enrolled"
    );
    JsonApiResponse::created(enrollment.into())
}

async fn my_classes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Vec<EnrollmentWithClass>> {
    let classes = state
        .services
        .enrollments()
        .get_student_classes(user.user_id)
        .await?;
    JsonApiResponse::ok(classes)
}

async fn unenroll(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ClassId(class_id): ClassId,
) -> ApiResult<()> {
    state
        .services
        .enrollments()
        .unenroll(class_id, user.user_id)
        .await?;
    info!(student_id = %user.user_id, class_id = %class_id, "student unenrolled");
    JsonApiResponse::empty()
}
