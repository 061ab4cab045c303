use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{AuthUser, Role},
    middleware::{RequireRoleLayer, require_auth},
    models::{ClassResponse, CreateClassInput, StudentInClass},
    response::{ApiResult, JsonApiResponse},
    routes::{
        extract::{ClassId, Validate, ValidJson},
        validation,
    },
    services::ServiceError,
    state::AppState,
};

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub name: Option<String>,
}

impl Validate for CreateClassRequest {
    fn validate(&self) -> Result<(), String> {
        let name = validation::required("name", &self.name)?;
        validation::char_len("name", name, MIN_NAME_CHARS, MAX_NAME_CHARS)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn teacher_only() -> RequireRoleLayer {
    RequireRoleLayer::new(&[Role::Teacher])
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/classes",
            get(list_classes)
                .post(create_class)
                .route_layer(teacher_only()),
        )
        .route(
            "/classes/{id}",
            get(get_class).merge(delete(delete_class).route_layer(teacher_only())),
        )
        .route(
            "/classes/{id}/students",
            get(class_students).route_layer(teacher_only()),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

async fn create_class(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(body): ValidJson<CreateClassRequest>,
) -> ApiResult<ClassResponse> {
    let class = state
        .services
        .classes()
        .create_class(
            user.user_id,
            CreateClassInput {
                name: body.name.unwrap_or_default(),
            },
        )
        .await?;
    JsonApiResponse::created(class.into())
}

async fn list_classes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Vec<ClassResponse>> {
    let classes = state
        .services
        .classes()
        .get_teacher_classes(user.user_id)
        .await?;
    JsonApiResponse::ok(classes.into_iter().map(ClassResponse::from).collect())
}

// Readable by any signed-in user.
async fn get_class(
    State(state): State<Arc<AppState>>,
    ClassId(id): ClassId,
) -> ApiResult<ClassResponse> {
    let class = state.services.classes().get_class(id).await?;
    JsonApiResponse::ok(class.into())
}

async fn delete_class(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ClassId(id): ClassId,
) -> ApiResult<MessageResponse> {
    state
        .services
        .classes()
        .delete_class(user.user_id, id)
        .await?;
    JsonApiResponse::ok(MessageResponse {
        message: "class deleted",
    })
}

async fn class_students(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ClassId(id): ClassId,
) -> ApiResult<Vec<StudentInClass>> {
    let class = state.services.classes().get_class(id).await?;
    if class.teacher_id != user.user_id {
        return Err(ServiceError::NotClassOwner.into());
    }

    let students = state.services.enrollments().get_class_students(id).await?;
    JsonApiResponse::ok(students)
}
