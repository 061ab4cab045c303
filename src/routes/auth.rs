use std::sync::Arc;

use axum::{Router, extract::State, routing::post};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::password::{MAX_PASSWORD_BYTES, MIN_PASSWORD_BYTES},
    models::{AuthSession, LoginInput, RegisterInput, UserResponse},
    response::{ApiResult, JsonApiResponse},
    routes::{
        extract::{Validate, ValidJson},
        validation,
    },
    state::AppState,
};

const MAX_EMAIL_CHARS: usize = 255;
const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        let email = validation::required("email", &self.email)?;
        validation::email(email)?;
        validation::char_len("email", email, 0, MAX_EMAIL_CHARS)?;

        let password = validation::required("password", &self.password)?;
        validation::byte_len("password", password, MIN_PASSWORD_BYTES, MAX_PASSWORD_BYTES)?;

        let name = validation::required("name", &self.name)?;
        validation::char_len("name", name, MIN_NAME_CHARS, MAX_NAME_CHARS)?;

        let role = validation::required("role", &self.role)?;
        validation::role("role", role)?;
        Ok(())
    }
}

impl TryFrom<RegisterRequest> for RegisterInput {
    type Error = String;

    fn try_from(body: RegisterRequest) -> Result<Self, Self::Error> {
        let role = validation::role("role", body.role.as_deref().unwrap_or_default())?;
        Ok(Self {
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
            name: body.name.unwrap_or_default(),
            role,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        let email = validation::required("email", &self.email)?;
        validation::email(email)?;
        validation::required("password", &self.password)?;
        Ok(())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> ApiResult<UserResponse> {
    let input = RegisterInput::try_from(body).map_err(crate::error::AppError::bad_request)?;
    let user = state.services.auth().register(input).await?;
    info!(user_id = %user.id, role = %user.role, "user registered");
    JsonApiResponse::created(user.into())
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<AuthSession> {
    let session = state
        .services
        .auth()
        .login(LoginInput {
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
        })
        .await?;
    JsonApiResponse::ok(session)
}
