mod auth;
mod guards;
mod json_error;
mod panic;
mod role;

pub use auth::require_auth;
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
pub use role::{RequireRole, RequireRoleLayer};
