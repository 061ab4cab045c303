pub mod jwt;
pub mod password;
mod types;

pub use types::{AuthUser, Claims, Role};
