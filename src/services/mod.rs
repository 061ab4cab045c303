pub mod auth_service;
pub mod class_service;
pub mod code;
pub mod context;
pub mod enrollment_service;
mod error;

pub use context::ServiceContext;
pub use error::ServiceError;
