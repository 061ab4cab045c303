pub mod auth;
pub mod classes;
mod entry;
pub mod enrollments;
pub mod extract;
pub mod health;
pub mod validation;

pub use entry::{API_PREFIX, app, router};
