pub mod base;
pub mod class_dao;
mod context;
pub mod enrollment_dao;
pub mod error;
pub mod user_dao;

pub use base::DaoBase;
pub use class_dao::ClassDao;
pub use context::DaoContext;
pub use enrollment_dao::EnrollmentDao;
pub use error::{DaoLayerError, DaoResult};
pub use user_dao::UserDao;
