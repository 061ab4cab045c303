mod class;
mod enrollment;
mod user;

pub use class::{Class, ClassResponse, CreateClassInput};
pub use enrollment::{Enrollment, EnrollmentResponse, EnrollmentWithClass, StudentInClass};
pub use user::{AuthSession, LoginInput, RegisterInput, User, UserResponse};
