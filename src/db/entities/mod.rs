#[allow(unused_imports)]
pub mod prelude {
    pub use super::class::Entity as Class;
    pub use super::enrollment::Entity as Enrollment;
    pub use super::user::Entity as User;
}

pub mod class;
pub mod enrollment;
pub mod user;
