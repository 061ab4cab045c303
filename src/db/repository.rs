use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::dao::DaoResult;
use crate::models::{Class, Enrollment, EnrollmentWithClass, StudentInClass, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> DaoResult<()>;
    async fn find_by_email(&self, email: &str) -> DaoResult<User>;
    async fn find_by_id(&self, id: Uuid) -> DaoResult<User>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: &Class) -> DaoResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DaoResult<Class>;
    async fn find_by_code(&self, code: &str) -> DaoResult<Class>;
    /// Newest first.
    async fn list_by_teacher(&self, teacher_id: Uuid) -> DaoResult<Vec<Class>>;
    /// Removes the class and every enrollment in it, atomically.
    async fn delete(&self, id: Uuid) -> DaoResult<()>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn create(&self, enrollment: &Enrollment) -> DaoResult<()>;
    async fn is_enrolled(&self, class_id: Uuid, student_id: Uuid) -> DaoResult<bool>;
    async fn delete(&self, class_id: Uuid, student_id: Uuid) -> DaoResult<()>;
    /// Most recent enrollment first, ties by enrollment id.
    async fn classes_for_student(&self, student_id: Uuid) -> DaoResult<Vec<EnrollmentWithClass>>;
    /// Ordered by student name, ties by enrollment id.
    async fn students_in_class(&self, class_id: Uuid) -> DaoResult<Vec<StudentInClass>>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> DaoResult<()>;
}

/// Every store capability the services need, behind trait objects so the
/// backing store can be swapped.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub health: Arc<dyn StoreHealth>,
}
