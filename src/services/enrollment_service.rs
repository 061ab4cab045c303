use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{ClassRepository, EnrollmentRepository, dao::DaoLayerError},
    models::{Enrollment, EnrollmentWithClass, StudentInClass},
    services::{ServiceError, code::normalize_code},
};

#[derive(Clone)]
pub struct EnrollmentService {
    classes: Arc<dyn ClassRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            classes,
            enrollments,
        }
    }

    pub async fn enroll_by_code(
        &self,
        code: &str,
        student_id: Uuid,
    ) -> Result<Enrollment, ServiceError> {
        let class = self
            .classes
            .find_by_code(&normalize_code(code))
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    ServiceError::ClassNotFound
                } else {
                    ServiceError::repository("find class by code")(err)
                }
            })?;

        if self.is_enrolled(class.id, student_id).await? {
            return Err(ServiceError::AlreadyEnrolled);
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            class_id: class.id,
            student_id,
            enrolled_at: Utc::now(),
        };

        match self.enrollments.create(&enrollment).await {
            Ok(()) => Ok(enrollment),
            Err(DaoLayerError::DuplicateKey { .. }) => Err(ServiceError::AlreadyEnrolled),
            Err(err) => Err(ServiceError::repository("create enrollment")(err)),
        }
    }

    pub async fn get_student_classes(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentWithClass>, ServiceError> {
        self.enrollments
            .classes_for_student(student_id)
            .await
            .map_err(ServiceError::repository("list student classes"))
    }

    /// Roster by name. Callers decide who may see it.
    pub async fn get_class_students(
        &self,
        class_id: Uuid,
    ) -> Result<Vec<StudentInClass>, ServiceError> {
        match self.classes.find_by_id(class_id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => return Err(ServiceError::ClassNotFound),
            Err(err) => return Err(ServiceError::repository("load class")(err)),
        }

        self.enrollments
            .students_in_class(class_id)
            .await
            .map_err(ServiceError::repository("list class students"))
    }

    pub async fn unenroll(&self, class_id: Uuid, student_id: Uuid) -> Result<(), ServiceError> {
        self.enrollments
            .delete(class_id, student_id)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    ServiceError::NotEnrolled
                } else {
                    ServiceError::repository("delete enrollment")(err)
                }
            })
    }

    pub async fn is_enrolled(&self, class_id: Uuid, student_id: Uuid) -> Result<bool, ServiceError> {
        self.enrollments
            .is_enrolled(class_id, student_id)
            .await
            .map_err(ServiceError::repository("check enrollment"))
    }
}
