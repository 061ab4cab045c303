use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{ClassResponse, UserResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            class_id: enrollment.class_id,
            student_id: enrollment.student_id,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

/// A student's view of one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentWithClass {
    pub id: Uuid,
    pub class: ClassResponse,
    pub enrolled_at: DateTime<Utc>,
}

/// One roster line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentInClass {
    pub id: Uuid,
    pub student: UserResponse,
    pub enrolled_at: DateTime<Utc>,
}
