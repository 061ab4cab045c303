use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::class_dao::class_from_model;
use super::user_dao::user_from_model;
use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{
    class, enrollment,
    prelude::{Class as ClassEntity, Enrollment as EnrollmentEntity, User as UserEntity},
    user,
};
use crate::db::repository::EnrollmentRepository;
use crate::models::{Enrollment, EnrollmentWithClass, StudentInClass};

#[derive(Clone)]
pub struct EnrollmentDao {
    db: DatabaseConnection,
}

impl DaoBase for EnrollmentDao {
    type Entity = EnrollmentEntity;
    const ENTITY: &'static str = "enrollment";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn dangling(enrollment_id: Uuid, missing: &str) -> DaoLayerError {
    DaoLayerError::Decode {
        entity: EnrollmentDao::ENTITY,
        detail: format!("enrollment {enrollment_id} has no {missing}"),
    }
}

fn pair_filter(class_id: Uuid, student_id: Uuid) -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(enrollment::Column::ClassId.eq(class_id))
        .add(enrollment::Column::StudentId.eq(student_id))
}

#[async_trait]
impl EnrollmentRepository for EnrollmentDao {
    async fn create(&self, enrollment: &Enrollment) -> DaoResult<()> {
        let active = enrollment::ActiveModel {
            id: Set(enrollment.id),
            class_id: Set(enrollment.class_id),
            student_id: Set(enrollment.student_id),
            enrolled_at: Set(enrollment.enrolled_at.fixed_offset()),
            ..Default::default()
        };
        self.insert_active(active).await
    }

    async fn is_enrolled(&self, class_id: Uuid, student_id: Uuid) -> DaoResult<bool> {
        let found = EnrollmentEntity::find()
            .filter(pair_filter(class_id, student_id))
            .one(self.db())
            .await
            .map_err(Self::db_err)?;
        Ok(found.is_some())
    }

    async fn delete(&self, class_id: Uuid, student_id: Uuid) -> DaoResult<()> {
        let result = EnrollmentEntity::delete_many()
            .filter(pair_filter(class_id, student_id))
            .exec(self.db())
            .await
            .map_err(Self::db_err)?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::not_found(
                Self::ENTITY,
                format!("class_id={class_id} student_id={student_id}"),
            ));
        }
        Ok(())
    }

    async fn classes_for_student(&self, student_id: Uuid) -> DaoResult<Vec<EnrollmentWithClass>> {
        let rows = EnrollmentEntity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .find_also_related(ClassEntity)
            .order_by_desc(enrollment::Column::EnrolledAt)
            .order_by_asc(enrollment::Column::Id)
            .all(self.db())
            .await
            .map_err(Self::db_err)?;

        rows.into_iter()
            .map(|(enrollment, class): (enrollment::Model, Option<class::Model>)| {
                let class = class.ok_or_else(|| dangling(enrollment.id, "class"))?;
                Ok(EnrollmentWithClass {
                    id: enrollment.id,
                    class: class_from_model(class).into(),
                    enrolled_at: enrollment.enrolled_at.with_timezone(&Utc),
                })
            })
            .collect()
    }

    async fn students_in_class(&self, class_id: Uuid) -> DaoResult<Vec<StudentInClass>> {
        let rows = EnrollmentEntity::find()
            .filter(enrollment::Column::ClassId.eq(class_id))
            .find_also_related(UserEntity)
            .order_by_asc(user::Column::Name)
            .order_by_asc(enrollment::Column::Id)
            .all(self.db())
            .await
            .map_err(Self::db_err)?;

        rows.into_iter()
            .map(|(enrollment, student): (enrollment::Model, Option<user::Model>)| {
                let student = student.ok_or_else(|| dangling(enrollment.id, "student"))?;
                Ok(StudentInClass {
                    id: enrollment.id,
                    student: user_from_model(student)?.into(),
                    enrolled_at: enrollment.enrolled_at.with_timezone(&Utc),
                })
            })
            .collect()
    }
}
