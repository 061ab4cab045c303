use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{
    class, enrollment,
    prelude::{Class as ClassEntity, Enrollment as EnrollmentEntity},
};
use crate::db::repository::ClassRepository;
use crate::models::Class;

#[derive(Clone)]
pub struct ClassDao {
    db: DatabaseConnection,
}

impl DaoBase for ClassDao {
    type Entity = ClassEntity;
    const ENTITY: &'static str = "class";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub(crate) fn class_from_model(model: class::Model) -> Class {
    Class {
        id: model.id,
        name: model.name,
        code: model.code,
        teacher_id: model.teacher_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl ClassRepository for ClassDao {
    async fn create(&self, class: &Class) -> DaoResult<()> {
        let active = class::ActiveModel {
            id: Set(class.id),
            name: Set(class.name.clone()),
            code: Set(class.code.clone()),
            teacher_id: Set(class.teacher_id),
            created_at: Set(class.created_at.fixed_offset()),
            ..Default::default()
        };
        self.insert_active(active).await
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<Class> {
        self.fetch_one(ClassEntity::find_by_id(id), format!("id={id}"))
            .await
            .map(class_from_model)
    }

    async fn find_by_code(&self, code: &str) -> DaoResult<Class> {
        let query = ClassEntity::find().filter(class::Column::Code.eq(code));
        self.fetch_one(query, format!("code={code}"))
            .await
            .map(class_from_model)
    }

    async fn list_by_teacher(&self, teacher_id: Uuid) -> DaoResult<Vec<Class>> {
        let models = ClassEntity::find()
            .filter(class::Column::TeacherId.eq(teacher_id))
            .order_by_desc(class::Column::CreatedAt)
            .order_by_asc(class::Column::Id)
            .all(self.db())
            .await
            .map_err(Self::db_err)?;

        Ok(models.into_iter().map(class_from_model).collect())
    }

    async fn delete(&self, id: Uuid) -> DaoResult<()> {
        let txn = self.db().begin().await.map_err(Self::db_err)?;

        EnrollmentEntity::delete_many()
            .filter(enrollment::Column::ClassId.eq(id))
            .exec(&txn)
            .await
            .map_err(Self::db_err)?;

        let result = ClassEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(Self::db_err)?;

        // Dropping `txn` without commit rolls the enrollment delete back.
        if result.rows_affected == 0 {
            return Err(DaoLayerError::not_found(Self::ENTITY, format!("id={id}")));
        }

        txn.commit().await.map_err(Self::db_err)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::ClassDao;
    use crate::db::dao::DaoBase;
    use crate::db::entities::class;
    use crate::db::repository::ClassRepository;

    fn ts(hour: u32) -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, hour, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn class_model(teacher_id: Uuid, code: &str, hour: u32) -> class::Model {
        class::Model {
            id: Uuid::new_v4(),
            name: "Algebra".to_string(),
            code: code.to_string(),
            teacher_id,
            created_at: ts(hour),
        }
    }

    #[tokio::test]
    async fn find_by_code_returns_class() {
        let teacher_id = Uuid::new_v4();
        let model = class_model(teacher_id, "ABC234", 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .into_connection();
        let dao = ClassDao::new(&db);

        let class = dao
            .find_by_code("ABC234")
            .await
            .expect("query should succeed");
        assert_eq!(class.id, model.id);
        assert_eq!(class.teacher_id, teacher_id);
    }

    #[tokio::test]
    async fn find_by_code_reports_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<class::Model>::new()])
            .into_connection();
        let dao = ClassDao::new(&db);

        let err = dao.find_by_code("ZZZZZZ").await.expect_err("should be missing");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_by_teacher_keeps_store_order() {
        let teacher_id = Uuid::new_v4();
        let newer = class_model(teacher_id, "NEWER2", 5);
        let older = class_model(teacher_id, "OLDER2", 1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[newer.clone(), older.clone()]])
            .into_connection();
        let dao = ClassDao::new(&db);

        let classes = dao
            .list_by_teacher(teacher_id)
            .await
            .expect("query should succeed");
        let codes: Vec<_> = classes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["NEWER2", "OLDER2"]);
    }

    #[tokio::test]
    async fn delete_removes_enrollments_then_class_in_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let dao = ClassDao::new(&db);

        dao.delete(Uuid::new_v4())
            .await
            .expect("delete should succeed");

        let log = format!("{:?}", db.into_transaction_log());
        let enrollments_at = log.find("enrollments").expect("enrollment delete");
        let classes_at = log.find("classes").expect("class delete");
        assert!(enrollments_at < classes_at);
    }

    #[tokio::test]
    async fn delete_of_missing_class_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let dao = ClassDao::new(&db);

        let err = dao
            .delete(Uuid::new_v4())
            .await
            .expect_err("delete should fail");
        assert!(err.is_not_found());
    }
}
