use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::auth::Role;
use crate::db::entities::{prelude::User as UserEntity, user};
use crate::db::repository::UserRepository;
use crate::models::User;

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = UserEntity;
    const ENTITY: &'static str = "user";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Rows carry the role as text; anything outside the enum is a decode error.
pub(crate) fn user_from_model(model: user::Model) -> DaoResult<User> {
    let role = Role::try_from(model.role.as_str()).map_err(|_| DaoLayerError::Decode {
        entity: UserDao::ENTITY,
        detail: format!("unknown role {:?}", model.role),
    })?;

    Ok(User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        name: model.name,
        role,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl UserRepository for UserDao {
    async fn create(&self, user: &User) -> DaoResult<()> {
        let active = user::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            name: Set(user.name.clone()),
            role: Set(user.role.as_str().to_string()),
            created_at: Set(user.created_at.fixed_offset()),
            ..Default::default()
        };
        self.insert_active(active).await
    }

    async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        let query = UserEntity::find().filter(user::Column::Email.eq(email));
        let model = self.fetch_one(query, format!("email={email}")).await?;
        user_from_model(model)
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<User> {
        let model = self
            .fetch_one(UserEntity::find_by_id(id), format!("id={id}"))
            .await?;
        user_from_model(model)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::UserDao;
    use crate::auth::Role;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::user;
    use crate::db::repository::UserRepository;
    use crate::models::User;

    fn ts() -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str, role: &str) -> user::Model {
        user::Model {
            id,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Ada".to_string(),
            role: role.to_string(),
            created_at: ts(),
        }
    }

    #[tokio::test]
    async fn find_by_email_maps_row_to_domain() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "a@x.io", "teacher")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let user = dao
            .find_by_email("a@x.io")
            .await
            .expect("query should succeed");
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.created_at, ts());
    }

    #[tokio::test]
    async fn find_by_email_reports_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .find_by_email("missing@x.io")
            .await
            .expect_err("lookup should fail");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unknown_role_is_a_decode_error() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "a@x.io", "admin")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao.find_by_id(id).await.expect_err("decode should fail");
        assert!(matches!(err, DaoLayerError::Decode { entity: "user", .. }));
    }

    #[tokio::test]
    async fn create_inserts_one_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = UserDao::new(&db);
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.io".to_string(),
            password_hash: "hash".to_string(),
            name: "Ada".to_string(),
            role: Role::Student,
            created_at: ts().to_utc(),
        };

        dao.create(&user).await.expect("insert should succeed");
    }

    #[tokio::test]
    async fn create_surfaces_store_failures() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let dao = UserDao::new(&db);
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.io".to_string(),
            password_hash: "hash".to_string(),
            name: "Ada".to_string(),
            role: Role::Student,
            created_at: ts().to_utc(),
        };

        let err = dao.create(&user).await.expect_err("insert should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
