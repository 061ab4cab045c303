use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::{ClassDao, DaoBase, DaoLayerError, DaoResult, EnrollmentDao, UserDao};
use crate::db::repository::{Repositories, StoreHealth};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn class(&self) -> ClassDao {
        DaoBase::new(&self.db)
    }

    pub fn enrollment(&self) -> EnrollmentDao {
        DaoBase::new(&self.db)
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.user()),
            classes: Arc::new(self.class()),
            enrollments: Arc::new(self.enrollment()),
            health: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl StoreHealth for DaoContext {
    async fn ping(&self) -> DaoResult<()> {
        self.db.ping().await.map_err(DaoLayerError::Db)
    }
}
