use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Select};

use super::error::{DaoLayerError, DaoResult};

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model: Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity> + Send,
{
    type Entity: EntityTrait + Send + Sync;
    /// Name used in error values.
    const ENTITY: &'static str;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    fn db_err(err: sea_orm::DbErr) -> DaoLayerError {
        DaoLayerError::from_db(Self::ENTITY, err)
    }

    async fn insert_active(
        &self,
        active: <Self::Entity as EntityTrait>::ActiveModel,
    ) -> DaoResult<()> {
        Self::Entity::insert(active)
            .exec_without_returning(self.db())
            .await
            .map_err(Self::db_err)?;
        Ok(())
    }

    async fn fetch_one(
        &self,
        query: Select<Self::Entity>,
        key: String,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        query
            .one(self.db())
            .await
            .map_err(Self::db_err)?
            .ok_or(DaoLayerError::NotFound {
                entity: Self::ENTITY,
                key,
            })
    }
}
