use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    db::{ClassRepository, dao::DaoLayerError},
    models::{Class, CreateClassInput},
    services::{ServiceError, code::CodeGenerator},
};

pub const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct ClassService {
    classes: Arc<dyn ClassRepository>,
    codes: Arc<dyn CodeGenerator>,
}

impl ClassService {
    pub fn new(classes: Arc<dyn ClassRepository>, codes: Arc<dyn CodeGenerator>) -> Self {
        Self { classes, codes }
    }

    /// The lookup before insert only saves a round trip; the unique index on
    /// `code` is what actually rules out duplicates.
    pub async fn create_class(
        &self,
        teacher_id: Uuid,
        input: CreateClassInput,
    ) -> Result<Class, ServiceError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = match self.codes.generate() {
                Ok(code) => code,
                Err(err) => {
                    warn!(attempt, error = %err, "class code generation failed");
                    continue;
                }
            };

            match self.classes.find_by_code(&code).await {
                Ok(_) => {
                    debug!(attempt, "class code already taken");
                    continue;
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(ServiceError::repository("check class code")(err)),
            }

            let class = Class {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                code,
                teacher_id,
                created_at: Utc::now(),
            };

            match self.classes.create(&class).await {
                Ok(()) => return Ok(class),
                Err(DaoLayerError::DuplicateKey { .. }) => {
                    debug!(attempt, "class code claimed concurrently");
                }
                Err(err) => return Err(ServiceError::repository("create class")(err)),
            }
        }

        Err(ServiceError::CodeGeneration)
    }

    pub async fn get_class(&self, id: Uuid) -> Result<Class, ServiceError> {
        self.classes.find_by_id(id).await.map_err(class_lookup)
    }

    pub async fn get_class_by_code(&self, code: &str) -> Result<Class, ServiceError> {
        self.classes.find_by_code(code).await.map_err(class_lookup)
    }

    pub async fn get_teacher_classes(&self, teacher_id: Uuid) -> Result<Vec<Class>, ServiceError> {
        self.classes
            .list_by_teacher(teacher_id)
            .await
            .map_err(ServiceError::repository("list teacher classes"))
    }

    pub async fn delete_class(&self, teacher_id: Uuid, class_id: Uuid) -> Result<(), ServiceError> {
        let class = self.get_class(class_id).await?;
        if class.teacher_id != teacher_id {
            return Err(ServiceError::NotClassOwner);
        }

        self.classes.delete(class_id).await.map_err(class_lookup)
    }
}

fn class_lookup(err: DaoLayerError) -> ServiceError {
    if err.is_not_found() {
        ServiceError::ClassNotFound
    } else {
        ServiceError::repository("load class")(err)
    }
}
