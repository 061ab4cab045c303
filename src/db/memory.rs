use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sea_orm::DbErr;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::dao::{DaoLayerError, DaoResult};
use super::repository::{
    ClassRepository, EnrollmentRepository, Repositories, StoreHealth, UserRepository,
};
use crate::models::{Class, Enrollment, EnrollmentWithClass, StudentInClass, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    classes: HashMap<Uuid, Class>,
    enrollments: HashMap<Uuid, Enrollment>,
}

/// Store backed by process memory. Keeps the same unique keys, foreign keys,
/// cascades and orderings as the relational schema, so services behave the
/// same against either.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    healthy: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Makes `ping` fail, to exercise the unhealthy path.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            classes: Arc::new(self.clone()),
            enrollments: Arc::new(self.clone()),
            health: Arc::new(self.clone()),
        }
    }

    pub async fn enrollment_count(&self) -> usize {
        self.tables.read().await.enrollments.len()
    }
}

fn foreign_key(entity: &'static str, column: &str, id: Uuid) -> DaoLayerError {
    DaoLayerError::Db(DbErr::Custom(format!(
        "{entity}.{column} references missing row {id}"
    )))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> DaoResult<()> {
        let mut tables = self.tables.write().await;
        let taken = tables.users.contains_key(&user.id)
            || tables.users.values().any(|u| u.email == user.email);
        if taken {
            return Err(DaoLayerError::DuplicateKey { entity: "user" });
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| DaoLayerError::not_found("user", format!("email={email}")))
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DaoLayerError::not_found("user", format!("id={id}")))
    }
}

#[async_trait]
impl ClassRepository for MemoryStore {
    async fn create(&self, class: &Class) -> DaoResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&class.teacher_id) {
            return Err(foreign_key("classes", "teacher_id", class.teacher_id));
        }
        let taken = tables.classes.contains_key(&class.id)
            || tables.classes.values().any(|c| c.code == class.code);
        if taken {
            return Err(DaoLayerError::DuplicateKey { entity: "class" });
        }
        tables.classes.insert(class.id, class.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<Class> {
        let tables = self.tables.read().await;
        tables
            .classes
            .get(&id)
            .cloned()
            .ok_or_else(|| DaoLayerError::not_found("class", format!("id={id}")))
    }

    async fn find_by_code(&self, code: &str) -> DaoResult<Class> {
        let tables = self.tables.read().await;
        tables
            .classes
            .values()
            .find(|c| c.code == code)
            .cloned()
            .ok_or_else(|| DaoLayerError::not_found("class", format!("code={code}")))
    }

    async fn list_by_teacher(&self, teacher_id: Uuid) -> DaoResult<Vec<Class>> {
        let tables = self.tables.read().await;
        let mut classes: Vec<Class> = tables
            .classes
            .values()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned()
            .collect();
        classes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(classes)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<()> {
        let mut tables = self.tables.write().await;
        if tables.classes.remove(&id).is_none() {
            return Err(DaoLayerError::not_found("class", format!("id={id}")));
        }
        tables.enrollments.retain(|_, e| e.class_id != id);
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRepository for MemoryStore {
    async fn create(&self, enrollment: &Enrollment) -> DaoResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.classes.contains_key(&enrollment.class_id) {
            return Err(foreign_key("enrollments", "class_id", enrollment.class_id));
        }
        if !tables.users.contains_key(&enrollment.student_id) {
            return Err(foreign_key(
                "enrollments",
                "student_id",
                enrollment.student_id,
            ));
        }
        let taken = tables.enrollments.contains_key(&enrollment.id)
            || tables.enrollments.values().any(|e| {
                e.class_id == enrollment.class_id && e.student_id == enrollment.student_id
            });
        if taken {
            return Err(DaoLayerError::DuplicateKey {
                entity: "enrollment",
            });
        }
        tables.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(())
    }

    async fn is_enrolled(&self, class_id: Uuid, student_id: Uuid) -> DaoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .values()
            .any(|e| e.class_id == class_id && e.student_id == student_id))
    }

    async fn delete(&self, class_id: Uuid, student_id: Uuid) -> DaoResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.enrollments.len();
        tables
            .enrollments
            .retain(|_, e| !(e.class_id == class_id && e.student_id == student_id));
        if tables.enrollments.len() == before {
            return Err(DaoLayerError::not_found(
                "enrollment",
                format!("class_id={class_id} student_id={student_id}"),
            ));
        }
        Ok(())
    }

    async fn classes_for_student(&self, student_id: Uuid) -> DaoResult<Vec<EnrollmentWithClass>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .map(|e| {
                let class = tables.classes.get(&e.class_id).cloned().ok_or_else(|| {
                    DaoLayerError::Decode {
                        entity: "enrollment",
                        detail: format!("enrollment {} has no class", e.id),
                    }
                })?;
                Ok(EnrollmentWithClass {
                    id: e.id,
                    class: class.into(),
                    enrolled_at: e.enrolled_at,
                })
            })
            .collect::<DaoResult<Vec<_>>>()?;
        rows.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn students_in_class(&self, class_id: Uuid) -> DaoResult<Vec<StudentInClass>> {
        let tables = self.tables.read().await;
        let mut rows = tables
            .enrollments
            .values()
            .filter(|e| e.class_id == class_id)
            .map(|e| {
                let student = tables.users.get(&e.student_id).ok_or_else(|| {
                    DaoLayerError::Decode {
                        entity: "enrollment",
                        detail: format!("enrollment {} has no student", e.id),
                    }
                })?;
                Ok(StudentInClass {
                    id: e.id,
                    student: student.into(),
                    enrolled_at: e.enrolled_at,
                })
            })
            .collect::<DaoResult<Vec<_>>>()?;
        rows.sort_by(|a, b| a.student.name.cmp(&b.student.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> DaoResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DaoLayerError::Db(DbErr::Custom(
                "memory store marked unhealthy".to_string(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::MemoryStore;
    use crate::auth::Role;
    use crate::db::dao::DaoLayerError;
    use crate::db::repository::{ClassRepository, EnrollmentRepository, UserRepository};
    use crate::models::{Class, Enrollment, User};

    fn user(name: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@x.io", name.to_lowercase()),
            password_hash: "hash".to_string(),
            name: name.to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn class(teacher_id: Uuid, code: &str) -> Class {
        Class {
            id: Uuid::new_v4(),
            name: "Algebra".to_string(),
            code: code.to_string(),
            teacher_id,
            created_at: Utc::now(),
        }
    }

    fn enrollment(class_id: Uuid, student_id: Uuid) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            class_id,
            student_id,
            enrolled_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_duplicate_key() {
        let store = MemoryStore::new();
        let first = user("Ada", Role::Teacher);
        let mut second = user("Other", Role::Student);
        second.email = first.email.clone();

        UserRepository::create(&store, &first).await.expect("first insert");
        let err = UserRepository::create(&store, &second)
            .await
            .expect_err("second insert should fail");
        assert!(matches!(err, DaoLayerError::DuplicateKey { entity: "user" }));
    }

    #[tokio::test]
    async fn class_requires_existing_teacher_and_unique_code() {
        let store = MemoryStore::new();
        let teacher = user("Ada", Role::Teacher);
        UserRepository::create(&store, &teacher).await.expect("user insert");

        let orphan = ClassRepository::create(&store, &class(Uuid::new_v4(), "AAAAAA")).await;
        assert!(matches!(orphan, Err(DaoLayerError::Db(_))));

        ClassRepository::create(&store, &class(teacher.id, "AAAAAA"))
            .await
            .expect("class insert");
        let clash = ClassRepository::create(&store, &class(teacher.id, "AAAAAA")).await;
        assert!(matches!(
            clash,
            Err(DaoLayerError::DuplicateKey { entity: "class" })
        ));
    }

    #[tokio::test]
    async fn deleting_class_cascades_to_enrollments() {
        let store = MemoryStore::new();
        let teacher = user("Ada", Role::Teacher);
        let student = user("Grace", Role::Student);
        UserRepository::create(&store, &teacher).await.expect("teacher");
        UserRepository::create(&store, &student).await.expect("student");
        let algebra = class(teacher.id, "ALGEB2");
        ClassRepository::create(&store, &algebra).await.expect("class");
        EnrollmentRepository::create(&store, &enrollment(algebra.id, student.id))
            .await
            .expect("enrollment");

        ClassRepository::delete(&store, algebra.id)
            .await
            .expect("delete should succeed");

        assert_eq!(store.enrollment_count().await, 0);
        let again = ClassRepository::delete(&store, algebra.id).await;
        assert!(matches!(again, Err(ref err) if err.is_not_found()));
    }

    #[tokio::test]
    async fn listings_follow_store_ordering() {
        let store = MemoryStore::new();
        let teacher = user("Ada", Role::Teacher);
        let zed = user("Zed", Role::Student);
        let amy = user("Amy", Role::Student);
        for u in [&teacher, &zed, &amy] {
            UserRepository::create(&store, u).await.expect("user");
        }

        let mut old = class(teacher.id, "OLDOLD");
        old.created_at = Utc::now() - Duration::hours(1);
        let new = class(teacher.id, "NEWNEW");
        ClassRepository::create(&store, &old).await.expect("old class");
        ClassRepository::create(&store, &new).await.expect("new class");

        let listed = store.list_by_teacher(teacher.id).await.expect("list");
        let codes: Vec<_> = listed.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["NEWNEW", "OLDOLD"]);

        let mut first = enrollment(old.id, zed.id);
        first.enrolled_at = Utc::now() - Duration::minutes(5);
        EnrollmentRepository::create(&store, &first).await.expect("first");
        EnrollmentRepository::create(&store, &enrollment(new.id, zed.id))
            .await
            .expect("second");
        EnrollmentRepository::create(&store, &enrollment(old.id, amy.id))
            .await
            .expect("third");

        let mine = store.classes_for_student(zed.id).await.expect("classes");
        let codes: Vec<_> = mine.iter().map(|e| e.class.code.as_str()).collect();
        assert_eq!(codes, ["NEWNEW", "OLDOLD"]);

        let roster = store.students_in_class(old.id).await.expect("roster");
        let names: Vec<_> = roster.iter().map(|s| s.student.name.as_str()).collect();
        assert_eq!(names, ["Amy", "Zed"]);
    }
}
