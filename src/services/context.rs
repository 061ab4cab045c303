use std::sync::Arc;

use crate::{
    auth::{jwt::JwtKeys, password::PasswordHasher},
    db::Repositories,
    services::{
        auth_service::AuthService,
        class_service::ClassService,
        code::{CodeGenerator, RandomCodeGenerator},
        enrollment_service::EnrollmentService,
    },
};

/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct ServiceContext {
    auth: AuthService,
    classes: ClassService,
    enrollments: EnrollmentService,
}

impl ServiceContext {
    pub fn new(repos: &Repositories, jwt: JwtKeys, hasher: PasswordHasher) -> Self {
        Self::with_code_generator(repos, jwt, hasher, Arc::new(RandomCodeGenerator))
    }

    pub fn with_code_generator(
        repos: &Repositories,
        jwt: JwtKeys,
        hasher: PasswordHasher,
        codes: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&repos.users), hasher, jwt),
            classes: ClassService::new(Arc::clone(&repos.classes), codes),
            enrollments: EnrollmentService::new(
                Arc::clone(&repos.classes),
                Arc::clone(&repos.enrollments),
            ),
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn classes(&self) -> &ClassService {
        &self.classes
    }

    pub fn enrollments(&self) -> &EnrollmentService {
        &self.enrollments
    }
}
