use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;
use uuid::Uuid;

use crate::{
    auth::{
        Claims,
        jwt::{JwtKeys, decode_token, encode_token, make_claims},
        password::PasswordHasher,
    },
    db::{UserRepository, dao::DaoLayerError},
    models::{AuthSession, LoginInput, RegisterInput, User},
    services::ServiceError,
};

const DUMMY_PASSWORD: &str = "attendify-timing-equalizer";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    jwt: JwtKeys,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, jwt: JwtKeys) -> Self {
        Self {
            users,
            hasher,
            jwt,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<User, ServiceError> {
        let password_hash = self.hasher.hash(&input.password)?;
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.trim().to_string(),
            password_hash,
            name: input.name,
            role: input.role,
            created_at: Utc::now(),
        };

        match self.users.create(&user).await {
            Ok(()) => Ok(user),
            Err(DaoLayerError::DuplicateKey { .. }) => Err(ServiceError::EmailTaken),
            Err(err) => Err(ServiceError::repository("create user")(err)),
        }
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let user = match self.users.find_by_email(input.email.trim()).await {
            Ok(user) => user,
            Err(err) if err.is_not_found() => {
                // Unknown emails pay for one verification too.
                self.hasher.verify(&input.password, self.dummy_hash());
                return Err(ServiceError::InvalidCredentials);
            }
            Err(err) => return Err(ServiceError::repository("find user by email")(err)),
        };

        if !self.hasher.verify(&input.password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok(AuthSession {
            token,
            user: user.into(),
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let claims = make_claims(&user.id, user.role, Utc::now());
        encode_token(&self.jwt, &claims).map_err(ServiceError::TokenSigning)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode_token(&self.jwt, token).map_err(|_| ServiceError::InvalidToken)
    }

    fn dummy_hash(&self) -> &str {
        self.dummy_hash
            .get_or_init(|| self.hasher.hash(DUMMY_PASSWORD).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        auth::{
            Role,
            jwt::{JwtKeys, encode_token, make_claims},
            password::PasswordHasher,
        },
        db::{MemoryStore, UserRepository},
        models::{LoginInput, RegisterInput},
        services::ServiceError,
    };

    use super::AuthService;

    fn service(store: &MemoryStore) -> AuthService {
        AuthService::new(
            Arc::new(store.clone()),
            PasswordHasher::fast(),
            JwtKeys::from_secret(b"auth-service-test-secret"),
        )
    }

    fn register_input(email: &str, role: Role) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: "password1".to_string(),
            name: "Ada".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn register_stores_user_with_verifiable_hash() {
        let store = MemoryStore::new();
        let auth = service(&store);

        let user = auth
            .register(register_input("a@x.io", Role::Teacher))
            .await
            .expect("register should succeed");

        let stored = store.find_by_email("a@x.io").await.expect("user stored");
        assert_eq!(stored.id, user.id);
        assert_eq!(stored.role, Role::Teacher);
        assert_ne!(stored.password_hash, "password1");
        let hasher = PasswordHasher::fast();
        assert!(hasher.verify("password1", &stored.password_hash));
        assert!(!hasher.verify("password2", &stored.password_hash));
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let store = MemoryStore::new();
        let auth = service(&store);
        auth.register(register_input("a@x.io", Role::Teacher))
            .await
            .expect("first register");

        let err = auth
            .register(register_input("a@x.io", Role::Student))
            .await
            .expect_err("second register should fail");
        assert!(matches!(err, ServiceError::EmailTaken));
    }

    #[tokio::test]
    async fn register_rejects_out_of_range_password() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let mut input = register_input("a@x.io", Role::Teacher);
        input.password = "x".repeat(73);

        let err = auth.register(input).await.expect_err("should fail");
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn login_round_trips_into_valid_token() {
        let store = MemoryStore::new();
        let auth = service(&store);
        let user = auth
            .register(register_input("a@x.io", Role::Student))
            .await
            .expect("register");

        let session = auth
            .login(LoginInput {
                email: "a@x.io".to_string(),
                password: "password1".to_string(),
            })
            .await
            .expect("login should succeed");

        assert!(!session.token.is_empty());
        assert_eq!(session.user.id, user.id);
        let claims = auth
            .validate_token(&session.token)
            .expect("token should validate");
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, Role::Student);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let auth = service(&store);
        auth.register(register_input("a@x.io", Role::Student))
            .await
            .expect("register");

        let wrong_password = auth
            .login(LoginInput {
                email: "a@x.io".to_string(),
                password: "password2".to_string(),
            })
            .await
            .expect_err("wrong password");
        let unknown_email = auth
            .login(LoginInput {
                email: "nobody@x.io".to_string(),
                password: "password1".to_string(),
            })
            .await
            .expect_err("unknown email");

        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn validate_token_collapses_every_failure() {
        let store = MemoryStore::new();
        let auth = service(&store);

        let foreign = encode_token(
            &JwtKeys::from_secret(b"someone-else"),
            &make_claims(&uuid::Uuid::new_v4(), Role::Teacher, chrono::Utc::now()),
        )
        .expect("encode");

        assert!(matches!(
            auth.validate_token(&foreign),
            Err(ServiceError::InvalidToken)
        ));
        assert!(matches!(
            auth.validate_token("garbage"),
            Err(ServiceError::InvalidToken)
        ));
    }
}
