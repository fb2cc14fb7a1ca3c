use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{SharedTokenSigner, auth::config::DEFAULT_TOKEN_TTL_HOURS};
use chrono::{Duration, Utc};
use database::TransactionManager;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::id::{IdGenerator, UuidV7Generator};
use crate::models::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, UpdateProfileRequest, User,
};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    transactions: TransactionManager,
    ids: Arc<dyn IdGenerator>,
    signer: SharedTokenSigner,
    token_ttl: Duration,
}

impl<R: UserRepository + 'static> UserService<R> {
    pub fn new(repository: R, transactions: TransactionManager, signer: SharedTokenSigner) -> Self {
        Self {
            repository: Arc::new(repository),
            transactions,
            ids: Arc::new(UuidV7Generator),
            signer,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Register a new account.
    ///
    /// The email check and the insert are separate statements, so two
    /// concurrent registrations of one email can both pass the check.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<()> {
        match self.repository.get_by_email(None, &input.email).await {
            Ok(Some(_)) => return Err(UserError::AlreadyExists(input.email)),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Email lookup failed during registration");
                return Err(UserError::DatabaseQuery);
            }
        }

        let password = hash_password(input.password).await?;
        let user = User::new(self.ids.generate(), input.email, password);

        let repository = Arc::clone(&self.repository);
        let created = self
            .transactions
            .run_in_transaction(move |uow| {
                Box::pin(async move { repository.create(Some(uow), user).await })
            })
            .await?;

        tracing::info!(user_id = %created.user_id, "User registered");
        Ok(())
    }

    /// Check credentials and issue an access token for the account.
    pub async fn login(&self, input: LoginRequest) -> UserResult<LoginResponse> {
        let user = match self.repository.get_by_email(None, &input.email).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(UserError::UserNotFound),
            Err(e) => {
                tracing::warn!(error = %e, "Email lookup failed during login");
                return Err(UserError::UserNotFound);
            }
        };

        if !verify_password(input.password, user.password.clone()).await? {
            tracing::debug!(user_id = %user.user_id, "Password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        let expires_at = Utc::now()
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| UserError::Token("token expiry out of range".to_string()))?;
        let access_token = self
            .signer
            .issue(&user.user_id, expires_at)
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(LoginResponse { access_token })
    }

    pub async fn get_profile(&self, user_id: &str) -> UserResult<ProfileResponse> {
        let user = self.repository.get_by_id(None, user_id).await?;
        Ok(user.into())
    }

    /// Overwrite email and nickname of an existing account.
    pub async fn update_profile(&self, user_id: &str, input: UpdateProfileRequest) -> UserResult<()> {
        let mut user = self.repository.get_by_id(None, user_id).await?;

        user.email = input.email;
        user.nickname = input.nickname;

        self.repository.update(None, user).await?;
        Ok(())
    }
}

// Argon2 is CPU-bound; keep it off the async workers

async fn hash_password(password: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| UserError::Internal(format!("password hashing task failed: {}", e)))?
}

async fn verify_password(password: String, hash: String) -> UserResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash =
            PasswordHash::new(&hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| UserError::Internal(format!("password verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity;
    use crate::id::MockIdGenerator;
    use crate::store::SeaOrmUserRepository;
    use async_trait::async_trait;
    use axum_helpers::{JwtAuth, JwtConfig};
    use database::UnitOfWork;
    use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
    use test_utils::{TestDataBuilder, TestDatabase, assertions::assert_not_plaintext};

    const SECRET: &str = "service-test-secret-0123456789abcdef";

    fn signer() -> SharedTokenSigner {
        Arc::new(JwtAuth::new(&JwtConfig::try_new(SECRET).unwrap()))
    }

    fn service(db: &TestDatabase) -> UserService<SeaOrmUserRepository> {
        UserService::new(
            SeaOrmUserRepository::new(db.connection()),
            db.transactions(),
            signer(),
        )
    }

    fn register_request(builder: &TestDataBuilder, local: &str) -> RegisterRequest {
        RegisterRequest {
            email: builder.email(local),
            password: builder.password(),
        }
    }

    async fn user_count(db: &TestDatabase) -> u64 {
        entity::Entity::find().count(&db.connection).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let db = TestDatabase::new().await;
        let service = service(&db);
        let builder = TestDataBuilder::from_test_name("test_register_then_login");

        service.register(register_request(&builder, "ada")).await.unwrap();

        let login = service
            .login(LoginRequest {
                email: builder.email("ada"),
                password: builder.password(),
            })
            .await
            .unwrap();

        let subject = signer().verify(&login.access_token).unwrap();
        let profile = service.get_profile(&subject).await.unwrap();
        assert_eq!(profile.email, builder.email("ada"));
        assert_eq!(profile.nickname, "");
    }

    #[tokio::test]
    async fn test_register_stores_password_hash() {
        let db = TestDatabase::new().await;
        let service = service(&db);
        let builder = TestDataBuilder::from_test_name("test_register_stores_password_hash");

        service.register(register_request(&builder, "ada")).await.unwrap();

        let stored = entity::Entity::find().one(&db.connection).await.unwrap().unwrap();
        assert_not_plaintext(&stored.password, &builder.password(), "stored password");
        assert!(stored.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let db = TestDatabase::new().await;
        let service = service(&db);
        let builder = TestDataBuilder::from_test_name("test_register_duplicate_email");

        service.register(register_request(&builder, "ada")).await.unwrap();
        let err = service
            .register(register_request(&builder, "ada"))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::AlreadyExists(email) if email == builder.email("ada")));
        assert_eq!(user_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let db = TestDatabase::new().await;
        let service = service(&db);
        let builder = TestDataBuilder::from_test_name("test_login_wrong_password");

        service.register(register_request(&builder, "ada")).await.unwrap();
        let err = service
            .login(LoginRequest {
                email: builder.email("ada"),
                password: "definitely-not-it".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = TestDatabase::new().await;
        let service = service(&db);

        let err = service
            .login(LoginRequest {
                email: "nobody@example.test".to_string(),
                password: "whatever-password".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::UserNotFound));
    }

    #[tokio::test]
    async fn test_get_profile_unknown_user() {
        let db = TestDatabase::new().await;
        let service = service(&db);

        let err = service.get_profile("missing").await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_profile_then_get() {
        let db = TestDatabase::new().await;
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().times(1).returning(|| "usr-fixed".to_string());
        let service = service(&db).with_id_generator(Arc::new(ids));
        let builder = TestDataBuilder::from_test_name("test_update_profile_then_get");

        service.register(register_request(&builder, "ada")).await.unwrap();
        service
            .update_profile(
                "usr-fixed",
                UpdateProfileRequest {
                    email: builder.email("lovelace"),
                    nickname: builder.nickname("ada"),
                },
            )
            .await
            .unwrap();

        let profile = service.get_profile("usr-fixed").await.unwrap();
        assert_eq!(
            profile,
            ProfileResponse {
                user_id: "usr-fixed".to_string(),
                nickname: builder.nickname("ada"),
                email: builder.email("lovelace"),
            }
        );
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let db = TestDatabase::new().await;
        let service = service(&db);

        let err = service
            .update_profile(
                "missing",
                UpdateProfileRequest {
                    email: "a@example.test".to_string(),
                    nickname: "a".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_register_id_collision_rolls_back() {
        let db = TestDatabase::new().await;
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().times(2).returning(|| "usr-same".to_string());
        let service = service(&db).with_id_generator(Arc::new(ids));
        let builder = TestDataBuilder::from_test_name("test_register_id_collision_rolls_back");

        service.register(register_request(&builder, "first")).await.unwrap();
        let err = service
            .register(register_request(&builder, "second"))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Storage(_)));
        assert_eq!(user_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_token_expiry_follows_configured_ttl() {
        let db = TestDatabase::new().await;
        let service = service(&db).with_token_ttl(Duration::hours(1));
        let builder = TestDataBuilder::from_test_name("test_token_expiry_follows_configured_ttl");

        service.register(register_request(&builder, "ada")).await.unwrap();
        let login = service
            .login(LoginRequest {
                email: builder.email("ada"),
                password: builder.password(),
            })
            .await
            .unwrap();

        let claims = JwtAuth::new(&JwtConfig::try_new(SECRET).unwrap())
            .decode_claims(&login.access_token)
            .unwrap();
        let ttl = claims.exp - claims.iat;
        assert!((3599..=3601).contains(&ttl), "unexpected ttl {}", ttl);
    }

    #[tokio::test]
    async fn test_login_with_unrepresentable_ttl_fails_cleanly() {
        let db = TestDatabase::new().await;
        let service = service(&db).with_token_ttl(Duration::MAX);
        let builder = TestDataBuilder::from_test_name("test_login_with_unrepresentable_ttl");

        service.register(register_request(&builder, "ada")).await.unwrap();
        let err = service
            .login(LoginRequest {
                email: builder.email("ada"),
                password: builder.password(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Token(_)));
    }

    /// Repository whose every statement fails.
    struct UnreachableRepository;

    #[async_trait]
    impl UserRepository for UnreachableRepository {
        async fn create(&self, _uow: Option<&UnitOfWork>, _user: User) -> UserResult<User> {
            Err(DbErr::Custom("connection refused".into()).into())
        }

        async fn update(&self, _uow: Option<&UnitOfWork>, _user: User) -> UserResult<User> {
            Err(DbErr::Custom("connection refused".into()).into())
        }

        async fn get_by_id(&self, _uow: Option<&UnitOfWork>, _user_id: &str) -> UserResult<User> {
            Err(DbErr::Custom("connection refused".into()).into())
        }

        async fn get_by_email(
            &self,
            _uow: Option<&UnitOfWork>,
            _email: &str,
        ) -> UserResult<Option<User>> {
            Err(DbErr::Custom("connection refused".into()).into())
        }
    }

    #[tokio::test]
    async fn test_storage_failures_during_lookup() {
        let db = TestDatabase::new().await;
        let service = UserService::new(UnreachableRepository, db.transactions(), signer());

        let register = service
            .register(RegisterRequest {
                email: "ada@example.test".to_string(),
                password: "long-enough-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(register, UserError::DatabaseQuery));

        let login = service
            .login(LoginRequest {
                email: "ada@example.test".to_string(),
                password: "long-enough-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(login, UserError::UserNotFound));

        let profile = service.get_profile("anyone").await.unwrap_err();
        assert!(matches!(profile, UserError::Storage(_)));
    }
}
