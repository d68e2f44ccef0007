/// User service - handles registration, login, profile and status
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::{BlogError, Result};
use crate::middleware::{require_auth, AuthState};
use crate::models::{NewUser, User};
use crate::repository::BlogRepository;
use crate::security::{hash_password, verify_password, TokenService};
use crate::validators::validate_user_input;

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user_id: Uuid,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn BlogRepository>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(repo: Arc<dyn BlogRepository>, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    /// Register a new account
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User> {
        validate_user_input(&input.email, &input.password)?;

        if self.repo.find_user_by_email(&input.email).await?.is_some() {
            return Err(BlogError::Conflict(
                "Email already registered, please pick another one".into(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                email: input.email,
                password_hash,
                name: input.name,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Exchange email and password for a time-bounded bearer credential
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult> {
        let user = self
            .repo
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| BlogError::InvalidCredentials("User not found".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(BlogError::InvalidCredentials("Password is incorrect".into()));
        }

        let issued = self.tokens.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            token: issued.token,
            user_id: user.id,
            expires_in: issued.expires_in,
        })
    }

    /// The acting user's own profile
    pub async fn profile(&self, auth: &AuthState) -> Result<User> {
        let user_id = require_auth(auth)?;
        self.repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| BlogError::InvalidCredentials("No user found".into()))
    }

    pub async fn update_status(&self, auth: &AuthState, status: &str) -> Result<User> {
        let user_id = require_auth(auth)?;
        self.repo
            .update_user_status(user_id, status)
            .await?
            .ok_or_else(|| BlogError::InvalidCredentials("No user found".into()))
    }

    /// Used by `Post.creator`
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        self.repo.find_user_by_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::middleware::AuthenticatedUser;
    use crate::repository::InMemoryBlogRepository;

    fn service() -> UserService {
        let tokens = TokenService::new(&JwtConfig {
            secret: "a".repeat(32),
            issuer: "blog-service".to_string(),
            expiry_seconds: 3600,
        });
        UserService::new(Arc::new(InMemoryBlogRepository::new()), tokens)
    }

    fn input(email: &str, password: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.to_string(),
            name: "Max".to_string(),
            password: password.to_string(),
        }
    }

    fn as_user(user: &User) -> AuthState {
        AuthState::Authenticated(AuthenticatedUser {
            user_id: user.id,
            email: user.email.clone(),
        })
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let svc = service();
        let user = svc.create_user(input("max@example.com", "secret")).await.unwrap();

        assert_eq!(user.email, "max@example.com");
        assert_ne!(user.password_hash, "secret");
        assert_eq!(user.status, "I am new!");
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let svc = service();
        let err = svc.create_user(input("nope", "123")).await.unwrap_err();
        match err {
            BlogError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let svc = service();
        svc.create_user(input("max@example.com", "secret")).await.unwrap();

        let err = svc
            .create_user(input("max@example.com", "another"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_paths() {
        let svc = service();
        let user = svc.create_user(input("max@example.com", "secret")).await.unwrap();

        let ok = svc.login("max@example.com", "secret").await.unwrap();
        assert_eq!(ok.user_id, user.id);
        assert_eq!(ok.expires_in, 3600);
        assert_eq!(
            svc.tokens.verify(&ok.token).unwrap().user_id(),
            Some(user.id)
        );

        match svc.login("max@example.com", "wrong!").await.unwrap_err() {
            BlogError::InvalidCredentials(msg) => assert_eq!(msg, "Password is incorrect"),
            other => panic!("unexpected {:?}", other),
        }
        match svc.login("ghost@example.com", "secret").await.unwrap_err() {
            BlogError::InvalidCredentials(msg) => assert_eq!(msg, "User not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_profile_and_status_require_auth() {
        let svc = service();
        assert!(matches!(
            svc.profile(&AuthState::Anonymous).await,
            Err(BlogError::Unauthenticated)
        ));
        assert!(matches!(
            svc.update_status(&AuthState::Anonymous, "busy").await,
            Err(BlogError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_update_status() {
        let svc = service();
        let user = svc.create_user(input("max@example.com", "secret")).await.unwrap();

        let updated = svc.update_status(&as_user(&user), "Writing").await.unwrap();
        assert_eq!(updated.status, "Writing");
        assert_eq!(svc.profile(&as_user(&user)).await.unwrap().status, "Writing");
    }

    #[tokio::test]
    async fn test_profile_of_vanished_user() {
        let svc = service();
        let ghost = AuthState::Authenticated(AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "ghost@example.com".to_string(),
        });
        match svc.profile(&ghost).await.unwrap_err() {
            BlogError::InvalidCredentials(msg) => assert_eq!(msg, "No user found"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
