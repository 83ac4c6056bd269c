use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::forms::{self, DUPLICATE_USERNAME, NAME_MAX, PASSWORD_MIN};
use crate::data::user_repository::UserRepository;
use crate::domain::error::{DomainError, FormErrors};
use crate::domain::user::User;
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};
use crate::presentation::dto::{LoginRequest, RegisterRequest, UpdateProfileRequest};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, DomainError> {
        let mut errors = FormErrors::new();
        let username = forms::username(&mut errors, &request.username);
        let email = forms::email(&mut errors, &request.email, true);
        if request.password.chars().count() < PASSWORD_MIN {
            errors.add(
                "password",
                format!("This password is too short. It must contain at least {PASSWORD_MIN} characters."),
            );
        }
        if request.password != request.password_confirm {
            errors.add("password_confirm", "The two password fields didn't match.");
        }
        if !username.is_empty() && self.repo.find_by_username(&username).await?.is_some() {
            errors.add("username", DUPLICATE_USERNAME);
        }
        errors.into_result()?;

        let hash = hash_password(&request.password)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        self.repo.create(User::new(username, email, hash)).await
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<String, DomainError> {
        let user = self
            .repo
            .find_by_username(request.username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    /// Edits the viewer's own account; nobody else's is reachable.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.get_user(user_id).await?;

        let mut errors = FormErrors::new();
        let username = forms::username(&mut errors, &request.username);
        let first_name = forms::optional_text(&mut errors, "first_name", &request.first_name, NAME_MAX);
        let last_name = forms::optional_text(&mut errors, "last_name", &request.last_name, NAME_MAX);
        let email = forms::email(&mut errors, &request.email, false);
        if username != user.username
            && !username.is_empty()
            && self.repo.find_by_username(&username).await?.is_some()
        {
            errors.add("username", DUPLICATE_USERNAME);
        }
        errors.into_result()?;

        user.username = username;
        user.first_name = first_name;
        user.last_name = last_name;
        user.email = email;
        let updated = self.repo.update_profile(&user).await?;
        info!(user_id = %updated.id, "profile edited");
        Ok(updated)
    }
}
