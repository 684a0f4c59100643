use crate::errors::{Error, Result, ValidationError};
use crate::users::users_model::{NewUser, User, UserUpdate};
use crate::users::users_traits::{UserRepositoryTrait, UserServiceTrait};
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepositoryTrait>) -> Self {
        UserService { user_repository }
    }

    fn validate_username(username: &str) -> Result<String> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "username".to_string(),
            )));
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, mut new_user: NewUser) -> Result<User> {
        new_user.username = Self::validate_username(&new_user.username)?;
        if new_user.password.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "password".to_string(),
            )));
        }
        if new_user.id.is_none() {
            new_user.id = Some(Uuid::new_v4().to_string());
        }

        let user = self.user_repository.create(new_user).await?;
        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .user_repository
            .get_by_username(username.trim())?
            .ok_or(Error::InvalidCredentials)?;

        if !self.user_repository.verify_password(&user.id, password)? {
            debug!("Password mismatch for user {}", user.id);
            return Err(Error::InvalidCredentials);
        }
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.user_repository.get_by_id(user_id)
    }

    async fn update_profile(&self, user_id: &str, mut changes: UserUpdate) -> Result<User> {
        if let Some(username) = changes.username.as_deref() {
            changes.username = Some(Self::validate_username(username)?);
        }
        if changes.password.as_deref() == Some("") {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "password must not be empty".to_string(),
            )));
        }
        if changes.is_empty() {
            return self.user_repository.get_by_id(user_id);
        }
        self.user_repository.update(user_id, changes).await
    }

    async fn wipe_all_data(&self) -> Result<usize> {
        let report = self.user_repository.wipe_all().await?;
        info!(
            "Wiped all data: {} users, {} quotes",
            report.users, report.quotes
        );
        Ok(report.users)
    }
}
