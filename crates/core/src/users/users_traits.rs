use crate::errors::Result;
use crate::users::users_model::{NewUser, User, UserUpdate, WipeReport};
use async_trait::async_trait;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Inserts a user. Fails with `UsernameTaken` when the username exists.
    async fn create(&self, new_user: NewUser) -> Result<User>;
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    fn get_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Compares `candidate` against the stored password.
    fn verify_password(&self, user_id: &str, candidate: &str) -> Result<bool>;
    async fn update(&self, user_id: &str, changes: UserUpdate) -> Result<User>;
    /// Removes every user; goals and awards go with them.
    async fn delete_all(&self) -> Result<usize>;
    /// Removes every user and every quote in one transaction.
    async fn wipe_all(&self) -> Result<WipeReport>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    fn login(&self, username: &str, password: &str) -> Result<User>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    async fn update_profile(&self, user_id: &str, changes: UserUpdate) -> Result<User>;
    async fn wipe_all_data(&self) -> Result<usize>;
}
