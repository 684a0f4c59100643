use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalOutcome, NewGoal};
use async_trait::async_trait;

/// In-place edit applied to a stored goal by [`GoalRepositoryTrait::modify_goal`].
pub type GoalChange = Box<dyn FnOnce(&mut Goal) -> Result<()> + Send>;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    /// Goals for one user, or for everyone when `user_id` is `None`.
    fn list_goals(&self, user_id: Option<&str>) -> Result<Vec<Goal>>;
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    /// Inserts the goal or replaces the row with the same id. Stores the
    /// completion flag as given.
    async fn upsert_goal(&self, goal: Goal) -> Result<Goal>;
    /// Loads the goal, applies `change` and stores the result in one write
    /// transaction. An error from `change` leaves the row untouched.
    async fn modify_goal(&self, goal_id: &str, change: GoalChange) -> Result<Goal>;
    async fn delete_goal(&self, goal_id: &str) -> Result<usize>;
    async fn delete_all(&self, user_id: Option<&str>) -> Result<usize>;
    fn count_completed(&self, user_id: &str) -> Result<i64>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<GoalOutcome>;
    async fn update_goal(&self, goal: Goal) -> Result<GoalOutcome>;
    async fn record_progress(
        &self,
        goal_id: &str,
        progress: f64,
        diary_entry: Option<String>,
    ) -> Result<GoalOutcome>;
    async fn delete_goal(&self, goal_id: &str) -> Result<usize>;
    async fn clear_goals(&self, user_id: &str) -> Result<usize>;
}
