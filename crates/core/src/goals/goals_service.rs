use crate::badges::{Badge, BadgeEngine};
use crate::constants::{MAX_DIARY_ENTRY_CHARS, PROGRESS_COMPLETE};
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::{Goal, GoalOutcome, NewGoal};
use crate::goals::goals_traits::{GoalChange, GoalRepositoryTrait, GoalServiceTrait};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use uuid::Uuid;

pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    badge_engine: Arc<BadgeEngine>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        badge_engine: Arc<BadgeEngine>,
    ) -> Self {
        GoalService {
            goal_repository,
            badge_engine,
        }
    }

    fn validate(goal: &Goal) -> Result<()> {
        if goal.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        if goal.user_id.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if !(0.0..=PROGRESS_COMPLETE).contains(&goal.progress) {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "progress".to_string(),
                value: goal.progress.to_string(),
            }));
        }
        Ok(())
    }

    /// A goal whose progress reached the target is complete.
    fn normalize(goal: &mut Goal) {
        goal.title = goal.title.trim().to_string();
        if goal.has_reached_target() {
            goal.is_completed = true;
        }
    }

    async fn save(&self, mut goal: Goal) -> Result<GoalOutcome> {
        Self::validate(&goal)?;
        Self::normalize(&mut goal);
        let goal = self.goal_repository.upsert_goal(goal).await?;
        Ok(self.award_badges(goal).await)
    }

    /// Runs once the goal is committed, so an engine failure is logged and
    /// reported as "no new badges" rather than as a failed save.
    async fn award_badges(&self, goal: Goal) -> GoalOutcome {
        let new_badges: Vec<Badge> = if goal.is_completed {
            match self.badge_engine.check_and_award(&goal.user_id).await {
                Ok(badges) => badges,
                Err(e) => {
                    warn!(
                        "Badge check for user {} failed after saving goal {}: {}",
                        goal.user_id, goal.id, e
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        debug!(
            "Saved goal {} (completed: {}, new badges: {})",
            goal.id,
            goal.is_completed,
            new_badges.len()
        );
        GoalOutcome { goal, new_badges }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repository.list_goals(Some(user_id))
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.goal_repository.get_goal(goal_id)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<GoalOutcome> {
        let goal = Goal {
            id: new_goal.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id: new_goal.user_id,
            title: new_goal.title,
            description: new_goal.description,
            category: new_goal.category,
            deadline: new_goal.deadline,
            progress: new_goal.progress,
            is_completed: new_goal.is_completed,
            progress_diary: new_goal.progress_diary,
        };
        self.save(goal).await
    }

    async fn update_goal(&self, goal: Goal) -> Result<GoalOutcome> {
        self.save(goal).await
    }

    async fn record_progress(
        &self,
        goal_id: &str,
        progress: f64,
        diary_entry: Option<String>,
    ) -> Result<GoalOutcome> {
        let entry = match diary_entry.map(|e| e.trim().to_string()) {
            Some(entry) if entry.chars().count() > MAX_DIARY_ENTRY_CHARS => {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "diary entry exceeds {} characters",
                    MAX_DIARY_ENTRY_CHARS
                ))));
            }
            Some(entry) if !entry.is_empty() => Some(entry),
            _ => None,
        };

        // Load, append and store happen in one write so concurrent calls
        // never drop each other's entries.
        let change: GoalChange = Box::new(move |goal: &mut Goal| {
            goal.progress = progress;
            GoalService::validate(goal)?;
            if let Some(entry) = entry {
                goal.progress_diary.push(entry);
            }
            GoalService::normalize(goal);
            Ok(())
        });
        let goal = self.goal_repository.modify_goal(goal_id, change).await?;
        Ok(self.award_badges(goal).await)
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        self.goal_repository.delete_goal(goal_id).await
    }

    async fn clear_goals(&self, user_id: &str) -> Result<usize> {
        self.goal_repository.delete_all(Some(user_id)).await
    }
}
