//! Derives achievement state from goal-completion history.
//!
//! Each (user, badge) pair only ever moves from "not earned" to "earned".
//! Running [`BadgeEngine::check_and_award`] repeatedly never creates a second
//! award row for a pair and never removes one.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::badges::badges_model::{Badge, BadgeProgress};
use crate::badges::badges_traits::BadgeRepositoryTrait;
use crate::errors::Result;
use crate::goals::GoalRepositoryTrait;

/// Badges from `catalog` whose threshold is met by `completed_count` and
/// that are not in `earned_ids`, lowest threshold first (ties by id).
pub fn eligible_badges(
    catalog: &[Badge],
    completed_count: i64,
    earned_ids: &HashSet<String>,
) -> Vec<Badge> {
    let mut eligible: Vec<Badge> = catalog
        .iter()
        .filter(|badge| i64::from(badge.goal_count_required) <= completed_count)
        .filter(|badge| !earned_ids.contains(&badge.id))
        .cloned()
        .collect();
    eligible.sort_by(|a, b| {
        a.goal_count_required
            .cmp(&b.goal_count_required)
            .then_with(|| a.id.cmp(&b.id))
    });
    eligible
}

pub struct BadgeEngine {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    badge_repository: Arc<dyn BadgeRepositoryTrait>,
}

impl BadgeEngine {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        badge_repository: Arc<dyn BadgeRepositoryTrait>,
    ) -> Self {
        BadgeEngine {
            goal_repository,
            badge_repository,
        }
    }

    fn earned_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        Ok(self
            .badge_repository
            .badges_for_user(user_id)?
            .into_iter()
            .map(|badge| badge.id)
            .collect())
    }

    /// Awards every badge the user has become eligible for and returns the
    /// ones awarded by this call.
    ///
    /// A failed award is logged and skipped; the remaining badges are still
    /// attempted. A duplicate rejection means another caller got there first.
    pub async fn check_and_award(&self, user_id: &str) -> Result<Vec<Badge>> {
        let completed_count = self.goal_repository.count_completed(user_id)?;
        let earned_ids = self.earned_ids(user_id)?;
        let catalog = self.badge_repository.all_badges()?;

        let eligible = eligible_badges(&catalog, completed_count, &earned_ids);
        if eligible.is_empty() {
            debug!(
                "No new badges for user {} ({} completed goals)",
                user_id, completed_count
            );
            return Ok(Vec::new());
        }

        let mut awarded = Vec::with_capacity(eligible.len());
        for badge in eligible {
            match self.badge_repository.award(user_id, &badge.id).await {
                Ok(_) => {
                    info!("User {} earned badge '{}'", user_id, badge.id);
                    awarded.push(badge);
                }
                Err(e) if e.is_unique_violation() => {
                    debug!(
                        "Badge '{}' already awarded to user {}: {}",
                        badge.id, user_id, e
                    );
                }
                Err(e) => {
                    warn!(
                        "Failed to award badge '{}' to user {}: {}",
                        badge.id, user_id, e
                    );
                }
            }
        }

        Ok(awarded)
    }

    pub fn progress(&self, user_id: &str) -> Result<BadgeProgress> {
        let completed_count = self.goal_repository.count_completed(user_id)?;
        let earned = self.badge_repository.badges_for_user(user_id)?;
        let earned_ids: HashSet<&str> = earned.iter().map(|b| b.id.as_str()).collect();

        let next = self
            .badge_repository
            .all_badges()?
            .into_iter()
            .filter(|badge| !earned_ids.contains(badge.id.as_str()))
            .min_by(|a, b| {
                a.goal_count_required
                    .cmp(&b.goal_count_required)
                    .then_with(|| a.id.cmp(&b.id))
            });
        let goals_remaining = next
            .as_ref()
            .map(|badge| (i64::from(badge.goal_count_required) - completed_count).max(0))
            .unwrap_or(0);

        Ok(BadgeProgress {
            completed_count,
            earned,
            next,
            goals_remaining,
        })
    }
}
