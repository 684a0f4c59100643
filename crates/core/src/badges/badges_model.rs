//! Badge domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A catalog entry: one achievement tier keyed by a completed-goal threshold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_name: String,
    pub goal_count_required: i32,
}

/// Record that a user earned a badge. At most one per (user, badge).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserBadge {
    pub user_id: String,
    pub badge_id: String,
    pub date_earned: NaiveDateTime,
}

/// A badge together with the moment it was awarded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub badge: Badge,
    pub date_earned: NaiveDateTime,
}

/// Where a user stands relative to the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub completed_count: i64,
    pub earned: Vec<Badge>,
    pub next: Option<Badge>,
    /// Completed goals still needed for `next`; zero when there is none.
    pub goals_remaining: i64,
}
