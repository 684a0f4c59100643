//! Goals domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::badges::Badge;
use crate::constants::PROGRESS_COMPLETE;

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    /// Fraction done, within `0.0..=1.0`.
    pub progress: f64,
    pub is_completed: bool,
    /// Free-text diary entries, oldest first.
    #[serde(default)]
    pub progress_diary: Vec<String>,
}

impl Goal {
    pub fn has_reached_target(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub progress_diary: Vec<String>,
}

/// Result of saving a goal: the stored goal plus any badges the save unlocked
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalOutcome {
    pub goal: Goal,
    pub new_badges: Vec<Badge>,
}
