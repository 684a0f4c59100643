//! Database models for goals.

use chrono::NaiveDate;
use diesel::prelude::*;
use goalpost_core::errors::Error;
use goalpost_core::goals::Goal;

/// Database model for goals. The diary is a JSON array of strings stored as a blob.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::goal)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_completed: bool,
    pub progress: f64,
    pub progress_diary: Vec<u8>,
}

impl TryFrom<GoalDB> for Goal {
    type Error = Error;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        let progress_diary = if db.progress_diary.is_empty() {
            Vec::new()
        } else {
            serde_json::from_slice(&db.progress_diary)?
        };
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            category: db.category,
            deadline: db.deadline,
            progress: db.progress,
            is_completed: db.is_completed,
            progress_diary,
        })
    }
}

impl TryFrom<Goal> for GoalDB {
    type Error = Error;

    fn try_from(domain: Goal) -> Result<Self, Self::Error> {
        Ok(Self {
            progress_diary: serde_json::to_vec(&domain.progress_diary)?,
            id: domain.id,
            user_id: domain.user_id,
            title: domain.title,
            description: domain.description,
            category: domain.category,
            deadline: domain.deadline,
            is_completed: domain.is_completed,
            progress: domain.progress,
        })
    }
}
