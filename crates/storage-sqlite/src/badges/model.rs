//! Database models for badges and awards.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use goalpost_core::badges::{Badge, UserBadge};

/// Database model for catalog badges
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::badge)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BadgeDB {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_name: String,
    pub goal_count_required: i32,
}

/// Database model for awards
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_badge)]
#[diesel(primary_key(user_id, badge_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserBadgeDB {
    pub user_id: String,
    pub badge_id: String,
    pub date_earned: NaiveDateTime,
}

impl From<BadgeDB> for Badge {
    fn from(db: BadgeDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            image_name: db.image_name,
            goal_count_required: db.goal_count_required,
        }
    }
}

impl From<Badge> for BadgeDB {
    fn from(domain: Badge) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            description: domain.description,
            image_name: domain.image_name,
            goal_count_required: domain.goal_count_required,
        }
    }
}

impl From<UserBadgeDB> for UserBadge {
    fn from(db: UserBadgeDB) -> Self {
        Self {
            user_id: db.user_id,
            badge_id: db.badge_id,
            date_earned: db.date_earned,
        }
    }
}
