use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use goalpost_core::badges::{Badge, BadgeRepositoryTrait, EarnedBadge, UserBadge};
use goalpost_core::errors::{Error, Result};

use super::model::{BadgeDB, UserBadgeDB};
use crate::db::{read_snapshot, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{badge, user_badge};

pub struct BadgeRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BadgeRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        BadgeRepository { pool, writer }
    }
}

#[async_trait]
impl BadgeRepositoryTrait for BadgeRepository {
    fn all_badges(&self) -> Result<Vec<Badge>> {
        read_snapshot(&self.pool, |conn| {
            let badges_db = badge::table
                .select(BadgeDB::as_select())
                .order((badge::goal_count_required.asc(), badge::id.asc()))
                .load::<BadgeDB>(conn)
                .into_core()?;
            Ok(badges_db.into_iter().map(Badge::from).collect())
        })
    }

    fn badges_for_user(&self, user_id: &str) -> Result<Vec<Badge>> {
        read_snapshot(&self.pool, |conn| {
            let badges_db = badge::table
                .inner_join(user_badge::table)
                .filter(user_badge::user_id.eq(user_id))
                .select(BadgeDB::as_select())
                .order((badge::goal_count_required.asc(), badge::id.asc()))
                .load::<BadgeDB>(conn)
                .into_core()?;
            Ok(badges_db.into_iter().map(Badge::from).collect())
        })
    }

    /// Records the award once. A second award of the same pair is
    /// `BadgeAlreadyAwarded`, whether caught by the lookup or by the primary key.
    async fn award(&self, user_id: &str, badge_id: &str) -> Result<UserBadge> {
        let award_db = UserBadgeDB {
            user_id: user_id.to_string(),
            badge_id: badge_id.to_string(),
            date_earned: Utc::now().naive_utc(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserBadge> {
                let already_awarded = user_badge::table
                    .find((&award_db.user_id, &award_db.badge_id))
                    .count()
                    .get_result::<i64>(conn)
                    .into_core()?
                    > 0;
                if already_awarded {
                    return Err(Error::BadgeAlreadyAwarded {
                        user_id: award_db.user_id,
                        badge_id: award_db.badge_id,
                    });
                }

                diesel::insert_into(user_badge::table)
                    .values(&award_db)
                    .execute(conn)
                    .map_err(|e| match e {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            Error::BadgeAlreadyAwarded {
                                user_id: award_db.user_id.clone(),
                                badge_id: award_db.badge_id.clone(),
                            }
                        }
                        other => StorageError::from(other).into(),
                    })?;
                debug!("Awarded badge {} to {}", award_db.badge_id, award_db.user_id);
                Ok(UserBadge::from(award_db))
            })
            .await
    }

    fn recently_earned(&self, user_id: &str, limit: i64) -> Result<Vec<EarnedBadge>> {
        read_snapshot(&self.pool, |conn| {
            let rows = user_badge::table
                .inner_join(badge::table)
                .filter(user_badge::user_id.eq(user_id))
                .order((
                    user_badge::date_earned.desc(),
                    badge::goal_count_required.desc(),
                ))
                .limit(limit)
                .select((BadgeDB::as_select(), user_badge::date_earned))
                .load::<(BadgeDB, NaiveDateTime)>(conn)
                .into_core()?;
            Ok(rows
                .into_iter()
                .map(|(badge_db, date_earned)| EarnedBadge {
                    badge: Badge::from(badge_db),
                    date_earned,
                })
                .collect())
        })
    }
}
