//! Schema creation and first-run seeding.
//!
//! The schema is a single idempotent DDL batch; there are no versioned
//! migrations. Seeding inserts reference rows only into empty tables.

use std::fmt;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use goalpost_core::badges::default_badge_catalog;
use goalpost_core::errors::{Error, Result};
use goalpost_core::sample_data::{sample_goals, sample_quotes, sample_user};

use crate::badges::BadgeDB;
use crate::errors::{IntoCore, StorageError};
use crate::goals::GoalDB;
use crate::quotes::NewQuoteDB;
use crate::schema::{badge, goal, quote, user};
use crate::users::UserDB;

/// Tables in foreign-key order. Must match `crate::schema`.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id                   TEXT PRIMARY KEY NOT NULL,
    username             TEXT NOT NULL UNIQUE,
    email                TEXT NOT NULL,
    password             TEXT NOT NULL,
    profile_picture_data BLOB
);

CREATE TABLE IF NOT EXISTS badge (
    id                  TEXT PRIMARY KEY NOT NULL,
    name                TEXT NOT NULL,
    description         TEXT NOT NULL,
    image_name          TEXT NOT NULL,
    goal_count_required INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS goal (
    id             TEXT PRIMARY KEY NOT NULL,
    user_id        TEXT NOT NULL REFERENCES user (id) ON DELETE CASCADE,
    title          TEXT NOT NULL CHECK (length(title) > 0),
    description    TEXT,
    category       TEXT,
    deadline       DATE,
    is_completed   BOOLEAN NOT NULL DEFAULT FALSE,
    progress       REAL NOT NULL DEFAULT 0,
    progress_diary BLOB NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_goal_user_id ON goal (user_id);

CREATE TABLE IF NOT EXISTS user_badge (
    user_id     TEXT NOT NULL REFERENCES user (id) ON DELETE CASCADE,
    badge_id    TEXT NOT NULL REFERENCES badge (id) ON DELETE CASCADE,
    date_earned TIMESTAMP NOT NULL,
    PRIMARY KEY (user_id, badge_id)
);

CREATE INDEX IF NOT EXISTS idx_user_badge_date_earned ON user_badge (user_id, date_earned);

CREATE TABLE IF NOT EXISTS quote (
    id     INTEGER PRIMARY KEY NOT NULL,
    quote  TEXT NOT NULL,
    author TEXT NOT NULL,
    html   TEXT
);
"#;

/// What `seed_if_empty` may insert besides the badge catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    /// Demo user, goals and quotes for development builds.
    pub sample_data: bool,
}

/// Rows inserted per table by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub badges: usize,
    pub users: usize,
    pub goals: usize,
    pub quotes: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.badges + self.users + self.goals + self.quotes == 0
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} badges, {} users, {} goals, {} quotes",
            self.badges, self.users, self.goals, self.quotes
        )
    }
}

/// Creates any missing table or index. Safe to run on every start.
pub fn ensure_schema(conn: &mut SqliteConnection) -> Result<()> {
    conn.batch_execute(SCHEMA_SQL).into_core()?;
    debug!("Schema ensured");
    Ok(())
}

/// Inserts reference data into empty tables, all in one transaction.
/// Tables that already hold rows are left alone.
pub fn seed_if_empty(conn: &mut SqliteConnection, options: &SeedOptions) -> Result<SeedReport> {
    let sample_data = options.sample_data;

    conn.immediate_transaction::<_, StorageError, _>(|conn| {
        let mut report = SeedReport::default();

        if badge::table.count().get_result::<i64>(conn)? == 0 {
            let badges: Vec<BadgeDB> = default_badge_catalog()
                .into_iter()
                .map(BadgeDB::from)
                .collect();
            report.badges = diesel::insert_into(badge::table)
                .values(&badges)
                .execute(conn)?;
        }

        if sample_data && user::table.count().get_result::<i64>(conn)? == 0 {
            let demo = sample_user();
            let goals = sample_goals(&demo.id)
                .into_iter()
                .map(GoalDB::try_from)
                .collect::<Result<Vec<_>>>()?;

            report.users = diesel::insert_into(user::table)
                .values(UserDB::from(demo))
                .execute(conn)?;
            report.goals = diesel::insert_into(goal::table)
                .values(&goals)
                .execute(conn)?;
        }

        if sample_data && quote::table.count().get_result::<i64>(conn)? == 0 {
            let quotes: Vec<NewQuoteDB> = sample_quotes().into_iter().map(NewQuoteDB::from).collect();
            report.quotes = diesel::insert_into(quote::table)
                .values(&quotes)
                .execute(conn)?;
        }

        Ok(report)
    })
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalpost_core::sample_data::SAMPLE_USER_ID;

    fn memory_conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
        #[derive(QueryableByName)]
        struct Count {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            n: i64,
        }
        diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {}", table))
            .get_result::<Count>(conn)
            .unwrap()
            .n
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();
        for table in ["user", "badge", "goal", "user_badge", "quote"] {
            assert_eq!(count(&mut conn, table), 0, "{}", table);
        }
    }

    #[test]
    fn test_seed_inserts_catalog_once() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn).unwrap();

        let first = seed_if_empty(&mut conn, &SeedOptions::default()).unwrap();
        assert_eq!(first.badges, 5);
        assert_eq!(first.users + first.goals + first.quotes, 0);

        let second = seed_if_empty(&mut conn, &SeedOptions::default()).unwrap();
        assert!(second.is_empty());
        assert_eq!(count(&mut conn, "badge"), 5);
    }

    #[test]
    fn test_seed_sample_data_only_into_empty_tables() {
        let mut conn = memory_conn();
        ensure_schema(&mut conn).unwrap();
        let options = SeedOptions { sample_data: true };

        let first = seed_if_empty(&mut conn, &options).unwrap();
        assert_eq!(first.users, 1);
        assert_eq!(first.goals, sample_goals(SAMPLE_USER_ID).len());
        assert_eq!(first.quotes, sample_quotes().len());

        let second = seed_if_empty(&mut conn, &options).unwrap();
        assert!(second.is_empty());
        assert_eq!(count(&mut conn, "user"), 1);
        assert_eq!(count(&mut conn, "goal"), first.goals as i64);
        assert_eq!(count(&mut conn, "quote"), first.quotes as i64);
    }

    #[test]
    fn test_seed_fails_without_schema() {
        let mut conn = memory_conn();
        assert!(seed_if_empty(&mut conn, &SeedOptions::default()).is_err());
    }
}
