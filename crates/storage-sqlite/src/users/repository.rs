use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use goalpost_core::errors::{Error, Result};
use goalpost_core::users::{NewUser, User, UserRepositoryTrait, UserUpdate, WipeReport};

use super::model::{UserChangesetDB, UserDB};
use crate::db::{read_snapshot, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{quote, user};

pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        UserRepository { pool, writer }
    }

    fn find(conn: &mut SqliteConnection, user_id: &str) -> Result<UserDB> {
        user::table
            .find(user_id)
            .select(UserDB::as_select())
            .first(conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    /// Whether `username` belongs to a user other than `except_id`.
    fn username_taken(
        conn: &mut SqliteConnection,
        username: &str,
        except_id: Option<&str>,
    ) -> Result<bool> {
        let mut query = user::table
            .filter(user::username.eq(username))
            .select(user::id)
            .into_boxed();
        if let Some(except_id) = except_id {
            query = query.filter(user::id.ne(except_id));
        }
        Ok(query.first::<String>(conn).optional().into_core()?.is_some())
    }
}

/// A unique violation on the username index surfaces as `UsernameTaken`.
fn username_conflict(err: DieselError, username: &str) -> Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.message().contains("username") =>
        {
            Error::UsernameTaken(username.to_string())
        }
        other => StorageError::from(other).into(),
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let user_db = UserDB::from(new_user);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                if Self::username_taken(conn, &user_db.username, None)? {
                    return Err(Error::UsernameTaken(user_db.username));
                }
                let inserted = diesel::insert_into(user::table)
                    .values(&user_db)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(|e| username_conflict(e, &user_db.username))?;
                debug!("Created user {}", inserted.id);
                Ok(User::from(inserted))
            })
            .await
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        read_snapshot(&self.pool, |conn| Self::find(conn, user_id).map(User::from))
    }

    fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        read_snapshot(&self.pool, |conn| {
            let found = user::table
                .filter(user::username.eq(username))
                .select(UserDB::as_select())
                .first(conn)
                .optional()
                .into_core()?;
            Ok(found.map(User::from))
        })
    }

    fn verify_password(&self, user_id: &str, candidate: &str) -> Result<bool> {
        read_snapshot(&self.pool, |conn| {
            let stored = user::table
                .find(user_id)
                .select(user::password)
                .first::<String>(conn)
                .optional()
                .into_core()?
                .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
            Ok(stored == candidate)
        })
    }

    async fn update(&self, user_id: &str, changes: UserUpdate) -> Result<User> {
        let user_id = user_id.to_string();
        let changeset = UserChangesetDB::from(changes);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let current = Self::find(conn, &user_id)?;

                if let Some(username) = &changeset.username {
                    if Self::username_taken(conn, username, Some(&user_id))? {
                        return Err(Error::UsernameTaken(username.clone()));
                    }
                }

                let nothing_to_set = changeset.username.is_none()
                    && changeset.email.is_none()
                    && changeset.password.is_none()
                    && changeset.profile_picture_data.is_none();
                if nothing_to_set {
                    return Ok(User::from(current));
                }

                let updated = diesel::update(user::table.find(&user_id))
                    .set(&changeset)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        username_conflict(e, changeset.username.as_deref().unwrap_or_default())
                    })?;
                Ok(User::from(updated))
            })
            .await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(user::table).execute(conn).into_core()
            })
            .await
    }

    async fn wipe_all(&self) -> Result<WipeReport> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<WipeReport> {
                let users = diesel::delete(user::table).execute(conn).into_core()?;
                let quotes = diesel::delete(quote::table).execute(conn).into_core()?;
                Ok(WipeReport { users, quotes })
            })
            .await
    }
}
