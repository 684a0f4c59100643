//! Database models for users.

use diesel::prelude::*;
use goalpost_core::users::{NewUser, User, UserUpdate};
use uuid::Uuid;

/// Database model for users
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_picture_data: Option<Vec<u8>>,
}

/// Partial update; `None` fields are left out of the `UPDATE`.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = crate::schema::user)]
pub struct UserChangesetDB {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture_data: Option<Option<Vec<u8>>>,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            username: db.username,
            email: db.email,
            password: db.password,
            profile_picture_data: db.profile_picture_data,
        }
    }
}

impl From<User> for UserDB {
    fn from(domain: User) -> Self {
        Self {
            id: domain.id,
            username: domain.username,
            email: domain.email,
            password: domain.password,
            profile_picture_data: domain.profile_picture_data,
        }
    }
}

impl From<NewUser> for UserDB {
    fn from(domain: NewUser) -> Self {
        Self {
            id: domain.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            username: domain.username,
            email: domain.email,
            password: domain.password,
            profile_picture_data: domain.profile_picture_data,
        }
    }
}

impl From<UserUpdate> for UserChangesetDB {
    fn from(domain: UserUpdate) -> Self {
        Self {
            username: domain.username,
            email: domain.email,
            password: domain.password,
            profile_picture_data: domain.profile_picture_data,
        }
    }
}
