//! User domain models.

use serde::{Deserialize, Serialize};

/// Domain model representing a registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Stored verbatim; never serialized back out.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub profile_picture_data: Option<Vec<u8>>,
}

/// Input model for registering a new user
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_picture_data: Option<Vec<u8>>,
}

/// Partial profile update. `None` leaves a field untouched; for the picture,
/// `Some(None)` clears it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture_data: Option<Option<Vec<u8>>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.profile_picture_data.is_none()
    }
}

/// Rows removed by a full data wipe.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WipeReport {
    pub users: usize,
    pub quotes: usize,
}
