//! User documents.
//!
//! Users are keyed by username; the username is immutable after creation.
//! The password credential is stored verbatim, never hashed or
//! strengthened; login compares it by equality and every response strips
//! it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Record;

fn default_roles() -> Vec<String> {
    vec!["user".to_owned()]
}

const fn default_true() -> bool {
    true
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique name, doubles as the document's primary key.
    pub username: String,
    /// Unique across all users.
    #[serde(default)]
    pub email: String,
    /// Stored credential; never serialized once sanitized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub phone: String,
    /// Non-empty list of role names, defaults to `["user"]`.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub profile: Profile,
    /// Stamped on each successful login.
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Strip the stored credential before handing the user to a caller.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.password_hash = None;
        self
    }
}

impl Record for User {
    const COLLECTION: &'static str = "users";

    fn record_id(&self) -> &str {
        &self.username
    }
}

/// Embedded profile owned by a [`User`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    /// Base64 image payload, or empty for no image.
    #[serde(default)]
    pub image: String,
}

/// Sparse update for a [`User`].
///
/// The username is deliberately absent: it is the primary key and
/// immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub roles: Option<Vec<String>>,
    pub profile: Option<ProfilePatch>,
}

/// Sparse update for an embedded [`Profile`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}
