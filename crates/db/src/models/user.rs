//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use totalgrind_core::coaching::AthleteLink;
use totalgrind_core::roles::Role;
use totalgrind_core::types::{DbId, Timestamp};

/// Full user record.
///
/// Credentials are owned by the external identity provider, so the record is
/// safe to serialize as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Athlete side: linked coach and pending invitations.
    #[serde(flatten)]
    pub link: AthleteLink,
    /// Coach side: athletes on this coach's roster.
    pub athletes: Vec<DbId>,
    pub profile_picture: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_coach(&self) -> bool {
        self.role == Role::Coach
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Minimal public view used in rosters and coach references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
