//! Well-known role names and the [`Role`] enum.
//!
//! These must match the `CHECK` constraint on `users.role` in the initial
//! migration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ATHLETE: &str = "athlete";
pub const ROLE_COACH: &str = "coach";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Athlete,
    Coach,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Athlete => ROLE_ATHLETE,
            Self::Coach => ROLE_COACH,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Roles a user may switch to on their own. Admin is granted only through
    /// the admin API.
    pub fn is_self_assignable(self) -> bool {
        matches!(self, Self::Athlete | Self::Coach)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ATHLETE => Ok(Self::Athlete),
            ROLE_COACH => Ok(Self::Coach),
            ROLE_ADMIN => Ok(Self::Admin),
            other => Err(CoreError::Validation(format!("Invalid role '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_roles() {
        for role in [Role::Athlete, Role::Coach, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("Coach".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn admin_is_not_self_assignable() {
        assert!(Role::Athlete.is_self_assignable());
        assert!(Role::Coach.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
    }
}
