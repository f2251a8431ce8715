//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the user behind a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireCoach`] -- Requires the `coach` role.

pub mod auth;
pub mod rbac;
