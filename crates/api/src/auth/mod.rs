//! Token validation against the external identity issuer.

pub mod jwt;
