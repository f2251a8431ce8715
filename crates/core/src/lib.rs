//! Domain types and pure logic for the TotalGrind training log.
//!
//! Nothing in this crate touches I/O: persistence lives in `totalgrind-db`
//! and HTTP in `totalgrind-api`.

pub mod block_access;
pub mod coaching;
pub mod error;
pub mod one_rep_max;
pub mod progress;
pub mod roles;
pub mod training;
pub mod types;
