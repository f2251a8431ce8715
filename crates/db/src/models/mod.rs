pub mod block;
pub mod user;
