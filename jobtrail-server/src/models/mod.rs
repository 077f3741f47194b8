//! Database models backing the Postgres setup.
pub mod application;
pub mod session;
