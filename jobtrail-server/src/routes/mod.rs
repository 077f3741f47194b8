//! Routes for [axum::Router].

pub mod applications;
pub mod fallback;
pub mod health;
pub mod ping;
