//! Custom [axum::extract] Extractors.

pub mod json;
pub mod session;
pub mod session_addon;
