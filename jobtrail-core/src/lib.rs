#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unreachable_pub)]

//! jobtrail-core
//!
//! Application records plus the pieces of logic that work on them without any
//! I/O: date shorthand expansion, display ordering and per-field search.

pub mod common;
pub mod date;
pub mod filter;
pub mod ranking;
pub mod record;
pub mod status;

pub use filter::{CompanyCounts, SearchTerms};
pub use record::{ApplicationChanges, ApplicationInput, ApplicationRecord, NewApplication, OwnerId};
pub use status::ApplicationStatus;
