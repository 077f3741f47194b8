//! Database

pub mod connection;
pub mod migrations;

#[allow(missing_docs, unused_imports)]
pub mod schema;

pub use connection::{connect, ping, pool, Conn, Pool};
