//! Session model
//!
//! Sessions are issued elsewhere. This server only looks them up, by a keyed
//! hash of the bearer token, so the table never holds a usable token.

use crate::db::{schema::sessions, Conn};
use diesel::{dsl::now, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use hex::ToHex;
use jobtrail_core::OwnerId;

const TOKEN_HASH_CONTEXT: &str = "jobtrail-server 2024-05-01 session bearer tokens";

/// Hash a bearer token the way the `sessions` table stores it
pub fn hash_token(token: &str) -> String {
    blake3::derive_key(TOKEN_HASH_CONTEXT, token.as_bytes()).encode_hex()
}

/// The owner of an unexpired session, if there is one for this token
pub async fn find_owner(
    conn: &mut Conn<'_>,
    token: &str,
) -> Result<Option<OwnerId>, diesel::result::Error> {
    let owner: Option<String> = sessions::table
        .filter(sessions::token_hash.eq(hash_token(token)))
        .filter(sessions::expires_at.gt(now))
        .select(sessions::owner_id)
        .first(conn)
        .await
        .optional()?;

    Ok(owner.map(OwnerId::new))
}
