//! Session management and proactive token refresh
//!
//! # Overview
//!
//! A successful `createSession` or `refreshSession` call yields an access
//! token and a refresh token. The access token is a self-contained JWT whose
//! payload carries its expiry; [`SessionKeeper`] reads that expiry (without
//! verifying the signature, since the token was just returned by the server
//! we authenticated against) and arranges exactly one future refresh, which on
//! success re-arms itself, keeping the session alive for as long as the
//! keeper runs.

mod keeper;
mod types;

pub use keeper::{KeeperStatus, RefreshSession, SessionKeeper, DEFAULT_SAFETY_MARGIN};
pub use types::{token_expiry, Session};
