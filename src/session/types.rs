//! Session data and access-token expiry decoding

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// An authenticated session.
///
/// Superseded, never mutated: each successful refresh produces a whole new
/// access/refresh pair and the previous session is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// DID of the authenticated account
    pub did: String,
    /// Handle of the authenticated account
    pub handle: String,
    /// Email address, when the server shares it
    pub email: Option<String>,
    /// Whether the email address is confirmed
    pub email_confirmed: bool,
    /// Bearer credential for all subsequent calls
    pub access_jwt: String,
    /// Bearer credential valid only for the refresh endpoint
    pub refresh_jwt: String,
}

impl Session {
    /// Expiry instant embedded in the access token
    pub fn expires_at(&self) -> Result<DateTime<Utc>> {
        token_expiry(&self.access_jwt)
    }
}

/// Decode the expiry instant embedded in a JWT without verifying its
/// signature.
///
/// The token is implicitly trusted because it was just returned by the same
/// authenticated call. Only the payload segment is parsed; the protocol's
/// signing algorithms are irrelevant here.
pub fn token_expiry(token: &str) -> Result<DateTime<Utc>> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return Err(Error::token_decode("token is not a three-segment JWT")),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error::token_decode(format!("payload is not base64url: {e}")))?;

    #[derive(Deserialize)]
    struct Claims {
        exp: i64,
    }
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| Error::token_decode(format!("payload has no usable exp claim: {e}")))?;

    Utc.timestamp_opt(claims.exp, 0)
        .single()
        .ok_or_else(|| Error::token_decode(format!("exp {} is out of range", claims.exp)))
}
