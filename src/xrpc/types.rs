//! Wire envelopes for the endpoints this crate calls
//!
//! Record values inside these envelopes stay as raw JSON; materializing them
//! into typed shapes is the codec registries' job, not the transport's.

use crate::records::Blob;
use crate::session::Session;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// `createSession` input
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Handle or other account identifier
    pub identifier: String,
    /// App password
    pub password: String,
}

/// Session fields as `createSession` and `refreshSession` return them
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    /// DID of the authenticated account
    pub did: String,
    /// Handle of the authenticated account
    pub handle: String,
    /// Email address; `refreshSession` omits it
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the email address is confirmed
    #[serde(default)]
    pub email_confirmed: bool,
    /// Access token
    pub access_jwt: String,
    /// Refresh token
    pub refresh_jwt: String,
}

impl From<SessionData> for Session {
    fn from(data: SessionData) -> Self {
        Session {
            did: data.did,
            handle: data.handle,
            email: data.email,
            email_confirmed: data.email_confirmed,
            access_jwt: data.access_jwt,
            refresh_jwt: data.refresh_jwt,
        }
    }
}

/// Structured failure body returned by every endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[serde(default)]
    pub error: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

/// `createRecord` input
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    /// DID of the repository to write into
    pub repo: String,
    /// Collection NSID
    pub collection: String,
    /// Record key; the server assigns one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rkey: Option<String>,
    /// The record value, already codec-encoded with its `$type`
    pub record: JsonValue,
}

/// `createRecord` output
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecordResponse {
    /// `at://` URI of the created record
    pub uri: String,
    /// Content hash of the created revision
    pub cid: String,
}

/// `deleteRecord` input
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordRequest {
    /// DID of the repository to delete from
    pub repo: String,
    /// Collection NSID
    pub collection: String,
    /// Record key
    pub rkey: String,
}

/// `getRecord` output
#[derive(Debug, Clone, Deserialize)]
pub struct GetRecordResponse {
    /// `at://` URI of the record
    pub uri: String,
    /// Content hash; servers may omit it
    #[serde(default)]
    pub cid: Option<String>,
    /// The raw record value
    pub value: JsonValue,
}

/// One entry of a `listRecords` page
#[derive(Debug, Clone, Deserialize)]
pub struct ListedRecord {
    /// `at://` URI of the record
    pub uri: String,
    /// Content hash of the listed revision
    pub cid: String,
    /// The raw record value
    pub value: JsonValue,
}

/// `listRecords` output
#[derive(Debug, Clone, Deserialize)]
pub struct ListRecordsResponse {
    /// The page of records, newest first
    pub records: Vec<ListedRecord>,
    /// Continuation cursor; absent on the final page
    #[serde(default)]
    pub cursor: Option<String>,
}

/// `uploadBlob` output
#[derive(Debug, Clone, Deserialize)]
pub struct UploadBlobResponse {
    /// Reference to the stored blob, for embedding into records
    pub blob: Blob,
}

/// `app.bsky.actor.getProfile` output
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// DID of the account
    pub did: String,
    /// Handle of the account
    pub handle: String,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Profile description
    #[serde(default)]
    pub description: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Banner image URL
    #[serde(default)]
    pub banner: Option<String>,
    /// Number of accounts following this one
    #[serde(default)]
    pub followers_count: Option<u64>,
    /// Number of accounts this one follows
    #[serde(default)]
    pub follows_count: Option<u64>,
    /// Number of posts
    #[serde(default)]
    pub posts_count: Option<u64>,
}
