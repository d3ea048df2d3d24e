//! XRPC transport plumbing
//!
//! The transport layer speaks the protocol's HTTP flavor: queries are GETs
//! and procedures are JSON POSTs, both addressed as `/xrpc/{nsid}`. Failed
//! calls carry a structured `{ error, message }` body which is surfaced as
//! [`Error::Protocol`](crate::error::Error::Protocol); calls are never
//! retried here. A client-wide token bucket paces outgoing requests.

pub mod endpoints;

mod client;
mod rate_limit;
mod types;

pub use client::{SessionStore, XrpcClient, XrpcConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use types::{
    CreateRecordRequest, CreateRecordResponse, CreateSessionRequest, DeleteRecordRequest,
    GetRecordResponse, ListRecordsResponse, ListedRecord, Profile, SessionData,
    UploadBlobResponse,
};
