//! NSIDs of the endpoints this crate calls

/// `com.atproto.server.createSession`
pub const CREATE_SESSION: &str = "com.atproto.server.createSession";
/// `com.atproto.server.refreshSession`
pub const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";
/// `com.atproto.server.deleteSession`
pub const DELETE_SESSION: &str = "com.atproto.server.deleteSession";

/// `com.atproto.repo.createRecord`
pub const CREATE_RECORD: &str = "com.atproto.repo.createRecord";
/// `com.atproto.repo.deleteRecord`
pub const DELETE_RECORD: &str = "com.atproto.repo.deleteRecord";
/// `com.atproto.repo.getRecord`
pub const GET_RECORD: &str = "com.atproto.repo.getRecord";
/// `com.atproto.repo.listRecords`
pub const LIST_RECORDS: &str = "com.atproto.repo.listRecords";
/// `com.atproto.repo.uploadBlob`
pub const UPLOAD_BLOB: &str = "com.atproto.repo.uploadBlob";

/// `app.bsky.actor.getProfile`
pub const GET_PROFILE: &str = "app.bsky.actor.getProfile";
