//! High-level client tying transport, codecs, pagination, and the keeper
//! together
//!
//! An [`Agent`] owns one [`XrpcClient`] and its shared session store. After
//! [`login`](Agent::login) the access token flows into every call
//! automatically, a [`SessionKeeper`] chain keeps it fresh in the background,
//! and repository reads come back as typed [`Record`]s via the standard
//! codec registries.

use crate::error::{Error, Result};
use crate::pagination::{FetchPage, Page, Pager};
use crate::records::{Blob, Codecs, Post, Record, RecordValue};
use crate::session::{KeeperStatus, RefreshSession, Session, SessionKeeper};
use crate::types::{record_key_from_uri, DEFAULT_POST_COLLECTION, LIST_RECORDS_MAX_LIMIT};
use crate::xrpc::{
    endpoints, CreateRecordRequest, CreateRecordResponse, CreateSessionRequest,
    DeleteRecordRequest, GetRecordResponse, ListRecordsResponse, Profile, SessionData,
    SessionStore, UploadBlobResponse, XrpcClient, XrpcConfig,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Options for [`Agent::list_records`]
#[derive(Debug, Clone)]
pub struct ListRecordsOptions {
    /// Page size requested per fetch, clamped to the protocol maximum
    pub limit: u32,
    /// Minimum interval between consecutive page fetches
    pub min_interval: Duration,
}

impl Default for ListRecordsOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            min_interval: Duration::from_secs(1),
        }
    }
}

/// High-level client for one account on one service
pub struct Agent {
    xrpc: Arc<XrpcClient>,
    session: SessionStore,
    codecs: Codecs,
    keeper: SessionKeeper,
}

impl Agent {
    /// Create an agent for `service` (e.g. `https://bsky.social`)
    pub fn new(service: &str) -> Result<Self> {
        Self::with_config(service, XrpcConfig::default())
    }

    /// Create an agent with a custom transport configuration
    pub fn with_config(service: &str, config: XrpcConfig) -> Result<Self> {
        let xrpc = Arc::new(XrpcClient::with_config(service, config)?);
        let session = xrpc.session_store();
        let keeper = SessionKeeper::new(Arc::new(SessionRefresher {
            xrpc: Arc::clone(&xrpc),
            session: Arc::clone(&session),
        }));

        Ok(Self {
            xrpc,
            session,
            codecs: Codecs::standard(),
            keeper,
        })
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Authenticate with an identifier and app password.
    ///
    /// On success the session is stored for subsequent calls and the keeper
    /// chain starts refreshing it ahead of expiry.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session> {
        let input = CreateSessionRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };
        let data: SessionData = self
            .xrpc
            .procedure(endpoints::CREATE_SESSION, &input)
            .await?;
        let session: Session = data.into();

        *self.session.write().await = Some(session.clone());
        self.keeper.watch(session.clone())?;
        info!(handle = %session.handle, "logged in");
        Ok(session)
    }

    /// Exchange the current refresh token for a new session immediately.
    ///
    /// The keeper does this on its own schedule; this call is for forcing a
    /// refresh out of band. The chain re-arms from the new expiry.
    pub async fn refresh_session(&self) -> Result<Session> {
        let refresh_jwt = self.require_session().await?.refresh_jwt;
        let data: SessionData = self
            .xrpc
            .procedure_with_token(endpoints::REFRESH_SESSION, &refresh_jwt)
            .await?;
        let session: Session = data.into();

        *self.session.write().await = Some(session.clone());
        self.keeper.watch(session.clone())?;
        Ok(session)
    }

    /// Revoke the session server-side and stop the keeper chain
    pub async fn logout(&self) -> Result<()> {
        self.keeper.shutdown();
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        self.xrpc
            .procedure_with_token_unit(endpoints::DELETE_SESSION, &session.refresh_jwt)
            .await?;
        info!(handle = %session.handle, "logged out");
        Ok(())
    }

    /// The current session, if logged in
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Observe the keeper's refresh-chain state
    pub fn keeper_status(&self) -> watch::Receiver<KeeperStatus> {
        self.keeper.status()
    }

    // ========================================================================
    // Repository operations
    // ========================================================================

    /// Publish a post to the authenticated account's repository
    pub async fn create_post(&self, post: Post) -> Result<CreateRecordResponse> {
        self.create_record(DEFAULT_POST_COLLECTION, None, &RecordValue::Post(post))
            .await
    }

    /// Write a record into a collection of the authenticated account's
    /// repository. The server assigns the record key when `rkey` is absent.
    pub async fn create_record(
        &self,
        collection: &str,
        rkey: Option<String>,
        value: &RecordValue,
    ) -> Result<CreateRecordResponse> {
        let session = self.require_session().await?;
        let input = CreateRecordRequest {
            repo: session.did,
            collection: collection.to_string(),
            rkey,
            record: self.codecs.values.encode(value)?,
        };
        self.xrpc.procedure(endpoints::CREATE_RECORD, &input).await
    }

    /// Delete a record from the authenticated account's repository
    pub async fn delete_record(&self, collection: &str, rkey: &str) -> Result<()> {
        let session = self.require_session().await?;
        let input = DeleteRecordRequest {
            repo: session.did,
            collection: collection.to_string(),
            rkey: rkey.to_string(),
        };
        self.xrpc
            .procedure_unit(endpoints::DELETE_RECORD, &input)
            .await
    }

    /// Delete one of the authenticated account's posts by its `at://` URI
    pub async fn delete_post(&self, uri: &str) -> Result<()> {
        let rkey = record_key_from_uri(uri)
            .ok_or_else(|| Error::session(format!("'{uri}' has no record key")))?;
        self.delete_record(DEFAULT_POST_COLLECTION, rkey).await
    }

    /// Fetch a single record and materialize its value
    pub async fn get_record(&self, repo: &str, collection: &str, rkey: &str) -> Result<Record> {
        let params = [
            ("repo", repo.to_string()),
            ("collection", collection.to_string()),
            ("rkey", rkey.to_string()),
        ];
        let response: GetRecordResponse =
            self.xrpc.query(endpoints::GET_RECORD, &params).await?;
        self.codecs.decode_record(
            response.uri,
            response.cid.unwrap_or_default(),
            &response.value,
        )
    }

    /// Fetch an account's profile view
    pub async fn get_profile(&self, actor: &str) -> Result<Profile> {
        let params = [("actor", actor.to_string())];
        self.xrpc.query(endpoints::GET_PROFILE, &params).await
    }

    /// Upload raw bytes as a blob, for embedding into records
    pub async fn upload_blob(&self, bytes: Vec<u8>, mime_type: &str) -> Result<Blob> {
        let response: UploadBlobResponse = self
            .xrpc
            .upload(endpoints::UPLOAD_BLOB, bytes, mime_type)
            .await?;
        Ok(response.blob)
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Lazily page through a collection of `repo`, newest first.
    ///
    /// Nothing is fetched until the returned pager is first advanced; pages
    /// arrive strictly sequentially, paced by `options.min_interval`.
    pub fn list_records(
        &self,
        repo: &str,
        collection: &str,
        options: ListRecordsOptions,
    ) -> Pager<Record> {
        let fetcher = ListRecordsFetcher {
            xrpc: Arc::clone(&self.xrpc),
            codecs: self.codecs.clone(),
            repo: repo.to_string(),
            collection: collection.to_string(),
            limit: options.limit.min(LIST_RECORDS_MAX_LIMIT),
        };
        Pager::new(fetcher, options.min_interval)
    }

    /// Lazily page through an account's posts
    pub fn list_posts(&self, repo: &str, options: ListRecordsOptions) -> Pager<Record> {
        self.list_records(repo, DEFAULT_POST_COLLECTION, options)
    }

    async fn require_session(&self) -> Result<Session> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::session("not logged in"))
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("service", &self.xrpc.service().as_str())
            .finish_non_exhaustive()
    }
}

/// The keeper's view of the refresh endpoint: refresh over XRPC, then
/// publish the superseding session to the shared store.
struct SessionRefresher {
    xrpc: Arc<XrpcClient>,
    session: SessionStore,
}

#[async_trait]
impl RefreshSession for SessionRefresher {
    async fn refresh_session(&self, refresh_jwt: &str) -> Result<Session> {
        let data: SessionData = self
            .xrpc
            .procedure_with_token(endpoints::REFRESH_SESSION, refresh_jwt)
            .await?;
        let session: Session = data.into();
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }
}

/// One `listRecords` page fetch, decoded through the standard registries
struct ListRecordsFetcher {
    xrpc: Arc<XrpcClient>,
    codecs: Codecs,
    repo: String,
    collection: String,
    limit: u32,
}

#[async_trait]
impl FetchPage<Record> for ListRecordsFetcher {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<Record>> {
        let mut params = vec![
            ("repo", self.repo.clone()),
            ("collection", self.collection.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }

        let response: ListRecordsResponse =
            self.xrpc.query(endpoints::LIST_RECORDS, &params).await?;
        let mut items = Vec::with_capacity(response.records.len());
        for listed in response.records {
            items.push(
                self.codecs
                    .decode_record(listed.uri, listed.cid, &listed.value)?,
            );
        }
        Ok(Page::new(items, response.cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_records_constructs_lazily() {
        let agent = Agent::new("https://bsky.social").unwrap();
        let options = ListRecordsOptions {
            limit: 500,
            ..ListRecordsOptions::default()
        };
        // Construction alone performs no I/O.
        let pager = agent.list_records("did:plc:alice", DEFAULT_POST_COLLECTION, options);
        assert!(!pager.is_exhausted());
        assert_eq!(pager.fetched(), 0);
    }

    #[tokio::test]
    async fn test_repo_operations_require_login() {
        let agent = Agent::new("https://bsky.social").unwrap();
        let err = agent.create_post(Post::new("hello")).await.unwrap_err();
        assert!(matches!(err, Error::Session { .. }));
    }
}
