//! Common types and protocol constants used throughout skylark
//!
//! This module contains shared type aliases and the wire-level constants
//! (discriminators, collection NSIDs, protocol limits) used across modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Wire Constants
// ============================================================================

/// Reserved field naming which variant a tagged document represents
pub const TYPE_FIELD: &str = "$type";

/// Maximum page size accepted by `com.atproto.repo.listRecords`
pub const LIST_RECORDS_MAX_LIMIT: u32 = 100;

/// Collection that plain posts are written to
pub const DEFAULT_POST_COLLECTION: &str = "app.bsky.feed.post";

/// Discriminator values for the record and embed shapes this crate ships with
pub mod type_name {
    /// A binary blob reference
    pub const BLOB: &str = "blob";

    /// Embed: one to four images
    pub const EMBED_IMAGES: &str = "app.bsky.embed.images";
    /// Embed: external website card
    pub const EMBED_EXTERNAL: &str = "app.bsky.embed.external";
    /// Embed: quoted record
    pub const EMBED_RECORD: &str = "app.bsky.embed.record";
    /// Embed: quoted record plus attached media
    pub const EMBED_RECORD_WITH_MEDIA: &str = "app.bsky.embed.recordWithMedia";

    /// Record value: a feed post
    pub const FEED_POST: &str = "app.bsky.feed.post";
    /// Record value: a follow relationship
    pub const GRAPH_FOLLOW: &str = "app.bsky.graph.follow";
    /// Record value: a block relationship
    pub const GRAPH_BLOCK: &str = "app.bsky.graph.block";
}

// ============================================================================
// Utilities
// ============================================================================

/// Extract the record key (final path segment) from an `at://` record URI
pub fn record_key_from_uri(uri: &str) -> Option<&str> {
    uri.rsplit('/').next().filter(|key| !key.is_empty())
}
