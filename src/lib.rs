// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]

//! # Skylark
//!
//! An async client library for AT Protocol (Bluesky-style) services, built
//! around three mechanisms:
//!
//! - **Tagged-union codec**: the protocol's records are schemaless JSON
//!   documents discriminated by a `$type` field. [`codec::Registry`] maps
//!   discriminators to encode/decode functions; unknown variants surface as
//!   errors carrying the exact discriminator instead of being guessed at.
//! - **Cursor-paginated lazy sequences**: [`pagination::Pager`] pulls remote
//!   collections one page at a time, on demand, pacing consecutive fetches
//!   to stay polite to the server.
//! - **Session keeper**: [`session::SessionKeeper`] reads the expiry baked
//!   into each access token and refreshes the session shortly before it,
//!   re-arming itself after every successful refresh.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skylark::{Agent, ListRecordsOptions, Post, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let agent = Agent::new("https://bsky.social")?;
//!     agent.login("alice.example.com", "app-password").await?;
//!
//!     // Publish a post
//!     agent.create_post(Post::new("hello from skylark")).await?;
//!
//!     // Walk the account's posts lazily, one page at a time
//!     let mut posts = agent.list_posts("alice.example.com", ListRecordsOptions::default());
//!     while let Some(record) = posts.advance().await? {
//!         let post = record.value.expect_post()?;
//!         println!("{}", post.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for skylark
pub mod error;

/// Common types and protocol constants
pub mod types;

/// Tagged-union codec registries
pub mod codec;

/// Built-in record and embed shapes with their standard registries
pub mod records;

/// Cursor-driven lazy pagination
pub mod pagination;

/// Sessions and the proactive refresh keeper
pub mod session;

/// XRPC transport plumbing
pub mod xrpc;

/// High-level client
pub mod agent;

// ============================================================================
// Re-exports
// ============================================================================

pub use agent::{Agent, ListRecordsOptions};
pub use error::{Error, Result};
pub use pagination::{FetchPage, Page, Pager};
pub use records::{Codecs, Embed, Post, Record, RecordValue};
pub use session::{KeeperStatus, Session, SessionKeeper};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
