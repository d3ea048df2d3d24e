//! Record values: the shapes stored in a repository collection

use super::embed::{Embed, StrongRef};
use crate::codec::Tagged;
use crate::error::{Error, Result};
use crate::types::type_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Any record value this crate knows how to materialize.
///
/// The "any record value" capability set. Accessors return
/// [`Error::UnexpectedRecordShape`] when the caller required a different
/// kind than the wire delivered, which signals a protocol/data-model
/// mismatch rather than corruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    /// A feed post
    Post(Post),
    /// A follow relationship
    Follow(FollowRecord),
    /// A block relationship
    Block(BlockRecord),
}

impl Tagged for RecordValue {
    fn discriminator(&self) -> &'static str {
        match self {
            RecordValue::Post(_) => type_name::FEED_POST,
            RecordValue::Follow(_) => type_name::GRAPH_FOLLOW,
            RecordValue::Block(_) => type_name::GRAPH_BLOCK,
        }
    }
}

impl RecordValue {
    /// Require this value to be a post
    pub fn expect_post(self) -> Result<Post> {
        match self {
            RecordValue::Post(post) => Ok(post),
            other => Err(Error::unexpected_shape("post", other.discriminator())),
        }
    }

    /// Require this value to be a follow record
    pub fn expect_follow(self) -> Result<FollowRecord> {
        match self {
            RecordValue::Follow(follow) => Ok(follow),
            other => Err(Error::unexpected_shape("follow", other.discriminator())),
        }
    }

    /// Require this value to be a block record
    pub fn expect_block(self) -> Result<BlockRecord> {
        match self {
            RecordValue::Block(block) => Ok(block),
            other => Err(Error::unexpected_shape("block", other.discriminator())),
        }
    }
}

/// A feed post.
///
/// `embed` is polymorphic, so the post's wire codec dispatches it through
/// the embed registry rather than plain serde.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Post text
    pub text: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// BCP-47 language codes of the text
    pub langs: Option<Vec<String>>,
    /// Attached embed, if any
    pub embed: Option<Embed>,
    /// Reply position, if the post is a reply
    pub reply: Option<ReplyRef>,
}

impl Post {
    /// Create a post with the given text, stamped now
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
            langs: None,
            embed: None,
            reply: None,
        }
    }

    /// Set the language codes
    #[must_use]
    pub fn with_langs(mut self, langs: Vec<String>) -> Self {
        self.langs = Some(langs);
        self
    }

    /// Attach an embed
    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Mark the post as a reply
    #[must_use]
    pub fn with_reply(mut self, reply: ReplyRef) -> Self {
        self.reply = Some(reply);
        self
    }
}

/// Reply position of a post within a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    /// Root of the thread
    pub root: StrongRef,
    /// Direct parent being replied to
    pub parent: StrongRef,
}

/// `app.bsky.graph.follow` record value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRecord {
    /// DID of the followed account
    pub subject: String,
    /// When the follow was created
    pub created_at: DateTime<Utc>,
}

/// `app.bsky.graph.block` record value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// DID of the blocked account
    pub subject: String,
    /// When the block was created
    pub created_at: DateTime<Utc>,
}

/// A record as listed from a repository: envelope plus decoded value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// `at://` URI of the record
    pub uri: String,
    /// Content hash of the record revision
    pub cid: String,
    /// The decoded record value
    pub value: RecordValue,
}
