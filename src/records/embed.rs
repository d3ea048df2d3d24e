//! Embed shapes and the supporting blob/reference types

use crate::codec::Tagged;
use crate::types::type_name;
use serde::{Deserialize, Serialize};

/// Any embed that can be attached to a post.
///
/// This is the "any embed" capability set; servers are free to introduce
/// further kinds, which surface as `UnsupportedVariant` until registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    /// One to four images
    Images(EmbedImages),
    /// External website card
    External(EmbedExternal),
    /// Quoted record
    Record(EmbedRecord),
    /// Quoted record plus attached media
    RecordWithMedia(EmbedRecordWithMedia),
}

impl Tagged for Embed {
    fn discriminator(&self) -> &'static str {
        match self {
            Embed::Images(_) => type_name::EMBED_IMAGES,
            Embed::External(_) => type_name::EMBED_EXTERNAL,
            Embed::Record(_) => type_name::EMBED_RECORD,
            Embed::RecordWithMedia(_) => type_name::EMBED_RECORD_WITH_MEDIA,
        }
    }
}

/// Media that can ride along with a quoted record.
///
/// A strict subset of [`Embed`]; its own capability set because the wire
/// protocol constrains the `media` position of `recordWithMedia` to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedMedia {
    /// One to four images
    Images(EmbedImages),
    /// External website card
    External(EmbedExternal),
}

impl Tagged for EmbedMedia {
    fn discriminator(&self) -> &'static str {
        match self {
            EmbedMedia::Images(_) => type_name::EMBED_IMAGES,
            EmbedMedia::External(_) => type_name::EMBED_EXTERNAL,
        }
    }
}

impl From<EmbedMedia> for Embed {
    fn from(media: EmbedMedia) -> Self {
        match media {
            EmbedMedia::Images(images) => Embed::Images(images),
            EmbedMedia::External(external) => Embed::External(external),
        }
    }
}

/// `app.bsky.embed.images` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImages {
    /// The attached images, in display order
    pub images: Vec<EmbedImage>,
}

/// One image within an [`EmbedImages`] embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    /// Alt text for the image
    pub alt: String,
    /// The uploaded image blob
    pub image: Blob,
}

/// `app.bsky.embed.external` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedExternal {
    /// The website card
    pub external: External,
}

/// An external website card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct External {
    /// Link to the external website
    pub uri: String,
    /// Title of the card
    pub title: String,
    /// Description of the card
    pub description: String,
    /// Optional thumbnail blob
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<Blob>,
}

/// `app.bsky.embed.record` payload (a quote)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRecord {
    /// Strong reference to the quoted record
    pub record: StrongRef,
}

/// `app.bsky.embed.recordWithMedia` payload.
///
/// The `media` field is itself polymorphic, so this shape cannot round-trip
/// through plain serde; its codec dispatches through the media registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRecordWithMedia {
    /// The quoted record
    pub record: EmbedRecord,
    /// Media attached alongside the quote
    pub media: EmbedMedia,
}

/// A strong (uri + cid) reference to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongRef {
    /// `at://` URI of the record
    pub uri: String,
    /// Content hash of the referenced revision
    pub cid: String,
}

impl StrongRef {
    /// Create a strong reference
    pub fn new(uri: impl Into<String>, cid: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            cid: cid.into(),
        }
    }
}

/// A reference to an uploaded binary blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// Always `"blob"`; blobs are self-describing like tagged records
    #[serde(rename = "$type")]
    pub type_name: String,
    /// Content-addressed link to the blob bytes
    #[serde(rename = "ref")]
    pub blob_ref: BlobRef,
    /// MIME type of the blob
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
}

impl Blob {
    /// Create a blob reference
    pub fn new(blob_ref: BlobRef, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            type_name: type_name::BLOB.to_string(),
            blob_ref,
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// The content-addressed link inside a [`Blob`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    /// CID of the blob bytes
    #[serde(rename = "$link")]
    pub link: String,
}
