//! Protocol record shapes
//!
//! # Overview
//!
//! The concrete variants that make up the crate's built-in capability sets:
//! embeds, embeddable media, and record values, plus the supporting wire
//! shapes they reference (blobs, strong refs, reply refs).
//!
//! Polymorphic values ([`Embed`], [`EmbedMedia`], [`RecordValue`]) are plain
//! enums; their wire form goes through the registries bundled in [`Codecs`].

mod codecs;
mod embed;
mod value;

pub use codecs::Codecs;
pub use embed::{
    Blob, BlobRef, Embed, EmbedExternal, EmbedImage, EmbedImages, EmbedRecord,
    EmbedRecordWithMedia, EmbedMedia, External, StrongRef,
};
pub use value::{BlockRecord, FollowRecord, Post, Record, RecordValue, ReplyRef};
