//! Standard registries for the built-in capability sets

use super::embed::{Embed, EmbedExternal, EmbedImages, EmbedRecord, EmbedRecordWithMedia, EmbedMedia};
use super::value::{BlockRecord, FollowRecord, Post, Record, RecordValue, ReplyRef};
use crate::codec::{fields_of, Registry, Tagged};
use crate::error::{Error, Result};
use crate::types::{type_name, JsonObject, JsonValue};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// The wired-together registries for the crate's built-in capability sets.
///
/// Constructed explicitly and passed in wherever polymorphic decode/encode
/// happens; composite variants (`recordWithMedia`, a post with an embed)
/// recursively dispatch through the inner registries captured here. Tests
/// that need fixture variants build their own [`Registry`] instead of
/// touching these.
#[derive(Debug, Clone)]
pub struct Codecs {
    /// Capability: any embed
    pub embeds: Arc<Registry<Embed>>,
    /// Capability: embeddable media
    pub media: Arc<Registry<EmbedMedia>>,
    /// Capability: any record value
    pub values: Arc<Registry<RecordValue>>,
}

impl Codecs {
    /// Build the standard registries
    pub fn standard() -> Self {
        let media = Arc::new(media_registry());
        let embeds = Arc::new(embed_registry(Arc::clone(&media)));
        let values = Arc::new(value_registry(Arc::clone(&embeds)));
        Self {
            embeds,
            media,
            values,
        }
    }

    /// Decode a listed record's raw value into a [`Record`]
    pub fn decode_record(
        &self,
        uri: impl Into<String>,
        cid: impl Into<String>,
        value: &JsonValue,
    ) -> Result<Record> {
        Ok(Record {
            uri: uri.into(),
            cid: cid.into(),
            value: self.values.decode(value)?,
        })
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Self::standard()
    }
}

fn media_registry() -> Registry<EmbedMedia> {
    Registry::builder("embed media")
        .variant(
            type_name::EMBED_IMAGES,
            |value| match value {
                EmbedMedia::Images(images) => fields_of(images),
                other => Err(Error::unexpected_shape("images", other.discriminator())),
            },
            |document| Ok(EmbedMedia::Images(serde_json::from_value(document.clone())?)),
        )
        .variant(
            type_name::EMBED_EXTERNAL,
            |value| match value {
                EmbedMedia::External(external) => fields_of(external),
                other => Err(Error::unexpected_shape("external", other.discriminator())),
            },
            |document| Ok(EmbedMedia::External(serde_json::from_value(document.clone())?)),
        )
        .build()
}

fn embed_registry(media: Arc<Registry<EmbedMedia>>) -> Registry<Embed> {
    let encode_media = Arc::clone(&media);
    Registry::builder("embed")
        .variant(
            type_name::EMBED_IMAGES,
            |value| match value {
                Embed::Images(images) => fields_of(images),
                other => Err(Error::unexpected_shape("images", other.discriminator())),
            },
            |document| Ok(Embed::Images(serde_json::from_value(document.clone())?)),
        )
        .variant(
            type_name::EMBED_EXTERNAL,
            |value| match value {
                Embed::External(external) => fields_of(external),
                other => Err(Error::unexpected_shape("external", other.discriminator())),
            },
            |document| Ok(Embed::External(serde_json::from_value(document.clone())?)),
        )
        .variant(
            type_name::EMBED_RECORD,
            |value| match value {
                Embed::Record(record) => fields_of(record),
                other => Err(Error::unexpected_shape("record", other.discriminator())),
            },
            |document| Ok(Embed::Record(serde_json::from_value(document.clone())?)),
        )
        .variant(
            type_name::EMBED_RECORD_WITH_MEDIA,
            move |value| match value {
                Embed::RecordWithMedia(embed) => {
                    let mut fields = JsonObject::new();
                    fields.insert("record".to_string(), serde_json::to_value(&embed.record)?);
                    fields.insert("media".to_string(), encode_media.encode(&embed.media)?);
                    Ok(fields)
                }
                other => Err(Error::unexpected_shape("recordWithMedia", other.discriminator())),
            },
            move |document| {
                #[derive(Deserialize)]
                struct Outer {
                    record: EmbedRecord,
                }
                let outer: Outer = serde_json::from_value(document.clone())?;
                let media_doc = document
                    .get("media")
                    .ok_or_else(|| Error::malformed_envelope("embed media"))?;
                Ok(Embed::RecordWithMedia(EmbedRecordWithMedia {
                    record: outer.record,
                    media: media.decode(media_doc)?,
                }))
            },
        )
        .build()
}

fn value_registry(embeds: Arc<Registry<Embed>>) -> Registry<RecordValue> {
    let decode_embeds = Arc::clone(&embeds);
    Registry::builder("record value")
        .variant(
            type_name::FEED_POST,
            move |value| match value {
                RecordValue::Post(post) => encode_post(post, &embeds),
                other => Err(Error::unexpected_shape("post", other.discriminator())),
            },
            move |document| Ok(RecordValue::Post(decode_post(document, &decode_embeds)?)),
        )
        .variant(
            type_name::GRAPH_FOLLOW,
            |value| match value {
                RecordValue::Follow(follow) => fields_of(follow),
                other => Err(Error::unexpected_shape("follow", other.discriminator())),
            },
            |document| Ok(RecordValue::Follow(serde_json::from_value(document.clone())?)),
        )
        .variant(
            type_name::GRAPH_BLOCK,
            |value| match value {
                RecordValue::Block(block) => fields_of(block),
                other => Err(Error::unexpected_shape("block", other.discriminator())),
            },
            |document| Ok(RecordValue::Block(serde_json::from_value(document.clone())?)),
        )
        .build()
}

fn encode_post(post: &Post, embeds: &Registry<Embed>) -> Result<JsonObject> {
    let mut fields = JsonObject::new();
    fields.insert("text".to_string(), JsonValue::String(post.text.clone()));
    fields.insert("createdAt".to_string(), serde_json::to_value(post.created_at)?);
    if let Some(langs) = &post.langs {
        fields.insert("langs".to_string(), serde_json::to_value(langs)?);
    }
    if let Some(embed) = &post.embed {
        fields.insert("embed".to_string(), embeds.encode(embed)?);
    }
    if let Some(reply) = &post.reply {
        fields.insert("reply".to_string(), serde_json::to_value(reply)?);
    }
    Ok(fields)
}

fn decode_post(document: &JsonValue, embeds: &Registry<Embed>) -> Result<Post> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct PostFields {
        text: String,
        created_at: DateTime<Utc>,
        #[serde(default)]
        langs: Option<Vec<String>>,
        #[serde(default)]
        reply: Option<ReplyRef>,
    }

    let fields: PostFields = serde_json::from_value(document.clone())?;
    let embed = match document.get("embed") {
        None | Some(JsonValue::Null) => None,
        Some(embed_doc) => Some(embeds.decode(embed_doc)?),
    };
    Ok(Post {
        text: fields.text,
        created_at: fields.created_at,
        langs: fields.langs,
        embed,
        reply: fields.reply,
    })
}
