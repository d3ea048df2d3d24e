//! Tests for the tagged-union codec

use super::{fields_of, Registry, Tagged};
use crate::error::Error;
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Note {
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fixture {
    Note(Note),
    Ping,
}

impl Tagged for Fixture {
    fn discriminator(&self) -> &'static str {
        match self {
            Fixture::Note(_) => "test.note",
            Fixture::Ping => "test.ping",
        }
    }
}

fn fixture_registry() -> Registry<Fixture> {
    Registry::builder("fixture")
        .variant(
            "test.note",
            |value| match value {
                Fixture::Note(note) => fields_of(note),
                other => Err(Error::unexpected_shape("note", other.discriminator())),
            },
            |document| Ok(Fixture::Note(serde_json::from_value(document.clone())?)),
        )
        .variant(
            "test.ping",
            |_| Ok(JsonObject::new()),
            |_| Ok(Fixture::Ping),
        )
        .build()
}

#[test]
fn test_round_trip() {
    let registry = fixture_registry();
    let original = Fixture::Note(Note {
        body: "hello".to_string(),
        lang: Some("en".to_string()),
    });

    let document = registry.encode(&original).unwrap();
    let decoded = registry.decode(&document).unwrap();
    assert_eq!(original, decoded);
}

#[test]
fn test_encode_emits_discriminator_first() {
    let registry = fixture_registry();
    let value = Fixture::Note(Note {
        body: "hello".to_string(),
        lang: None,
    });

    let document = registry.encode(&value).unwrap();
    let serialized = serde_json::to_string(&document).unwrap();
    assert!(
        serialized.starts_with("{\"$type\":\"test.note\""),
        "got: {serialized}"
    );
}

#[test]
fn test_encode_omits_unset_optionals() {
    let registry = fixture_registry();
    let value = Fixture::Note(Note {
        body: "hello".to_string(),
        lang: None,
    });

    let document = registry.encode(&value).unwrap();
    assert!(document.get("lang").is_none(), "unset optional must be omitted, not null");
}

#[test]
fn test_decode_unknown_discriminator() {
    let registry = fixture_registry();
    let document = json!({"$type": "test.unknown", "body": "x"});

    let err = registry.decode(&document).unwrap_err();
    match err {
        Error::UnsupportedVariant {
            capability,
            discriminator,
        } => {
            assert_eq!(capability, "fixture");
            assert_eq!(discriminator, "test.unknown");
        }
        other => panic!("expected UnsupportedVariant, got {other:?}"),
    }
}

#[test]
fn test_decode_missing_discriminator() {
    let registry = fixture_registry();
    let document = json!({"body": "x"});

    let err = registry.decode(&document).unwrap_err();
    assert!(matches!(err, Error::MalformedEnvelope { capability: "fixture" }));
}

#[test]
fn test_decode_non_string_discriminator() {
    let registry = fixture_registry();
    let document = json!({"$type": 42, "body": "x"});

    let err = registry.decode(&document).unwrap_err();
    assert!(matches!(err, Error::MalformedEnvelope { .. }));
}

#[test]
fn test_encode_unregistered_runtime_variant() {
    let registry = Registry::builder("partial")
        .variant(
            "test.note",
            |value| match value {
                Fixture::Note(note) => fields_of(note),
                other => Err(Error::unexpected_shape("note", other.discriminator())),
            },
            |document| Ok(Fixture::Note(serde_json::from_value(document.clone())?)),
        )
        .build();

    let err = registry.encode(&Fixture::Ping).unwrap_err();
    match err {
        Error::UnsupportedVariant { discriminator, .. } => {
            assert_eq!(discriminator, "test.ping");
        }
        other => panic!("expected UnsupportedVariant, got {other:?}"),
    }
}

#[test]
fn test_registry_contains() {
    let registry = fixture_registry();
    assert!(registry.contains("test.note"));
    assert!(registry.contains("test.ping"));
    assert!(!registry.contains("test.unknown"));
    assert_eq!(registry.capability(), "fixture");
}
