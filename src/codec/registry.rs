//! Discriminator registry and encode/decode dispatch

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, TYPE_FIELD};
use std::collections::HashMap;
use std::fmt;

/// A value belonging to an open polymorphic capability set.
///
/// Each variant names its own wire discriminator; the registry uses it to
/// pick the encode path at runtime.
pub trait Tagged {
    /// The `$type` value identifying this variant on the wire
    fn discriminator(&self) -> &'static str;
}

type EncodeFn<T> = Box<dyn Fn(&T) -> Result<JsonObject> + Send + Sync>;
type DecodeFn<T> = Box<dyn Fn(&JsonValue) -> Result<T> + Send + Sync>;

struct VariantCodec<T> {
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

/// Mapping from discriminator string to encode/decode functions for one
/// capability set.
///
/// Built once via [`Registry::builder`], read-only thereafter; safe for
/// unlimited concurrent use. Independent capability sets get independent
/// registries and discriminators need not be unique across them.
pub struct Registry<T> {
    capability: &'static str,
    variants: HashMap<&'static str, VariantCodec<T>>,
}

impl<T: Tagged> Registry<T> {
    /// Start building a registry for the named capability set
    pub fn builder(capability: &'static str) -> RegistryBuilder<T> {
        RegistryBuilder {
            capability,
            variants: HashMap::new(),
        }
    }

    /// The capability set this registry covers (used in error messages)
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Whether a discriminator is registered
    pub fn contains(&self, discriminator: &str) -> bool {
        self.variants.contains_key(discriminator)
    }

    /// Decode a tagged document into a concrete variant.
    ///
    /// The discriminator is always inspected before choosing a decode path:
    /// a missing `$type` is a [`Error::MalformedEnvelope`], an unregistered
    /// one is a [`Error::UnsupportedVariant`] carrying the encountered
    /// string. Protocol evolution means unknown variants are expected and
    /// must stay distinguishable from corruption.
    pub fn decode(&self, document: &JsonValue) -> Result<T> {
        let discriminator = document
            .get(TYPE_FIELD)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::malformed_envelope(self.capability))?;

        let codec = self
            .variants
            .get(discriminator)
            .ok_or_else(|| Error::unsupported_variant(self.capability, discriminator))?;

        (codec.decode)(document)
    }

    /// Encode a variant into a tagged document.
    ///
    /// The emitted document carries `$type` as its first field followed by
    /// the variant's own fields. An unregistered runtime variant is a
    /// programming error and fails with [`Error::UnsupportedVariant`].
    pub fn encode(&self, value: &T) -> Result<JsonValue> {
        let discriminator = value.discriminator();
        let codec = self
            .variants
            .get(discriminator)
            .ok_or_else(|| Error::unsupported_variant(self.capability, discriminator))?;

        let fields = (codec.encode)(value)?;
        let mut document = JsonObject::new();
        document.insert(TYPE_FIELD.to_string(), JsonValue::String(discriminator.to_string()));
        document.extend(fields);
        Ok(JsonValue::Object(document))
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut discriminators: Vec<_> = self.variants.keys().collect();
        discriminators.sort();
        f.debug_struct("Registry")
            .field("capability", &self.capability)
            .field("variants", &discriminators)
            .finish()
    }
}

/// Builder for a [`Registry`]
pub struct RegistryBuilder<T> {
    capability: &'static str,
    variants: HashMap<&'static str, VariantCodec<T>>,
}

impl<T: Tagged> RegistryBuilder<T> {
    /// Register a variant under its discriminator.
    ///
    /// `encode` receives a value whose runtime discriminator matched this
    /// registration and returns the variant's fields (without `$type`);
    /// `decode` receives the full document. Registering the same
    /// discriminator twice replaces the earlier registration.
    pub fn variant<E, D>(mut self, discriminator: &'static str, encode: E, decode: D) -> Self
    where
        E: Fn(&T) -> Result<JsonObject> + Send + Sync + 'static,
        D: Fn(&JsonValue) -> Result<T> + Send + Sync + 'static,
    {
        self.variants.insert(
            discriminator,
            VariantCodec {
                encode: Box::new(encode),
                decode: Box::new(decode),
            },
        );
        self
    }

    /// Finish building
    pub fn build(self) -> Registry<T> {
        Registry {
            capability: self.capability,
            variants: self.variants,
        }
    }
}

/// Serialize a value's fields into a JSON object via its `Serialize` impl.
///
/// Convenience for registrations whose variant payload is a plain serde
/// struct with no nested polymorphic fields.
pub(crate) fn fields_of<V: serde::Serialize>(value: &V) -> Result<JsonObject> {
    use serde::ser::Error as _;
    match serde_json::to_value(value)? {
        JsonValue::Object(fields) => Ok(fields),
        other => Err(Error::Json(serde_json::Error::custom(format!(
            "variant payload must serialize to an object, got {other}"
        )))),
    }
}
