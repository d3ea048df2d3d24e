//! Tagged-union codec
//!
//! # Overview
//!
//! The wire protocol is intentionally open: any producer may introduce new
//! record shapes, and every polymorphic document carries a `$type` field
//! naming its variant. This module converts between those self-describing
//! documents and concrete in-memory variants.
//!
//! Knowledge of "which variants exist" is confined to a [`Registry`] built
//! once per capability set (embeds, embeddable media, record values, ...) and
//! passed in explicitly, so tests can register fixture variants without
//! touching process-wide state. An unregistered discriminator is always a
//! decode failure, never a best-effort fallback.

mod registry;

pub use registry::{Registry, RegistryBuilder, Tagged};

pub(crate) use registry::fields_of;

#[cfg(test)]
mod tests;
