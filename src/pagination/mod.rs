//! Cursor-driven lazy pagination
//!
//! # Overview
//!
//! Remote collections are paginated with an opaque, server-issued
//! continuation cursor and offer no random access. [`Pager`] exposes a
//! single forward-only, pull-based iterator over such a collection: nothing
//! is fetched until the consumer asks, pages are fetched strictly
//! sequentially, and a configurable minimum interval between fetches acts
//! as a courtesy throttle against the remote service.

mod pager;
mod types;

pub use pager::Pager;
pub use types::{FetchPage, Page};

#[cfg(test)]
mod tests;
