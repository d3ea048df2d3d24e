//! Page-fetch abstractions

use crate::error::Result;
use async_trait::async_trait;

/// One fetched page: its items plus the continuation cursor for the next
/// page, if the server issued one.
#[derive(Debug, Clone, Default)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Opaque continuation token for the next fetch; absent at end of data
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, cursor: Option<String>) -> Self {
        Self { items, cursor }
    }

    /// An empty terminal page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }
}

/// The caller-supplied page-fetch capability.
///
/// `cursor` is `None` for the first page; afterwards it is whatever the
/// previous page returned. The remote cursor is a serial continuation token,
/// so implementations are only ever called sequentially.
#[async_trait]
pub trait FetchPage<T>: Send + Sync {
    /// Fetch one page starting at `cursor`
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<T>>;
}
