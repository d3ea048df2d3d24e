//! The lazy, paced, forward-only pager

use super::types::{FetchPage, Page};
use crate::error::Result;
use futures::stream::{self, Stream};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A forward-only, on-demand iterator over a cursor-paginated remote
/// collection.
///
/// Items are yielded in exactly the order pages return them; pages are
/// fetched strictly sequentially with no prefetching. Once a cursor has
/// advanced there is no rewind; construct a fresh pager to restart.
///
/// Single-consumer: advancement takes `&mut self`, so concurrent calls are
/// ruled out per instance. Distinct instances are fully independent.
pub struct Pager<T> {
    fetcher: Box<dyn FetchPage<T>>,
    min_interval: Duration,
    buffer: Vec<T>,
    next_index: usize,
    cursor: Option<String>,
    exhausted: bool,
    last_fetch: Option<Instant>,
}

impl<T: Clone> Pager<T> {
    /// Create a pager over `fetcher`, keeping at least `min_interval`
    /// between consecutive page fetches.
    pub fn new(fetcher: impl FetchPage<T> + 'static, min_interval: Duration) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            min_interval,
            buffer: Vec::new(),
            next_index: 0,
            cursor: None,
            exhausted: false,
            last_fetch: None,
        }
    }

    /// Yield the next item, or `None` once the collection is exhausted.
    ///
    /// Returns buffered items without suspending. When the buffer runs dry
    /// this waits out the remainder of the minimum inter-fetch interval
    /// (measured from the last fetch's completion), performs exactly one
    /// page fetch, and yields the first newly buffered item. An empty page
    /// marks the pager terminal permanently; the fetch is never retried.
    ///
    /// Cancel-safe: dropping the returned future during the pacing wait or
    /// the in-flight fetch leaves buffered items, cursor, and the terminal
    /// flag untouched; they are only updated after a fetch fully completes.
    pub async fn advance(&mut self) -> Result<Option<T>> {
        if self.next_index < self.buffer.len() {
            let item = self.buffer[self.next_index].clone();
            self.next_index += 1;
            return Ok(Some(item));
        }

        if self.exhausted {
            return Ok(None);
        }

        if let Some(last_fetch) = self.last_fetch {
            let elapsed = last_fetch.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        let page = self.fetcher.fetch_page(self.cursor.as_deref()).await?;
        self.last_fetch = Some(Instant::now());
        self.commit(page);

        if self.next_index < self.buffer.len() {
            let item = self.buffer[self.next_index].clone();
            self.next_index += 1;
            Ok(Some(item))
        } else {
            Ok(None)
        }
    }

    /// Adopt a completed fetch into the pager's state.
    fn commit(&mut self, page: Page<T>) {
        if page.items.is_empty() {
            debug!(total = self.buffer.len(), "end of collection");
            self.exhausted = true;
            return;
        }
        debug!(fetched = page.items.len(), "buffered page");
        self.buffer.extend(page.items);
        // An absent continuation cursor also means end of data; re-fetching
        // without a cursor would restart the collection from the top.
        match page.cursor {
            Some(cursor) => self.cursor = Some(cursor),
            None => self.exhausted = true,
        }
    }

    /// Number of items fetched so far (consumed or not)
    pub fn fetched(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the pager has reached the permanent end of the collection
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.next_index >= self.buffer.len()
    }

    /// Convert into a [`Stream`] of items
    pub fn into_stream(self) -> impl Stream<Item = Result<T>>
    where
        T: 'static,
    {
        stream::try_unfold(self, |mut pager| async move {
            let item = pager.advance().await?;
            Ok(item.map(|item| (item, pager)))
        })
    }
}

impl<T> std::fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("min_interval", &self.min_interval)
            .field("buffered", &self.buffer.len())
            .field("next_index", &self.next_index)
            .field("cursor", &self.cursor)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}
