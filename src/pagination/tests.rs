//! Tests for the pagination module

use super::{FetchPage, Page, Pager};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Replays a fixed script of pages and records how it was called.
struct ScriptedFetcher {
    pages: Mutex<Vec<Result<Page<String>>>>,
    calls: AtomicUsize,
    seen_cursors: Mutex<Vec<Option<String>>>,
    fetch_times: Mutex<Vec<Instant>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Result<Page<String>>>) -> Self {
        Self {
            pages: Mutex::new(pages),
            calls: AtomicUsize::new(0),
            seen_cursors: Mutex::new(Vec::new()),
            fetch_times: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchPage<String> for &'static ScriptedFetcher {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_cursors
            .lock()
            .unwrap()
            .push(cursor.map(String::from));
        self.fetch_times.lock().unwrap().push(Instant::now());
        self.pages.lock().unwrap().remove(0)
    }
}

fn page(items: &[&str], cursor: Option<&str>) -> Result<Page<String>> {
    Ok(Page::new(
        items.iter().map(ToString::to_string).collect(),
        cursor.map(String::from),
    ))
}

fn leak(fetcher: ScriptedFetcher) -> &'static ScriptedFetcher {
    Box::leak(Box::new(fetcher))
}

#[tokio::test]
async fn test_yields_items_in_page_order_then_terminates() {
    let fetcher = leak(ScriptedFetcher::new(vec![
        page(&["a", "b"], Some("cursor1")),
        page(&["c"], Some("cursor2")),
        page(&[], Some("cursor3")),
    ]));
    let mut pager = Pager::new(fetcher, Duration::ZERO);

    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));
    assert_eq!(pager.advance().await.unwrap(), Some("b".to_string()));
    assert_eq!(pager.advance().await.unwrap(), Some("c".to_string()));
    assert_eq!(pager.advance().await.unwrap(), None);
    // Terminal is sticky: no further fetches happen.
    assert_eq!(pager.advance().await.unwrap(), None);
    assert_eq!(pager.advance().await.unwrap(), None);
    assert_eq!(fetcher.calls(), 3);
    assert!(pager.is_exhausted());
}

#[tokio::test]
async fn test_adopts_returned_cursor_for_next_fetch() {
    let fetcher = leak(ScriptedFetcher::new(vec![
        page(&["a"], Some("cursor1")),
        page(&["b"], Some("cursor2")),
        page(&[], None),
    ]));
    let mut pager = Pager::new(fetcher, Duration::ZERO);

    while pager.advance().await.unwrap().is_some() {}

    let cursors = fetcher.seen_cursors.lock().unwrap().clone();
    assert_eq!(
        cursors,
        vec![None, Some("cursor1".to_string()), Some("cursor2".to_string())]
    );
}

#[tokio::test]
async fn test_empty_first_page_is_immediately_terminal() {
    let fetcher = leak(ScriptedFetcher::new(vec![page(&[], None)]));
    let mut pager = Pager::new(fetcher, Duration::from_millis(200));

    assert_eq!(pager.advance().await.unwrap(), None);
    assert!(pager.is_exhausted());
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_absent_cursor_ends_collection_after_draining() {
    let fetcher = leak(ScriptedFetcher::new(vec![page(&["a", "b"], None)]));
    let mut pager = Pager::new(fetcher, Duration::ZERO);

    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));
    assert_eq!(pager.advance().await.unwrap(), Some("b".to_string()));
    assert_eq!(pager.advance().await.unwrap(), None);
    // No second fetch: an absent cursor would restart from the top.
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_consecutive_fetches_are_paced() {
    let fetcher = leak(ScriptedFetcher::new(vec![
        page(&["a"], Some("cursor1")),
        page(&["b"], Some("cursor2")),
        page(&[], None),
    ]));
    let mut pager = Pager::new(fetcher, Duration::from_millis(200));

    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));
    assert_eq!(pager.advance().await.unwrap(), Some("b".to_string()));
    assert_eq!(pager.advance().await.unwrap(), None);

    let times = fetcher.fetch_times.lock().unwrap().clone();
    assert_eq!(times.len(), 3);
    assert!(times[1] - times[0] >= Duration::from_millis(200));
    assert!(times[2] - times[1] >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_first_fetch_is_not_paced() {
    let fetcher = leak(ScriptedFetcher::new(vec![page(&["a"], None)]));
    let mut pager = Pager::new(fetcher, Duration::from_secs(60));

    let before = Instant::now();
    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));
    // The paused clock only moves during sleeps, so any pacing would show.
    assert_eq!(Instant::now(), before);
}

#[tokio::test]
async fn test_buffered_items_need_no_fetch() {
    let fetcher = leak(ScriptedFetcher::new(vec![page(
        &["a", "b", "c"],
        Some("cursor1"),
    )]));
    let mut pager = Pager::new(fetcher, Duration::from_secs(60));

    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));
    assert_eq!(pager.advance().await.unwrap(), Some("b".to_string()));
    assert_eq!(pager.advance().await.unwrap(), Some("c".to_string()));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(pager.fetched(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_advance_leaves_state_intact() {
    let fetcher = leak(ScriptedFetcher::new(vec![
        page(&["a"], Some("cursor1")),
        page(&["b"], None),
    ]));
    let mut pager = Pager::new(fetcher, Duration::from_millis(200));

    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));

    // Cancel the next advance while it is still inside the pacing wait.
    tokio::select! {
        _ = pager.advance() => panic!("advance should not complete within 50ms"),
        () = tokio::time::sleep(Duration::from_millis(50)) => {}
    }

    assert_eq!(fetcher.calls(), 1);
    assert!(!pager.is_exhausted());

    // The sequence picks up where it left off.
    assert_eq!(pager.advance().await.unwrap(), Some("b".to_string()));
    let cursors = fetcher.seen_cursors.lock().unwrap().clone();
    assert_eq!(cursors, vec![None, Some("cursor1".to_string())]);
}

#[tokio::test]
async fn test_fetch_error_propagates_without_corrupting_buffer() {
    let fetcher = leak(ScriptedFetcher::new(vec![
        page(&["a"], Some("cursor1")),
        Err(Error::protocol(500, "InternalServerError", "boom")),
        page(&["b"], None),
    ]));
    let mut pager = Pager::new(fetcher, Duration::ZERO);

    assert_eq!(pager.advance().await.unwrap(), Some("a".to_string()));
    assert!(pager.advance().await.is_err());
    assert!(!pager.is_exhausted());

    // The caller may try again; the cursor was not advanced by the failure.
    assert_eq!(pager.advance().await.unwrap(), Some("b".to_string()));
    let cursors = fetcher.seen_cursors.lock().unwrap().clone();
    assert_eq!(
        cursors,
        vec![None, Some("cursor1".to_string()), Some("cursor1".to_string())]
    );
}

#[tokio::test]
async fn test_into_stream_collects_everything() {
    let fetcher = leak(ScriptedFetcher::new(vec![
        page(&["a", "b"], Some("cursor1")),
        page(&["c"], None),
    ]));
    let pager = Pager::new(fetcher, Duration::ZERO);

    let items: Vec<String> = pager.into_stream().try_collect().await.unwrap();
    assert_eq!(items, vec!["a", "b", "c"]);
}
