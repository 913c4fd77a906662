//! Community feed pagination.
//!
//! Each on-screen feed owns one [`Feed`] instance; instances are
//! independent and never synchronized with each other. Overlapping
//! fetches are rejected deterministically by a single-flight guard
//! whose flag is set before the first await.

pub mod pacing;

pub use pacing::Pacing;

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::types::Book;
use crate::api::{ApiClient, ApiError};
use crate::session::Session;

/// Snapshot of the paginator state, for rendering.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Merged list; ids are unique.
    pub items: Vec<Book>,
    /// Last successfully fetched page.
    pub page: u32,
    /// Whether deeper pages remain (`page < total_pages`).
    pub has_more: bool,
    /// A non-refresh fetch is in flight.
    pub loading: bool,
    /// A pull-to-refresh is in flight or inside its pacing window.
    pub refreshing: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            has_more: true,
            loading: false,
            refreshing: false,
        }
    }
}

/// Result of a page fetch. Failures are recoverable: whatever list was
/// on screen stays on screen.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Page fetched and merged.
    Fetched,
    /// Another fetch already holds the guard; no request was issued.
    InFlight,
    /// The request failed; list, page, and `has_more` are unchanged.
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched)
    }
}

/// Paginator for the community feed. Clones share state, mirroring one
/// on-screen list.
#[derive(Clone)]
pub struct Feed {
    inner: Arc<RwLock<FeedState>>,
    api: Arc<ApiClient>,
    session: Session,
    pacing: Pacing,
    page_size: u32,
}

impl Feed {
    pub fn new(api: Arc<ApiClient>, session: Session, pacing: Pacing, page_size: u32) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FeedState::default())),
            api,
            session,
            pacing,
            page_size,
        }
    }

    pub fn state(&self) -> FeedState {
        self.inner.read().clone()
    }

    /// Fetch one page and merge it into the list.
    ///
    /// The guard flag is taken before the first await, so a second call
    /// arriving while a request is in flight gets [`FetchOutcome::InFlight`]
    /// instead of racing it. On refresh the spinner stays up for at
    /// least the paced minimum, even when the request comes back
    /// instantly.
    pub async fn fetch_page(&self, page_num: u32, is_refresh: bool) -> FetchOutcome {
        if !self.begin_fetch(is_refresh) {
            return FetchOutcome::InFlight;
        }

        let outcome = self.do_fetch(page_num, is_refresh).await;

        if is_refresh {
            tokio::time::sleep(self.pacing.refresh).await;
        }
        self.end_fetch(is_refresh);
        outcome
    }

    /// Infinite-scroll step: no-op unless more pages remain and nothing
    /// is in flight, otherwise paced and then fetches the next page.
    pub async fn load_more(&self) -> Option<FetchOutcome> {
        let page = {
            let state = self.inner.read();
            if !state.has_more || state.loading || state.refreshing {
                return None;
            }
            state.page
        };

        tokio::time::sleep(self.pacing.load_more).await;
        Some(self.fetch_page(page + 1, false).await)
    }

    /// Atomically take the guard. Returns false when a fetch already
    /// holds it.
    fn begin_fetch(&self, is_refresh: bool) -> bool {
        let mut state = self.inner.write();
        if state.loading || state.refreshing {
            return false;
        }
        if is_refresh {
            state.refreshing = true;
        } else {
            state.loading = true;
        }
        true
    }

    fn end_fetch(&self, is_refresh: bool) {
        let mut state = self.inner.write();
        if is_refresh {
            state.refreshing = false;
        } else {
            state.loading = false;
        }
    }

    async fn do_fetch(&self, page_num: u32, is_refresh: bool) -> FetchOutcome {
        let Some(token) = self.session.token() else {
            tracing::warn!("feed fetch without a signed-in session");
            return FetchOutcome::Failed(ApiError::NotAuthenticated);
        };

        let page = match self
            .api
            .feed_page(token.expose(), page_num, self.page_size)
            .await
        {
            Ok(page) => page,
            Err(err) => {
                // Recoverable for this path: the last-good list stays up.
                tracing::warn!(page = page_num, error = %err, "feed fetch failed");
                return FetchOutcome::Failed(err);
            }
        };

        let mut state = self.inner.write();
        state.items = if is_refresh || page_num == 1 {
            page.books
        } else {
            merge_first_wins(std::mem::take(&mut state.items), page.books)
        };
        state.has_more = page_num < page.total_pages;
        state.page = page_num;
        FetchOutcome::Fetched
    }
}

/// Deduplicate by id across existing-then-fetched, keeping
/// first-occurrence order. On a collision the copy already in the list
/// wins over the freshly fetched one. First-wins matches the shipped
/// client; do not switch this to last-wins without product sign-off.
fn merge_first_wins(existing: Vec<Book>, fetched: Vec<Book>) -> Vec<Book> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(fetched)
        .filter(|book| seen.insert(book.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            caption: String::new(),
            rating: 3,
            image: format!("https://example.com/{id}.png"),
            created_at: None,
            user: None,
        }
    }

    #[test]
    fn merge_appends_new_ids_in_order() {
        let merged = merge_first_wins(
            vec![book("1", "a"), book("2", "b")],
            vec![book("3", "c"), book("4", "d")],
        );
        let ids: Vec<&str> = merged.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[test]
    fn merge_keeps_the_existing_copy_on_collision() {
        let merged = merge_first_wins(
            vec![book("1", "a")],
            vec![book("1", "b"), book("2", "c")],
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged[0].title, "a");
        assert_eq!(merged[1].id, "2");
        assert_eq!(merged[1].title, "c");
    }

    #[test]
    fn merge_with_empty_existing_is_the_fetched_page() {
        let merged = merge_first_wins(Vec::new(), vec![book("1", "a")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "1");
    }

    #[test]
    fn merge_dedups_within_the_fetched_page_too() {
        let merged = merge_first_wins(Vec::new(), vec![book("1", "a"), book("1", "b")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "a");
    }

    #[test]
    fn default_state_has_no_items_and_expects_more() {
        let state = FeedState::default();
        assert!(state.items.is_empty());
        assert_eq!(state.page, 1);
        assert!(state.has_more);
        assert!(!state.loading);
        assert!(!state.refreshing);
    }
}
