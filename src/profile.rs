//! The signed-in user's shelf of posted recommendations.
//!
//! Unlike the community feed, fetch failures here are surfaced to the
//! caller so the screen can alert. Deleting is the one mutation the
//! client performs; confirmation happens in the caller, never here.

use std::sync::Arc;

use parking_lot::RwLock;
use scopeguard::defer;

use crate::api::types::Book;
use crate::api::{ApiClient, ApiError};
use crate::feed::Pacing;
use crate::session::Session;

/// Snapshot of the shelf state, for rendering.
#[derive(Debug, Clone, Default)]
pub struct ShelfState {
    pub items: Vec<Book>,
    pub loading: bool,
    pub refreshing: bool,
    /// Id of the book whose delete request is in flight, if any. Drives
    /// the per-item spinner, not a global one.
    pub pending_delete: Option<String>,
}

/// The user's own recommendations, with the delete flow.
#[derive(Clone)]
pub struct Shelf {
    inner: Arc<RwLock<ShelfState>>,
    api: Arc<ApiClient>,
    session: Session,
    pacing: Pacing,
}

impl Shelf {
    pub fn new(api: Arc<ApiClient>, session: Session, pacing: Pacing) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ShelfState::default())),
            api,
            session,
            pacing,
        }
    }

    pub fn state(&self) -> ShelfState {
        self.inner.read().clone()
    }

    /// Fetch the user's own books. On failure the list is left
    /// unchanged and the error is returned for the caller to surface.
    pub async fn fetch(&self) -> Result<(), ApiError> {
        self.inner.write().loading = true;
        defer! { self.inner.write().loading = false; }

        let token = self.session.token().ok_or(ApiError::NotAuthenticated)?;
        match self.api.user_books(token.expose()).await {
            Ok(books) => {
                self.inner.write().items = books;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "shelf fetch failed");
                Err(err)
            }
        }
    }

    /// Pull-to-refresh: holds the spinner for the paced minimum, then
    /// re-fetches.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.inner.write().refreshing = true;
        defer! { self.inner.write().refreshing = false; }

        tokio::time::sleep(self.pacing.shelf_refresh).await;
        self.fetch().await
    }

    /// Delete one posted recommendation.
    ///
    /// The caller must already have confirmed with the user. On success
    /// the item is removed from the local list; on failure the list is
    /// unchanged and the error carries the server message. The
    /// pending-delete marker is cleared on every path.
    pub async fn delete(&self, book_id: &str) -> Result<(), ApiError> {
        self.inner.write().pending_delete = Some(book_id.to_string());
        defer! { self.inner.write().pending_delete = None; }

        let token = self.session.token().ok_or(ApiError::NotAuthenticated)?;
        match self.api.delete_book(token.expose(), book_id).await {
            Ok(()) => {
                let mut state = self.inner.write();
                state.items.retain(|book| book.id != book_id);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(book_id, error = %err, "delete failed");
                Err(err)
            }
        }
    }
}
