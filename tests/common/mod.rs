//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_api;

use std::sync::Arc;

use bookworm::api::types::User;
use bookworm::api::ApiClient;
use bookworm::session::{MemorySessionStore, Session, StoredSession};

pub const TEST_TOKEN: &str = "jwt-test-token";

pub fn sample_user() -> User {
    User {
        id: "u1".to_string(),
        username: "paul".to_string(),
        email: "paul@arrakis.example".to_string(),
        profile_image: None,
        created_at: Some("2025-01-01T00:00:00.000Z".to_string()),
    }
}

/// A session already signed in against `api`, as if a previous process
/// had stored credentials and the bootstrap restored them.
pub async fn signed_in_session(api: &Arc<ApiClient>) -> Session {
    let store = MemorySessionStore::with_session(StoredSession {
        token: TEST_TOKEN.to_string(),
        user: sample_user(),
    });
    let session = Session::new(Arc::clone(api), Arc::new(store));
    session.check_auth().await;
    assert!(session.is_signed_in());
    session
}
