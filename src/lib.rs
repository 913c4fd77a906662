//! Client core for the Bookworm book-recommendation service.
//!
//! The crate carries the three pieces of state-machine logic the mobile
//! client needs: the session manager (authentication, durable storage,
//! route access control), the community feed paginator with its
//! deduplicating merge and single-flight guards, and the profile shelf
//! with its delete flow. The HTTP API, the durable store, and the UX
//! pacing delays are all injectable seams so every state transition is
//! testable without a device or a live server.

pub mod api;
pub mod config;
pub mod feed;
pub mod images;
pub mod logging;
pub mod profile;
pub mod routing;
pub mod session;
