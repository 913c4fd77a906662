//! Route access control derived from session state.
//!
//! The UI re-evaluates this on every session or screen change. While
//! the bootstrap is still running, or before any screen is resolved,
//! the guard stays silent.

use crate::session::Phase;

/// Navigation area the UI is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Login and register screens.
    Auth,
    /// The signed-in tab area.
    Tabs,
}

/// Decide whether the UI must redirect, and where.
///
/// `current` is `None` until a screen has been resolved.
pub fn route_redirect(phase: Phase, current: Option<Area>) -> Option<Area> {
    let current = current?;
    match phase {
        Phase::CheckingAuth => None,
        Phase::Unauthenticated if current != Area::Auth => Some(Area::Auth),
        Phase::Authenticated if current == Area::Auth => Some(Area::Tabs),
        _ => None,
    }
}
