//! The location source abstraction.
//!
//! A [`LocationSource`] is the history mechanism a router observes: it knows
//! the current [`Location`], accepts forward and backward navigation
//! requests, and notifies listeners after the location changed. Browser
//! histories, native navigation stacks, and the in-memory
//! [`MemoryHistory`](crate::memory::MemoryHistory) all fit behind it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use navroute_core::RouterResult;

/// Opaque state attached to a history entry.
///
/// The router stores the requested `RouteData` of the target route here;
/// consumers can recover it with `downcast_ref`.
pub type HistoryState = Arc<dyn Any + Send + Sync>;

/// A callback invoked after the location changed.
pub type LocationListener = Arc<dyn Fn(&Location) + Send + Sync>;

/// Identifies one listener registered with a [`LocationSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A history entry: a pathname plus optional state.
#[derive(Clone)]
pub struct Location {
    /// The pathname, without query string or fragment.
    pub pathname: String,
    /// State pushed together with the entry, if any.
    pub state: Option<HistoryState>,
    /// Identifies the navigation that produced this location.
    ///
    /// Every push or back step gets a new key, also when it revisits an
    /// entry, so two change events never share a key.
    pub key: u64,
}

impl Location {
    /// Creates a location without state.
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            state: None,
            key: 0,
        }
    }

    /// Sets the navigation key.
    #[must_use]
    pub const fn with_key(mut self, key: u64) -> Self {
        self.key = key;
        self
    }

    /// Attaches state to the location.
    #[must_use]
    pub fn with_state(mut self, state: HistoryState) -> Self {
        self.state = Some(state);
        self
    }

    /// Returns the state downcast to `T`, if it has that type.
    pub fn state_as<T: Any>(&self) -> Option<&T> {
        self.state.as_deref().and_then(|s| s.downcast_ref::<T>())
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("pathname", &self.pathname)
            .field("key", &self.key)
            .field("has_state", &self.state.is_some())
            .finish()
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.pathname == other.pathname
    }
}

/// A navigable history that reports location changes.
///
/// Implementations must never call listeners from inside [`push`](Self::push)
/// or [`go_back`](Self::go_back): change notifications are delivered later,
/// after the call returned. Listeners are called in registration order.
///
/// Each navigation is stamped with a fresh [`Location::key`]. Right after
/// `push` or `go_back` returns, [`location`](Self::location) carries the key
/// of the change event that navigation will deliver.
pub trait LocationSource: Send + Sync + 'static {
    /// Returns the current location.
    fn location(&self) -> Location;

    /// Registers a change listener.
    fn listen(&self, listener: LocationListener) -> ListenerId;

    /// Removes a listener. Returns `false` if it was not registered.
    fn unlisten(&self, id: ListenerId) -> bool;

    /// Requests navigation to a new entry after the current one.
    fn push(&self, pathname: &str, state: Option<HistoryState>) -> RouterResult<()>;

    /// Requests navigation to the previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::HistoryExhausted`](navroute_core::RouterError::HistoryExhausted)
    /// when there is no previous entry; no change event follows in that case.
    fn go_back(&self) -> RouterResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_state_downcast() {
        let loc = Location::new("/users/1").with_state(Arc::new(42_u32));
        assert_eq!(loc.state_as::<u32>(), Some(&42));
        assert_eq!(loc.state_as::<String>(), None);
        assert_eq!(Location::new("/").state_as::<u32>(), None);
    }

    #[test]
    fn test_location_eq_ignores_state_and_key() {
        let a = Location::new("/a").with_state(Arc::new(())).with_key(3);
        assert_eq!(a, Location::new("/a"));
        assert_eq!(a.key, 3);
        assert_ne!(a, Location::new("/b"));
    }

    #[test]
    fn test_location_debug() {
        let debug = format!("{:?}", Location::new("/a"));
        assert!(debug.contains("/a"));
        assert!(debug.contains("has_state: false"));
    }
}
