//! Reactive access to a router's current route.
//!
//! [`CurrentRoute`] mirrors a [`Router`]'s route into a
//! [`tokio::sync::watch`] channel so UI code can read the latest route
//! without locking, or await the next change.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use navroute_core::{RouterError, RouterResult};
use navroute_urls::{RouteData, RouteName, RouteParams};

use crate::matching::{self, Pattern};
use crate::router::{Router, Unsubscribe};

/// A router paired with a live copy of its current route.
///
/// The copy is updated by an `on_change` callback registered on creation and
/// removed when the `CurrentRoute` is dropped.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use navroute_router::{CurrentRoute, MemoryHistory, Router};
/// use navroute_urls::{RouteDefinition, RouteParams};
///
/// let history = Arc::new(MemoryHistory::new("/"));
/// let router = Router::new(
///     "unknown",
///     vec![RouteDefinition::new("home", "/"), RouteDefinition::new("about", "/about")],
///     history.clone(),
/// )
/// .unwrap();
///
/// let current = CurrentRoute::new(&router);
/// current.go_to(&"about", &RouteParams::new()).unwrap();
/// history.flush();
///
/// assert_eq!(current.context().name, "about");
/// ```
pub struct CurrentRoute<N: RouteName> {
    router: Router<N>,
    receiver: watch::Receiver<RouteData<N>>,
    subscription: Unsubscribe<N>,
}

impl<N: RouteName> std::fmt::Debug for CurrentRoute<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentRoute")
            .field("route", &*self.receiver.borrow())
            .finish_non_exhaustive()
    }
}

impl<N: RouteName> CurrentRoute<N> {
    /// Starts tracking `router`.
    pub fn new(router: &Router<N>) -> Self {
        let (sender, receiver) = watch::channel(router.current_context());
        let subscription = router.on_change(move |data| {
            sender.send_replace(data.clone());
        });

        Self {
            router: router.clone(),
            receiver,
            subscription,
        }
    }

    /// Returns the latest route.
    pub fn context(&self) -> RouteData<N> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next route change and returns the new route.
    ///
    /// A change that happened since the last call to `changed` (or since
    /// creation) completes immediately.
    pub async fn changed(&mut self) -> RouterResult<RouteData<N>> {
        self.receiver
            .changed()
            .await
            .map_err(|_| RouterError::LocationSourceClosed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// See [`Router::go_to`].
    pub fn go_to(&self, name: &N, params: &RouteParams) -> RouterResult<()> {
        self.router.go_to(name, params)
    }

    /// See [`Router::back_to`].
    pub async fn back_to<F>(&self, predicate: F, cancel: &CancellationToken) -> RouterResult<RouteData<N>>
    where
        F: Fn(&RouteData<N>) -> bool,
    {
        self.router.back_to(predicate, cancel).await
    }

    /// Returns `true` if the latest route matches any of `patterns`.
    pub fn matches_one(&self, patterns: &[Pattern<N>]) -> bool {
        matching::matches(&*self.receiver.borrow(), true, patterns)
    }

    /// Returns `true` if the latest route matches none of `patterns`.
    pub fn matches_none(&self, patterns: &[Pattern<N>]) -> bool {
        matching::matches(&*self.receiver.borrow(), false, patterns)
    }

    /// Returns the underlying router.
    pub const fn router(&self) -> &Router<N> {
        &self.router
    }
}

impl<N: RouteName> Drop for CurrentRoute<N> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::LocationSource;
    use crate::memory::MemoryHistory;
    use navroute_urls::RouteDefinition;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryHistory>, Router<&'static str>) {
        let history = Arc::new(MemoryHistory::new("/"));
        let router = Router::new(
            "unknown",
            vec![
                RouteDefinition::new("home", "/"),
                RouteDefinition::new("user", "/users/:id"),
            ],
            history.clone(),
        )
        .unwrap();
        (history, router)
    }

    #[test]
    fn test_context_follows_router() {
        let (history, router) = setup();
        let current = CurrentRoute::new(&router);
        assert_eq!(current.context().name, "home");

        history.push("/users/5", None).unwrap();
        history.flush();
        assert_eq!(current.context().name, "user");
        assert!(current.matches_one(&[Pattern::with_params("user", [("id", "5")])]));
        assert!(current.matches_none(&[Pattern::name("home")]));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (_history, router) = setup();
        let current = CurrentRoute::new(&router);
        assert_eq!(router.subscriber_count(), 1);
        assert!(format!("{current:?}").contains("home"));

        drop(current);
        assert_eq!(router.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_changed_resolves_after_navigation() {
        let (history, router) = setup();
        let mut current = CurrentRoute::new(&router);

        let mut params = RouteParams::new();
        params.insert("id".into(), "9".into());
        current.go_to(&"user", &params).unwrap();
        history.flush();

        let data = current.changed().await.unwrap();
        assert_eq!(data.name, "user");
        assert_eq!(data.param("id"), Some("9"));
        assert_eq!(current.router().current_context(), data);
    }
}
