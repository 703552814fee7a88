//! The router: current route state, subscriptions, and navigation.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock, Weak};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn, Instrument};

use navroute_core::logging::navigation_span;
use navroute_core::{RouterError, RouterResult, Settings};
use navroute_signals::{Signal, Subscription};
use navroute_urls::{RouteData, RouteDefinition, RouteName, RouteParams, RouteTable};

use crate::history::{ListenerId, Location, LocationSource};
use crate::matching::{self, Pattern};

/// Handle returned by [`Router::on_change`]; removes the callback.
pub type Unsubscribe<N> = Subscription<RouteData<N>>;

struct RouterInner<N: RouteName> {
    table: RouteTable<N>,
    unknown_route_name: N,
    current: RwLock<RouteData<N>>,
    subscribers: Arc<Signal<RouteData<N>>>,
    source: Arc<dyn LocationSource>,
    listener: Mutex<Option<ListenerId>>,
    max_back_steps: Option<usize>,
}

impl<N: RouteName> RouterInner<N> {
    fn resolve(&self, pathname: &str) -> RouteData<N> {
        self.table.resolve(pathname, &self.unknown_route_name)
    }

    fn handle_location(&self, location: &Location) {
        let data = self.resolve(&location.pathname);
        debug!(name = ?data.name, pathname = %data.pathname, "Route changed");
        *self.current.write().expect("router lock poisoned") = data.clone();
        self.subscribers.send(&data);
    }
}

impl<N: RouteName> Drop for RouterInner<N> {
    fn drop(&mut self) {
        if let Some(id) = self.listener.get_mut().ok().and_then(Option::take) {
            self.source.unlisten(id);
        }
    }
}

/// Tracks the route of a [`LocationSource`] and navigates it by route name.
///
/// A `Router` is a cheap handle: clones share the same state. The state is
/// released, and the router stops listening to its source, when the last
/// handle is dropped.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use navroute_router::{MemoryHistory, Router};
/// use navroute_urls::{RouteDefinition, RouteParams};
///
/// let history = Arc::new(MemoryHistory::new("/users/42"));
/// let router = Router::new(
///     "unknown",
///     vec![
///         RouteDefinition::new("home", "/"),
///         RouteDefinition::new("user", "/users/:id"),
///     ],
///     history.clone(),
/// )
/// .unwrap();
///
/// assert_eq!(router.current_context().name, "user");
///
/// router.go_to(&"home", &RouteParams::new()).unwrap();
/// assert_eq!(router.current_context().name, "user");
///
/// history.flush();
/// assert_eq!(router.current_context().name, "home");
/// ```
pub struct Router<N: RouteName> {
    inner: Arc<RouterInner<N>>,
}

impl<N: RouteName> Clone for Router<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: RouteName> fmt::Debug for Router<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.table)
            .field("unknown_route_name", &self.inner.unknown_route_name)
            .field("current", &self.current_context())
            .field("subscribers", &self.inner.subscribers.receiver_count())
            .finish_non_exhaustive()
    }
}

impl<N: RouteName> Router<N> {
    /// Builds a router over `source`.
    ///
    /// The definitions are registered first; the source's current location
    /// is then resolved into the initial route before the router starts
    /// listening for changes.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRouteName`] or
    /// [`RouterError::InvalidPattern`] if the definitions do not register.
    /// No listener is attached in that case.
    pub fn new<I>(unknown_route_name: N, definitions: I, source: Arc<dyn LocationSource>) -> RouterResult<Self>
    where
        I: IntoIterator<Item = RouteDefinition<N>>,
    {
        Self::with_back_step_limit(unknown_route_name, definitions, source, None)
    }

    /// Like [`Router::new`], with an upper bound on the back steps a single
    /// [`back_to`](Self::back_to) call may take.
    pub fn with_back_step_limit<I>(
        unknown_route_name: N,
        definitions: I,
        source: Arc<dyn LocationSource>,
        max_back_steps: Option<usize>,
    ) -> RouterResult<Self>
    where
        I: IntoIterator<Item = RouteDefinition<N>>,
    {
        let table = RouteTable::register(definitions)?;
        let initial = table.resolve(&source.location().pathname, &unknown_route_name);
        info!(
            routes = table.len(),
            pathname = %initial.pathname,
            name = ?initial.name,
            "Router initialized"
        );

        let inner = Arc::new(RouterInner {
            table,
            unknown_route_name,
            current: RwLock::new(initial),
            subscribers: Arc::new(Signal::new()),
            source,
            listener: Mutex::new(None),
            max_back_steps,
        });

        let weak: Weak<RouterInner<N>> = Arc::downgrade(&inner);
        let id = inner.source.listen(Arc::new(move |location: &Location| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_location(location);
            }
        }));
        *inner.listener.lock().expect("router lock poisoned") = Some(id);

        Ok(Self { inner })
    }

    /// Returns the current route.
    pub fn current_context(&self) -> RouteData<N> {
        self.inner.current.read().expect("router lock poisoned").clone()
    }

    /// Registers a callback invoked after every route change.
    ///
    /// Callbacks run synchronously, in registration order, with the new
    /// route. A callback registered while callbacks are running is first
    /// called on the next change.
    pub fn on_change<F>(&self, callback: F) -> Unsubscribe<N>
    where
        F: Fn(&RouteData<N>) + Send + Sync + 'static,
    {
        self.inner.subscribers.subscribe(Arc::new(callback))
    }

    /// Returns the number of registered change callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.receiver_count()
    }

    /// Navigates to the route named `name`.
    ///
    /// The pathname is generated from `params` and pushed to the source
    /// with the requested name and params as history state, even when an
    /// earlier pattern would resolve the pathname to another route. The current route
    /// is not touched here: it changes when the source reports the new
    /// location.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownRouteName`] or
    /// [`RouterError::ParamsMismatch`] without navigating, or the error of
    /// the source's `push`.
    pub fn go_to(&self, name: &N, params: &RouteParams) -> RouterResult<()> {
        let span = navigation_span("go_to");
        let _enter = span.enter();

        let pathname = match self.inner.table.reverse(name, params) {
            Ok(pathname) => pathname,
            Err(e) => {
                warn!(name = ?name, error = %e, "Navigation rejected");
                return Err(e);
            }
        };

        debug!(name = ?name, pathname = %pathname, "Navigating");
        let state = RouteData {
            name: name.clone(),
            params: params.clone(),
            pathname: pathname.clone(),
        };
        self.inner.source.push(&pathname, Some(Arc::new(state)))
    }

    /// Steps back through history until `predicate` accepts a route.
    ///
    /// Each step issues one `go_back` and waits for the resulting change
    /// before testing the new route; the location the call starts from is
    /// never tested. The step's change event is recognised by its
    /// [`Location::key`], so events still pending from earlier navigations
    /// are skipped even when they report the same pathname. On success the router's current route is the returned
    /// route.
    ///
    /// # Errors
    ///
    /// - [`RouterError::HistoryExhausted`] when there is nothing left to go back to
    /// - [`RouterError::BackStepLimit`] when the configured step limit is reached
    /// - [`RouterError::Cancelled`] when `cancel` fires
    /// - [`RouterError::LocationSourceClosed`] when the source drops the listener
    ///
    /// History stays wherever the last completed step left it.
    pub async fn back_to<F>(&self, predicate: F, cancel: &CancellationToken) -> RouterResult<RouteData<N>>
    where
        F: Fn(&RouteData<N>) -> bool,
    {
        self.walk_back(predicate, cancel)
            .instrument(navigation_span("back_to"))
            .await
    }

    async fn walk_back<F>(&self, predicate: F, cancel: &CancellationToken) -> RouterResult<RouteData<N>>
    where
        F: Fn(&RouteData<N>) -> bool,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Location>();
        let id = self.inner.source.listen(Arc::new(move |location: &Location| {
            tx.send(location.clone()).ok();
        }));
        let _listener = ListenerGuard {
            source: Arc::clone(&self.inner.source),
            id,
        };

        let mut steps = 0;
        loop {
            if let Some(limit) = self.inner.max_back_steps {
                if steps >= limit {
                    warn!(steps, "Back navigation reached its step limit");
                    return Err(RouterError::BackStepLimit(steps));
                }
            }
            if cancel.is_cancelled() {
                return Err(RouterError::Cancelled);
            }

            self.inner.source.go_back()?;
            steps += 1;

            // Events queued before this step still arrive first.
            let target = self.inner.source.location().key;
            let location = loop {
                let received = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(RouterError::Cancelled),
                    received = rx.recv() => received.ok_or(RouterError::LocationSourceClosed)?,
                };
                if received.key == target {
                    break received;
                }
                trace!(pathname = %received.pathname, key = received.key, "Skipping earlier change event");
            };

            let data = self.inner.resolve(&location.pathname);
            trace!(step = steps, name = ?data.name, pathname = %data.pathname, "Back step");
            if predicate(&data) {
                debug!(steps, name = ?data.name, "Back navigation reached target");
                return Ok(data);
            }
        }
    }

    /// Generates the pathname for a route without navigating.
    pub fn reverse(&self, name: &N, params: &RouteParams) -> RouterResult<String> {
        self.inner.table.reverse(name, params)
    }

    /// Returns `true` if the current route matches any of `patterns`.
    pub fn matches_one(&self, patterns: &[Pattern<N>]) -> bool {
        let current = self.inner.current.read().expect("router lock poisoned");
        matching::matches(&*current, true, patterns)
    }

    /// Returns `true` if the current route matches none of `patterns`.
    pub fn matches_none(&self, patterns: &[Pattern<N>]) -> bool {
        let current = self.inner.current.read().expect("router lock poisoned");
        matching::matches(&*current, false, patterns)
    }

    /// Returns the registered routes.
    pub fn table(&self) -> &RouteTable<N> {
        &self.inner.table
    }

    /// Returns the name used for pathnames that match no route.
    pub fn unknown_route_name(&self) -> &N {
        &self.inner.unknown_route_name
    }
}

impl Router<String> {
    /// Builds a router from the routes and options in `settings`.
    ///
    /// # Errors
    ///
    /// Same as [`Router::new`].
    pub fn from_settings(settings: &Settings, source: Arc<dyn LocationSource>) -> RouterResult<Self> {
        Self::with_back_step_limit(
            settings.unknown_route_name.clone(),
            settings.routes.iter().cloned().map(RouteDefinition::from),
            source,
            settings.max_back_steps,
        )
    }
}

/// Removes a temporary listener from its source when dropped.
struct ListenerGuard {
    source: Arc<dyn LocationSource>,
    id: ListenerId,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.source.unlisten(self.id);
    }
}
