//! An in-memory [`LocationSource`].
//!
//! [`MemoryHistory`] keeps a stack of entries and a cursor, like a browser
//! tab's session history. Navigation calls only move the cursor and queue a
//! change event; events reach listeners when [`MemoryHistory::flush`] runs,
//! either called directly or from the task started by
//! [`MemoryHistory::spawn_dispatcher`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use navroute_core::{RouterError, RouterResult};

use crate::history::{HistoryState, ListenerId, Location, LocationListener, LocationSource};

struct Stack {
    entries: Vec<Location>,
    index: usize,
    key: u64,
}

impl Stack {
    fn current(&self) -> Location {
        self.entries[self.index].clone().with_key(self.key)
    }

    /// Stamps the entry at the cursor with a new navigation key.
    fn visit(&mut self) -> Location {
        self.key += 1;
        self.current()
    }
}

/// A session history held in memory.
///
/// # Examples
///
/// ```
/// use navroute_router::{LocationSource, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/users/1", None).unwrap();
/// history.push("/users/2", None).unwrap();
/// history.go_back().unwrap();
///
/// assert_eq!(history.location().pathname, "/users/1");
/// assert_eq!(history.len(), 3);
/// assert_eq!(history.flush(), 3);
/// ```
pub struct MemoryHistory {
    stack: RwLock<Stack>,
    listeners: RwLock<Vec<(ListenerId, LocationListener)>>,
    next_id: AtomicU64,
    pending: Mutex<VecDeque<Location>>,
    notify: Notify,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self.stack.read().expect("history lock poisoned");
        f.debug_struct("MemoryHistory")
            .field("entries", &stack.entries)
            .field("index", &stack.index)
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl MemoryHistory {
    /// Creates a history with a single entry.
    pub fn new(pathname: impl Into<String>) -> Self {
        let pathname: String = pathname.into();
        Self::with_entries([pathname])
    }

    /// Creates a history from existing entries, positioned at the last one.
    ///
    /// An empty list yields a single `/` entry.
    pub fn with_entries<I, S>(pathnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<Location> = pathnames.into_iter().map(Location::new).collect();
        if entries.is_empty() {
            entries.push(Location::new("/"));
        }
        let index = entries.len() - 1;

        Self {
            stack: RwLock::new(Stack {
                entries,
                index,
                key: 0,
            }),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            pending: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.stack.read().expect("history lock poisoned").entries.len()
    }

    /// Always `false`: a history has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cursor position.
    pub fn index(&self) -> usize {
        self.stack.read().expect("history lock poisoned").index
    }

    /// Returns the pathnames of all entries, oldest first.
    pub fn pathnames(&self) -> Vec<String> {
        self.stack
            .read()
            .expect("history lock poisoned")
            .entries
            .iter()
            .map(|loc| loc.pathname.clone())
            .collect()
    }

    /// Returns `true` if [`go_back`](LocationSource::go_back) would succeed.
    pub fn can_go_back(&self) -> bool {
        self.index() > 0
    }

    /// Returns `true` if [`go_forward`](Self::go_forward) would succeed.
    pub fn can_go_forward(&self) -> bool {
        let stack = self.stack.read().expect("history lock poisoned");
        stack.index + 1 < stack.entries.len()
    }

    /// Moves to the next entry.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::HistoryExhausted`] at the newest entry.
    pub fn go_forward(&self) -> RouterResult<()> {
        let mut stack = self.stack.write().expect("history lock poisoned");
        if stack.index + 1 >= stack.entries.len() {
            return Err(RouterError::HistoryExhausted);
        }
        stack.index += 1;
        let location = stack.visit();
        trace!(pathname = %location.pathname, key = location.key, "History go_forward");
        self.enqueue(location);
        Ok(())
    }

    /// Returns the number of queued change events.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("history lock poisoned").len()
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().expect("history lock poisoned").len()
    }

    /// Delivers every queued change event, oldest first.
    ///
    /// Each event goes to the listeners registered when it is delivered, in
    /// registration order. Events queued by a listener are delivered by the
    /// same call. Returns the number of events delivered.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.pending.lock().expect("history lock poisoned").pop_front();
            let Some(location) = next else {
                break;
            };

            let snapshot: Vec<LocationListener> = self
                .listeners
                .read()
                .expect("history lock poisoned")
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();

            for listener in &snapshot {
                listener(&location);
            }
            delivered += 1;
        }
        delivered
    }

    /// Starts a task that delivers change events as they are queued.
    ///
    /// The task runs until `cancel` is cancelled.
    pub fn spawn_dispatcher(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let history = Arc::clone(self);
        tokio::spawn(async move {
            debug!("History dispatcher started");
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        debug!("History dispatcher stopped");
                        break;
                    }
                    () = history.notify.notified() => {
                        history.flush();
                    }
                }
            }
        })
    }

    fn enqueue(&self, location: Location) {
        self.pending
            .lock()
            .expect("history lock poisoned")
            .push_back(location);
        self.notify.notify_one();
    }
}

impl LocationSource for MemoryHistory {
    fn location(&self) -> Location {
        self.stack.read().expect("history lock poisoned").current()
    }

    fn listen(&self, listener: LocationListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .expect("history lock poisoned")
            .push((id, listener));
        id
    }

    fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().expect("history lock poisoned");
        let len_before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() < len_before
    }

    fn push(&self, pathname: &str, state: Option<HistoryState>) -> RouterResult<()> {
        let mut stack = self.stack.write().expect("history lock poisoned");
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(Location {
            pathname: pathname.to_string(),
            state,
            key: 0,
        });
        stack.index = keep;
        let location = stack.visit();
        trace!(pathname, key = location.key, "History push");
        self.enqueue(location);
        Ok(())
    }

    fn go_back(&self) -> RouterResult<()> {
        let mut stack = self.stack.write().expect("history lock poisoned");
        if stack.index == 0 {
            return Err(RouterError::HistoryExhausted);
        }
        stack.index -= 1;
        let location = stack.visit();
        trace!(pathname = %location.pathname, key = location.key, "History go_back");
        self.enqueue(location);
        Ok(())
    }
}
