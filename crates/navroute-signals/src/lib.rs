//! # navroute-signals
//!
//! Signal dispatcher for navroute. A [`Signal`] keeps an ordered list of
//! receivers and calls them synchronously, in connection order, every time a
//! payload is sent. The router uses one `Signal` per instance as its
//! subscription hub for route changes.
//!
//! ## Usage
//!
//! ```
//! use navroute_signals::Signal;
//! use std::sync::Arc;
//!
//! let signal: Arc<Signal<String>> = Arc::new(Signal::new());
//!
//! let subscription = signal.subscribe(Arc::new(|path: &String| {
//!     println!("navigated to {path}");
//! }));
//!
//! assert_eq!(signal.send(&"/users/42".to_string()), 1);
//!
//! subscription.unsubscribe();
//! subscription.unsubscribe(); // no-op
//! assert_eq!(signal.receiver_count(), 0);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that signals can be dispatched from
/// any thread.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies one connection of a receiver to a [`Signal`].
///
/// Ids are never reused within a signal, so disconnecting an id can only ever
/// remove the registration it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

/// A signal that can be connected to and dispatched.
///
/// Each signal carries a payload type `T`. Receivers are called in the order
/// they were connected. The same callback may be connected several times; each
/// connection gets its own [`ReceiverId`].
///
/// # Examples
///
/// ```
/// use navroute_signals::Signal;
/// use std::sync::Arc;
///
/// let signal: Signal<u32> = Signal::new();
///
/// let id = signal.connect(Arc::new(|n: &u32| println!("got {n}")));
/// signal.send(&7);
///
/// assert!(signal.disconnect(id));
/// assert!(!signal.disconnect(id));
/// ```
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(ReceiverId, SignalReceiver<T>)>>,
    next_id: AtomicU64,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("receiver_count", &self.receiver_count())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub const fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Connects a receiver to this signal and returns its connection id.
    pub fn connect(&self, callback: SignalReceiver<T>) -> ReceiverId {
        let id = ReceiverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.receivers
            .write()
            .expect("signal lock poisoned")
            .push((id, callback));
        id
    }

    /// Disconnects the receiver registered under `id`.
    ///
    /// Returns `true` if a receiver was found and removed; disconnecting an
    /// id twice is a no-op.
    pub fn disconnect(&self, id: ReceiverId) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(rid, _)| *rid != id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// Receivers are called in connection order over a snapshot taken before
    /// the first call: receivers connected while the signal is being sent are
    /// first called on the next send, and no lock is held while receivers run.
    /// A panicking receiver is not caught. Returns the number of receivers
    /// called.
    pub fn send(&self, payload: &T) -> usize {
        let snapshot: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }

    /// Returns `true` if no receiver is connected.
    pub fn is_empty(&self) -> bool {
        self.receiver_count() == 0
    }

    /// Connects a receiver and returns a [`Subscription`] that can remove it.
    pub fn subscribe(self: &Arc<Self>, callback: SignalReceiver<T>) -> Subscription<T> {
        let id = self.connect(callback);
        Subscription {
            signal: Arc::downgrade(self),
            id,
        }
    }
}

/// A handle that removes one receiver from its [`Signal`].
///
/// The handle only holds a weak reference: it does not keep the signal alive,
/// and dropping it does **not** disconnect the receiver. Call
/// [`unsubscribe`](Self::unsubscribe) explicitly; it is idempotent.
pub struct Subscription<T: 'static> {
    signal: Weak<Signal<T>>,
    id: ReceiverId,
}

impl<T: 'static> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            signal: Weak::clone(&self.signal),
            id: self.id,
        }
    }
}

impl<T: 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl<T: 'static> Subscription<T> {
    /// Returns the connection id this subscription removes.
    pub const fn id(&self) -> ReceiverId {
        self.id
    }

    /// Disconnects the receiver.
    ///
    /// Returns `true` only for the call that actually removed it. Further
    /// calls, or calls after the signal was dropped, return `false`.
    pub fn unsubscribe(&self) -> bool {
        self.signal
            .upgrade()
            .is_some_and(|signal| signal.disconnect(self.id))
    }

    /// Returns `true` while the receiver is still connected.
    pub fn is_active(&self) -> bool {
        self.signal.upgrade().is_some_and(|signal| {
            signal
                .receivers
                .read()
                .expect("signal lock poisoned")
                .iter()
                .any(|(rid, _)| *rid == self.id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[test]
    fn test_signal_connect_and_send() {
        let signal: Signal<String> = Signal::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        signal.connect(Arc::new(move |_: &String| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let called = signal.send(&"hello".to_string());
        assert_eq!(called, 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_signal_multiple_receivers_in_order() {
        let signal: Signal<i32> = Signal::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let o = order.clone();
            signal.connect(Arc::new(move |_: &i32| {
                o.lock().unwrap().push(i);
            }));
        }

        assert_eq!(signal.receiver_count(), 3);
        assert_eq!(signal.send(&42), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal: Signal<()> = Signal::new();

        let a = signal.connect(Arc::new(|(): &()| {}));
        let _b = signal.connect(Arc::new(|(): &()| {}));
        assert_eq!(signal.receiver_count(), 2);

        assert!(signal.disconnect(a));
        assert_eq!(signal.receiver_count(), 1);

        assert!(!signal.disconnect(a));
        assert_eq!(signal.receiver_count(), 1);
    }

    #[test]
    fn test_same_callback_connected_twice_gets_distinct_ids() {
        let signal: Signal<()> = Signal::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let callback: SignalReceiver<()> = Arc::new(move |(): &()| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let first = signal.connect(callback.clone());
        let second = signal.connect(callback);
        assert_ne!(first, second);

        signal.send(&());
        assert_eq!(count.load(Ordering::SeqCst), 2);

        signal.disconnect(first);
        signal.send(&());
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_empty_signal_send() {
        let signal: Signal<()> = Signal::new();
        assert!(signal.is_empty());
        assert_eq!(signal.send(&()), 0);
    }

    #[test]
    fn test_subscription_unsubscribe_is_idempotent() {
        let signal: Arc<Signal<()>> = Arc::new(Signal::new());
        let first = signal.subscribe(Arc::new(|(): &()| {}));
        let second = signal.subscribe(Arc::new(|(): &()| {}));

        assert!(first.is_active());
        assert!(first.unsubscribe());
        assert!(!first.unsubscribe());
        assert!(!first.is_active());

        assert!(second.is_active());
        assert_eq!(signal.receiver_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_signal() {
        let signal: Arc<Signal<()>> = Arc::new(Signal::new());
        let sub = signal.subscribe(Arc::new(|(): &()| {}));
        drop(signal);
        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_signal_default() {
        let signal: Signal<i32> = Signal::default();
        assert_eq!(signal.receiver_count(), 0);
    }
}
