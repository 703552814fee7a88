//! # navroute-router
//!
//! Navigation state for navroute. A [`Router`] classifies the location of a
//! [`LocationSource`] into a named route, notifies subscribers whenever that
//! route changes, and navigates the source by route name.
//!
//! ## Modules
//!
//! - [`history`] - The [`LocationSource`] trait and [`Location`] entries
//! - [`memory`] - [`MemoryHistory`], an in-memory location source
//! - [`router`] - [`Router`]: current route, subscriptions, `go_to`, `back_to`
//! - [`matching`] - [`Pattern`] predicates over the current route
//! - [`binding`] - [`CurrentRoute`], a watch-channel view of a router
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use navroute_router::{MemoryHistory, Pattern, Router};
//! use navroute_urls::{RouteDefinition, RouteParams};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let history = Arc::new(MemoryHistory::new("/"));
//! let cancel = CancellationToken::new();
//! history.spawn_dispatcher(cancel.clone());
//!
//! let router = Router::new(
//!     "unknown",
//!     vec![
//!         RouteDefinition::new("home", "/"),
//!         RouteDefinition::new("user", "/users/:id"),
//!     ],
//!     history.clone(),
//! )
//! .unwrap();
//!
//! let mut params = RouteParams::new();
//! params.insert("id".into(), "42".into());
//! router.go_to(&"user", &params).unwrap();
//!
//! let home = router
//!     .back_to(|route| route.name == "home", &cancel)
//!     .await
//!     .unwrap();
//! assert_eq!(home.pathname, "/");
//! assert!(router.matches_one(&[Pattern::name("home")]));
//! cancel.cancel();
//! # }
//! ```

pub mod binding;
pub mod history;
pub mod matching;
pub mod memory;
pub mod router;

pub use binding::CurrentRoute;
pub use history::{HistoryState, ListenerId, Location, LocationListener, LocationSource};
pub use matching::Pattern;
pub use memory::MemoryHistory;
pub use router::{Router, Unsubscribe};
