//! # navroute
//!
//! Client-side route matching and navigation state for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `navroute` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use std::sync::Arc;
//! use navroute::router::{MemoryHistory, Router};
//! use navroute::urls::RouteDefinition;
//!
//! let history = Arc::new(MemoryHistory::new("/users/42"));
//! let router = Router::new(
//!     "unknown",
//!     vec![RouteDefinition::new("user", "/users/:id")],
//!     history,
//! )
//! .unwrap();
//!
//! assert_eq!(router.current_context().param("id"), Some("42"));
//! ```

/// Core types: error enum, settings, settings loaders, and logging.
pub use navroute_core as core;

/// Ordered signal dispatcher used as the route-change subscription hub.
#[cfg(feature = "signals")]
pub use navroute_signals as signals;

/// Route patterns, path converters, route tables, and reverse generation.
#[cfg(feature = "urls")]
pub use navroute_urls as urls;

/// Location sources, the router, route predicates, and the reactive binding.
#[cfg(feature = "router")]
pub use navroute_router as router;

// Third-party re-exports for user convenience
pub use tokio;
pub use tokio_util;
pub use tracing;

pub use navroute_core::{RouterError, RouterResult, Settings};
