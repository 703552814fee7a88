//! Settings for navroute routers.
//!
//! This module provides the [`Settings`] struct, which holds the route table
//! and runtime knobs for a router built from configuration rather than code.
//! Load it with the functions in [`settings_loader`](crate::settings_loader).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single named route in configuration form.
///
/// # Examples
///
/// ```
/// use navroute_core::RouteEntry;
///
/// let entry = RouteEntry::new("user", "/users/:id");
/// assert_eq!(entry.name, "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// The route name.
    pub name: String,
    /// The path pattern (e.g. `/users/:id`).
    pub spec: String,
}

impl RouteEntry {
    /// Creates a route entry.
    pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

/// The complete set of router settings.
///
/// # Examples
///
/// ```
/// use navroute_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.unknown_route_name, "unknown");
/// assert!(settings.routes.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Routing ──────────────────────────────────────────────────────

    /// The name assigned to pathnames that match no route.
    pub unknown_route_name: String,
    /// Route definitions, in matching order.
    pub routes: Vec<RouteEntry>,
    /// Upper bound on back steps taken by a single `back_to` call.
    ///
    /// `None` lets `back_to` walk until the history is exhausted.
    pub max_back_steps: Option<usize>,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "navroute_router=debug").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            unknown_route_name: "unknown".to_string(),
            routes: Vec::new(),
            max_back_steps: None,
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}
