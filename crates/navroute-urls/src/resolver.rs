//! Pathname resolution.
//!
//! [`RouteTable::resolve`] classifies a pathname into a [`RouteData`]: the
//! first registered route whose pattern matches, or the unknown route when
//! none does. Resolution is total and never fails.

use std::collections::HashMap;
use std::fmt;

use super::registry::RouteTable;

/// Bounds required of a route name type.
///
/// Names are only ever compared for equality. Any type with these bounds is
/// a route name: `&'static str`, `String`, or an integrator-defined enum.
pub trait RouteName: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> RouteName for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Parameter values extracted from, or substituted into, a pathname.
pub type RouteParams = HashMap<String, String>;

/// The classification of one pathname.
///
/// A `RouteData` is a value: a new one replaces the old on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteData<N> {
    /// The matched route's name, or the unknown route name.
    pub name: N,
    /// The extracted params. Empty for the unknown route.
    pub params: RouteParams,
    /// The pathname exactly as resolved.
    pub pathname: String,
}

impl<N> RouteData<N> {
    /// Builds the result for a pathname that matched no route.
    pub fn unknown(name: N, pathname: impl Into<String>) -> Self {
        Self {
            name,
            params: RouteParams::new(),
            pathname: pathname.into(),
        }
    }

    /// Returns the param named `key`, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl<N: RouteName> RouteTable<N> {
    /// Resolves a pathname against the registered routes.
    ///
    /// Routes are tried in registration order; the first match wins. When no
    /// route matches, the result carries `unknown`, empty params, and the
    /// raw pathname.
    ///
    /// # Examples
    ///
    /// ```
    /// use navroute_urls::{RouteDefinition, RouteTable};
    ///
    /// let table = RouteTable::register(vec![
    ///     RouteDefinition::new("user", "/users/:id"),
    /// ])
    /// .unwrap();
    ///
    /// let data = table.resolve("/users/42", &"unknown");
    /// assert_eq!(data.name, "user");
    /// assert_eq!(data.param("id"), Some("42"));
    ///
    /// let data = table.resolve("/other", &"unknown");
    /// assert_eq!(data.name, "unknown");
    /// assert!(data.params.is_empty());
    /// ```
    pub fn resolve(&self, pathname: &str, unknown: &N) -> RouteData<N> {
        for route in self {
            if let Some(params) = route.pattern().match_path(pathname) {
                tracing::trace!(name = ?route.name(), pathname, "Resolved pathname");
                return RouteData {
                    name: route.name().clone(),
                    params,
                    pathname: pathname.to_string(),
                };
            }
        }

        tracing::trace!(pathname, "No route matched, using unknown route");
        RouteData::unknown(unknown.clone(), pathname)
    }
}
