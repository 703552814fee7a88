//! Route registration.
//!
//! A [`RouteTable`] is built once from an ordered list of
//! [`RouteDefinition`]s. Registration compiles every spec and rejects
//! duplicate names; the resulting table is immutable.

use std::fmt;

use serde::{Deserialize, Serialize};

use navroute_core::{RouteEntry, RouterError, RouterResult};

use super::pattern::RoutePattern;
use super::resolver::RouteName;

/// A named route spec as supplied by the integrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition<N> {
    /// The route's name. Must be unique within one table.
    pub name: N,
    /// The spec string, compiled by [`RoutePattern::new`].
    pub spec: String,
}

impl<N> RouteDefinition<N> {
    /// Creates a new route definition.
    pub fn new(name: N, spec: impl Into<String>) -> Self {
        Self {
            name,
            spec: spec.into(),
        }
    }
}

impl From<RouteEntry> for RouteDefinition<String> {
    fn from(entry: RouteEntry) -> Self {
        Self::new(entry.name, entry.spec)
    }
}

/// A registered route: its name and compiled pattern.
pub struct CompiledRoute<N> {
    name: N,
    pattern: RoutePattern,
}

impl<N: fmt::Debug> fmt::Debug for CompiledRoute<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("name", &self.name)
            .field("spec", &self.pattern.spec())
            .finish()
    }
}

impl<N> CompiledRoute<N> {
    /// Returns the route name.
    pub const fn name(&self) -> &N {
        &self.name
    }

    /// Returns the compiled pattern.
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the spec the pattern was compiled from.
    pub fn spec(&self) -> &str {
        self.pattern.spec()
    }
}

/// The ordered set of registered routes.
///
/// Lookup order is registration order and the first matching route wins.
///
/// # Examples
///
/// ```
/// use navroute_urls::{RouteDefinition, RouteTable};
///
/// let table = RouteTable::register(vec![
///     RouteDefinition::new("home", "/"),
///     RouteDefinition::new("user", "/users/:id"),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert!(table.contains(&"user"));
///
/// let duplicate = RouteTable::register(vec![
///     RouteDefinition::new("user", "/users/:id"),
///     RouteDefinition::new("user", "/u/:id"),
/// ]);
/// assert!(duplicate.is_err());
/// ```
pub struct RouteTable<N> {
    routes: Vec<CompiledRoute<N>>,
}

impl<N: fmt::Debug> fmt::Debug for RouteTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.routes).finish()
    }
}

impl<N: RouteName> RouteTable<N> {
    /// Compiles the definitions, in order, into a route table.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRouteName`] if two definitions share a
    /// name, or [`RouterError::InvalidPattern`] if a spec does not compile.
    pub fn register<I>(definitions: I) -> RouterResult<Self>
    where
        I: IntoIterator<Item = RouteDefinition<N>>,
    {
        let mut routes: Vec<CompiledRoute<N>> = Vec::new();

        for definition in definitions {
            if let Some(existing) = routes.iter().find(|r| r.name == definition.name) {
                return Err(RouterError::DuplicateRouteName {
                    name: format!("{:?}", definition.name),
                    existing_spec: existing.spec().to_string(),
                    new_spec: definition.spec,
                });
            }

            let pattern = RoutePattern::new(&definition.spec)?;
            tracing::debug!(name = ?definition.name, spec = %definition.spec, "Registered route");
            routes.push(CompiledRoute {
                name: definition.name,
                pattern,
            });
        }

        Ok(Self { routes })
    }

    /// Returns the route registered under `name`.
    pub fn get(&self, name: &N) -> Option<&CompiledRoute<N>> {
        self.routes.iter().find(|r| &r.name == name)
    }

    /// Returns `true` if a route is registered under `name`.
    pub fn contains(&self, name: &N) -> bool {
        self.get(name).is_some()
    }
}

impl<N> RouteTable<N> {
    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRoute<N>> {
        self.routes.iter()
    }
}

impl<'a, N> IntoIterator for &'a RouteTable<N> {
    type Item = &'a CompiledRoute<N>;
    type IntoIter = std::slice::Iter<'a, CompiledRoute<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
