//! Predicates over the current route.
//!
//! A [`Pattern`] either names a route or constrains params, optionally for a
//! specific route. [`matches`] evaluates a list of patterns against a
//! [`RouteData`] with positive or negative polarity.

use navroute_urls::{RouteData, RouteParams};

/// One alternative in a route predicate.
///
/// # Examples
///
/// ```
/// use navroute_router::matching::{matches, Pattern};
/// use navroute_urls::RouteData;
///
/// let mut current = RouteData::unknown("user", "/users/42");
/// current.params.insert("id".into(), "42".into());
///
/// assert!(matches(&current, true, &[Pattern::name("user")]));
/// assert!(matches(&current, true, &[Pattern::any_with_params([("id", "42")])]));
/// assert!(!matches(&current, true, &[Pattern::with_params("home", [("id", "42")])]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern<N> {
    /// Matches when the current route has this name.
    Name(N),
    /// Matches when every listed param is present with an identical value.
    ///
    /// With `name: None` any route qualifies. Params of the current route
    /// that are not listed are ignored.
    Constrained {
        /// The required route name, if any.
        name: Option<N>,
        /// The required param values.
        params: RouteParams,
    },
}

fn collect_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl<N: PartialEq> Pattern<N> {
    /// A pattern matching the route named `name`.
    pub const fn name(name: N) -> Self {
        Self::Name(name)
    }

    /// A pattern matching the route named `name` with the given params.
    pub fn with_params<K, V>(name: N, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Constrained {
            name: Some(name),
            params: collect_params(params),
        }
    }

    /// A pattern matching any route with the given params.
    pub fn any_with_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Constrained {
            name: None,
            params: collect_params(params),
        }
    }

    /// Returns `true` if `current` satisfies this pattern.
    pub fn is_match(&self, current: &RouteData<N>) -> bool {
        match self {
            Self::Name(name) => *name == current.name,
            Self::Constrained { name, params } => {
                name.as_ref().map_or(true, |n| *n == current.name)
                    && params
                        .iter()
                        .all(|(key, value)| current.params.get(key) == Some(value))
            }
        }
    }
}

impl<N> From<N> for Pattern<N> {
    fn from(name: N) -> Self {
        Self::Name(name)
    }
}

/// Evaluates `patterns` against `current`.
///
/// Returns `want_positive` as soon as one pattern matches, and
/// `!want_positive` when none does. An empty list therefore yields
/// `!want_positive`.
pub fn matches<N: PartialEq>(current: &RouteData<N>, want_positive: bool, patterns: &[Pattern<N>]) -> bool {
    if patterns.iter().any(|pattern| pattern.is_match(current)) {
        want_positive
    } else {
        !want_positive
    }
}
