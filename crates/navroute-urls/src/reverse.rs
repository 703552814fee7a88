//! Reverse pathname generation.
//!
//! This module turns a route name plus params back into a pathname, the
//! inverse of [`RouteTable::resolve`]. A generated pathname always resolves
//! to the same route with the same params, provided no earlier route also
//! matches it.

use navroute_core::{RouterError, RouterResult};

use super::pattern::{ConverterEntry, RoutePattern, Segment};
use super::registry::RouteTable;
use super::resolver::{RouteName, RouteParams};

impl<N: RouteName> RouteTable<N> {
    /// Generates the pathname for the route named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownRouteName`] if no route has that name,
    /// or [`RouterError::ParamsMismatch`] if the params do not fit its spec.
    ///
    /// # Examples
    ///
    /// ```
    /// use navroute_urls::{RouteDefinition, RouteParams, RouteTable};
    ///
    /// let table = RouteTable::register(vec![
    ///     RouteDefinition::new("user", "/users/:id"),
    /// ])
    /// .unwrap();
    ///
    /// let mut params = RouteParams::new();
    /// params.insert("id".into(), "42".into());
    /// assert_eq!(table.reverse(&"user", &params).unwrap(), "/users/42");
    ///
    /// assert!(table.reverse(&"user", &RouteParams::new()).is_err());
    /// assert!(table.reverse(&"missing", &params).is_err());
    /// ```
    pub fn reverse(&self, name: &N, params: &RouteParams) -> RouterResult<String> {
        let route = self
            .get(name)
            .ok_or_else(|| RouterError::UnknownRouteName(format!("{name:?}")))?;

        route
            .pattern()
            .reverse(params)
            .ok_or_else(|| RouterError::ParamsMismatch {
                name: format!("{name:?}"),
                spec: route.spec().to_string(),
            })
    }
}

/// Substitutes params into a compiled pattern.
///
/// Returns `None` when a parameter outside every optional group is missing
/// or rejected by its converter.
pub(crate) fn substitute_pattern(pattern: &RoutePattern, params: &RouteParams) -> Option<String> {
    let mut url = String::new();
    render(pattern.segments(), pattern.converters(), params, &mut url).then_some(url)
}

fn render(
    segments: &[Segment],
    converters: &[ConverterEntry],
    params: &RouteParams,
    out: &mut String,
) -> bool {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Param(index) => {
                let (name, converter) = &converters[*index];
                let Some(value) = params.get(name).and_then(|v| converter.to_url(v)) else {
                    return false;
                };
                out.push_str(&value);
            }
            Segment::Optional(children) => {
                let mut group = String::new();
                if render(children, converters, params, &mut group) {
                    out.push_str(&group);
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RouteDefinition;

    fn params(pairs: &[(&str, &str)]) -> RouteParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn reverse_spec(spec: &str, pairs: &[(&str, &str)]) -> Option<String> {
        RoutePattern::new(spec).unwrap().reverse(&params(pairs))
    }

    #[test]
    fn test_reverse_literal() {
        assert_eq!(reverse_spec("/about", &[]).as_deref(), Some("/about"));
    }

    #[test]
    fn test_reverse_required_params() {
        assert_eq!(
            reverse_spec("/users/:id/posts/<int:post>", &[("id", "alice"), ("post", "7")]).as_deref(),
            Some("/users/alice/posts/7")
        );
        assert!(reverse_spec("/users/:id", &[]).is_none());
    }

    #[test]
    fn test_reverse_ignores_extra_params() {
        assert_eq!(
            reverse_spec("/users/:id", &[("id", "1"), ("tab", "posts")]).as_deref(),
            Some("/users/1")
        );
    }

    #[test]
    fn test_reverse_rejects_invalid_values() {
        assert!(reverse_spec("/archive/<int:year>", &[("year", "twenty")]).is_none());
        assert!(reverse_spec("/users/:id", &[("id", "")]).is_none());
    }

    #[test]
    fn test_reverse_optional_groups() {
        let spec = "/list(/:category(/<int:page>))";
        assert_eq!(reverse_spec(spec, &[]).as_deref(), Some("/list"));
        assert_eq!(
            reverse_spec(spec, &[("category", "books")]).as_deref(),
            Some("/list/books")
        );
        assert_eq!(
            reverse_spec(spec, &[("category", "books"), ("page", "2")]).as_deref(),
            Some("/list/books/2")
        );
        // An invalid optional value drops only its own group.
        assert_eq!(
            reverse_spec(spec, &[("category", "books"), ("page", "x")]).as_deref(),
            Some("/list/books")
        );
        // The inner group cannot render without the outer one.
        assert_eq!(reverse_spec(spec, &[("page", "2")]).as_deref(), Some("/list"));
    }

    #[test]
    fn test_reverse_encodes_values() {
        assert_eq!(
            reverse_spec("/tags/:tag", &[("tag", "a/b c")]).as_deref(),
            Some("/tags/a%2Fb%20c")
        );
        assert_eq!(
            reverse_spec("/files/*path", &[("path", "docs/read me.md")]).as_deref(),
            Some("/files/docs/read%20me.md")
        );
    }

    #[test]
    fn test_reverse_round_trip() {
        let table = RouteTable::register(vec![
            RouteDefinition::new("user", "/users/:id(/posts/<int:page>)"),
            RouteDefinition::new("file", "/files/*path"),
            RouteDefinition::new("item", "/items/<uuid:id>/<slug:slug>"),
        ])
        .unwrap();

        for pathname in [
            "/users/42",
            "/users/j%20doe/posts/3",
            "/files/a/b/c.txt",
            "/items/550e8400-e29b-41d4-a716-446655440000/blue-shirt",
        ] {
            let data = table.resolve(pathname, &"unknown");
            assert_ne!(data.name, "unknown", "{pathname}");
            let generated = table.reverse(&data.name, &data.params).unwrap();
            let again = table.resolve(&generated, &"unknown");
            assert_eq!(again.name, data.name);
            assert_eq!(again.params, data.params);
        }
    }

    #[test]
    fn test_table_reverse_errors() {
        let table = RouteTable::register(vec![RouteDefinition::new("user", "/users/:id")]).unwrap();

        let err = table.reverse(&"user", &RouteParams::new()).unwrap_err();
        assert!(err.is_navigation());
        assert!(matches!(
            err,
            RouterError::ParamsMismatch { ref spec, .. } if spec == "/users/:id"
        ));

        let err = table.reverse(&"nope", &RouteParams::new()).unwrap_err();
        assert!(matches!(err, RouterError::UnknownRouteName(ref n) if n == "\"nope\""));
    }
}
