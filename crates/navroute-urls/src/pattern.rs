//! Route pattern parsing and matching.
//!
//! This module provides [`RoutePattern`], the compiled form of a route spec.
//! A pattern supports forward matching (pathname to params) and reverse
//! generation (params to pathname).
//!
//! # Spec syntax
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `/users` | literal text |
//! | `:id` | single-segment parameter (`str` converter) |
//! | `*rest` | parameter spanning segments (`path` converter) |
//! | `<int:year>` | typed parameter, see [`converters`](super::converters) |
//! | `<name>` | same as `<str:name>` |
//! | `(/page/:page)` | optional group, may nest |
//!
//! A spec must match the whole pathname.

use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;

use regex::Regex;

use navroute_core::{RouterError, RouterResult};

use super::converters::{self, PathConverter, PathSegmentConverter, StrConverter};
use super::resolver::RouteParams;
use super::reverse::substitute_pattern;

/// A named converter entry: `(parameter_name, converter)`.
pub type ConverterEntry = (String, Box<dyn PathConverter>);

/// One element of a parsed spec.
#[derive(Debug)]
pub(crate) enum Segment {
    /// Text that must appear verbatim.
    Literal(String),
    /// A parameter, by index into the pattern's converter list.
    Param(usize),
    /// A group that may be absent as a whole.
    Optional(Vec<Segment>),
}

/// A compiled route spec.
///
/// # Examples
///
/// ```
/// use navroute_urls::RoutePattern;
/// use std::collections::HashMap;
///
/// let pattern = RoutePattern::new("/users/:id(/posts/<int:page>)").unwrap();
///
/// let params = pattern.match_path("/users/42/posts/3").unwrap();
/// assert_eq!(params["id"], "42");
/// assert_eq!(params["page"], "3");
///
/// let mut params = HashMap::new();
/// params.insert("id".to_string(), "7".to_string());
/// assert_eq!(pattern.reverse(&params).as_deref(), Some("/users/7"));
/// ```
pub struct RoutePattern {
    /// The spec string as written (e.g., `"/users/:id"`)
    spec: String,
    /// The compiled, anchored regex used for matching
    regex: Regex,
    /// Named converters extracted from the spec, in order
    converters: Vec<ConverterEntry>,
    /// The parsed spec, used for reverse generation
    segments: Vec<Segment>,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("spec", &self.spec)
            .field("regex", &self.regex.as_str())
            .field("converters", &self.converters)
            .finish_non_exhaustive()
    }
}

impl RoutePattern {
    /// Compiles a spec string.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for unclosed or stray brackets,
    /// unknown converter types, empty parameter names, or a parameter name
    /// used twice.
    pub fn new(spec: &str) -> RouterResult<Self> {
        let mut parser = SpecParser {
            spec,
            chars: spec.char_indices().peekable(),
            converters: Vec::new(),
            seen: HashSet::new(),
        };
        let segments = parser.parse_sequence(false)?;
        let converters = parser.converters;

        let mut regex_str = String::from("^");
        write_regex(&segments, &converters, &mut regex_str);
        regex_str.push('$');

        let regex = Regex::new(&regex_str).map_err(|e| {
            RouterError::InvalidPattern(format!("Invalid pattern regex for '{spec}': {e}"))
        })?;

        Ok(Self {
            spec: spec.to_string(),
            regex,
            converters,
            segments,
        })
    }

    /// Returns the spec string.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Returns the compiled regex.
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the named converters for this pattern, in spec order.
    pub fn converters(&self) -> &[ConverterEntry] {
        &self.converters
    }

    /// Returns the parameter names, in spec order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.converters.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Attempts to match the whole pathname against this pattern.
    ///
    /// Returns the extracted params on success. Parameters inside optional
    /// groups that did not participate in the match are absent from the map.
    /// Returns `None` if the pathname does not match or a converter rejects a
    /// captured segment.
    pub fn match_path(&self, pathname: &str) -> Option<RouteParams> {
        let captures = self.regex.captures(pathname)?;

        let mut params = RouteParams::new();
        for (name, converter) in &self.converters {
            if let Some(m) = captures.name(name) {
                let value = converter.to_value(m.as_str())?;
                params.insert(name.clone(), value);
            }
        }
        Some(params)
    }

    /// Returns `true` if the pathname matches this pattern.
    pub fn is_match(&self, pathname: &str) -> bool {
        self.match_path(pathname).is_some()
    }

    /// Generates a pathname from params.
    ///
    /// Every parameter outside optional groups must be present and accepted
    /// by its converter. An optional group is emitted only if all of its
    /// parameters are present and accepted. Params not named by the spec are
    /// ignored. Returns `None` if a required parameter is missing or invalid.
    pub fn reverse(&self, params: &RouteParams) -> Option<String> {
        substitute_pattern(self, params)
    }
}

/// Writes the regex for a segment list.
fn write_regex(segments: &[Segment], converters: &[ConverterEntry], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(&regex::escape(text)),
            Segment::Param(index) => {
                let (name, converter) = &converters[*index];
                write!(out, "(?P<{name}>{})", converter.regex()).ok();
            }
            Segment::Optional(children) => {
                out.push_str("(?:");
                write_regex(children, converters, out);
                out.push_str(")?");
            }
        }
    }
}

/// Parses the `<type:name>` portion of a spec, returning `(type_name, param_name)`.
/// Defaults to `"str"` if no colon is present.
fn parse_type_and_name(inner: &str) -> (&str, &str) {
    inner
        .find(':')
        .map_or(("str", inner), |pos| (&inner[..pos], &inner[pos + 1..]))
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct SpecParser<'a> {
    spec: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    converters: Vec<ConverterEntry>,
    seen: HashSet<String>,
}

impl SpecParser<'_> {
    fn invalid(&self, reason: &str) -> RouterError {
        RouterError::InvalidPattern(format!("{reason} in route spec: {}", self.spec))
    }

    /// Parses segments until the end of the spec, or until the `)` closing
    /// the current group when `in_group` is set.
    fn parse_sequence(&mut self, in_group: bool) -> RouterResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal = String::new();

        while let Some((_, c)) = self.chars.next() {
            match c {
                '(' => {
                    flush_literal(&mut literal, &mut segments);
                    let children = self.parse_sequence(true)?;
                    segments.push(Segment::Optional(children));
                }
                ')' => {
                    if !in_group {
                        return Err(self.invalid("Unmatched ')'"));
                    }
                    flush_literal(&mut literal, &mut segments);
                    return Ok(segments);
                }
                ':' | '*' => {
                    flush_literal(&mut literal, &mut segments);
                    let name = self.take_name();
                    let converter: Box<dyn PathConverter> = if c == ':' {
                        Box::new(StrConverter)
                    } else {
                        Box::new(PathSegmentConverter)
                    };
                    segments.push(self.push_param(&name, converter)?);
                }
                '<' => {
                    flush_literal(&mut literal, &mut segments);
                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, next) in self.chars.by_ref() {
                        if next == '>' {
                            closed = true;
                            break;
                        }
                        inner.push(next);
                    }
                    if !closed {
                        return Err(self.invalid("Unclosed angle bracket"));
                    }
                    let (type_name, param_name) = parse_type_and_name(&inner);
                    let converter = converters::get_converter(type_name)?;
                    segments.push(self.push_param(param_name, converter)?);
                }
                other => literal.push(other),
            }
        }

        if in_group {
            return Err(self.invalid("Unclosed '('"));
        }
        flush_literal(&mut literal, &mut segments);
        Ok(segments)
    }

    fn take_name(&mut self) -> String {
        let mut name = String::new();
        while let Some((_, c)) = self.chars.peek() {
            if !is_name_char(*c) {
                break;
            }
            name.push(*c);
            self.chars.next();
        }
        name
    }

    fn push_param(
        &mut self,
        name: &str,
        converter: Box<dyn PathConverter>,
    ) -> RouterResult<Segment> {
        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err(self.invalid(&format!("Invalid parameter name '{name}'")));
        }
        if !self.seen.insert(name.to_string()) {
            return Err(self.invalid(&format!("Duplicate parameter '{name}'")));
        }
        self.converters.push((name.to_string(), converter));
        Ok(Segment::Param(self.converters.len() - 1))
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}
