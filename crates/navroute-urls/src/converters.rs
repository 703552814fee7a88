//! Path converters for route pattern matching.
//!
//! This module provides the [`PathConverter`] trait and the built-in
//! converters used by typed route parameters (`<type:name>`). Converters
//! decide which text a parameter matches, how a matched segment becomes a
//! param value, and how a param value is written back into a URL.
//!
//! Param values are always plain strings. Matched segments are
//! percent-decoded on the way in and values are percent-encoded on the way
//! out, so any value produced by matching a pathname generates a pathname
//! that matches back to the same value.
//!
//! # Built-in converters
//!
//! | Name   | Regex                                  | Accepts |
//! |--------|----------------------------------------|---------|
//! | `int`  | `[0-9]+`                               | non-negative `i64` |
//! | `str`  | `[^/]+`                                | any non-empty text, `/` encoded |
//! | `slug` | `[-a-zA-Z0-9_]+`                       | ASCII slugs |
//! | `uuid` | `[0-9a-f]{8}-...-[0-9a-f]{12}`         | hyphenated UUIDs |
//! | `path` | `.+`                                   | any non-empty text, `/` kept |
//!
//! `:name` parameters use `str`; `*name` parameters use `path`.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use navroute_core::{RouterError, RouterResult};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a multi-segment value; `/` is kept.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Trait for converting URL path segments to param values and back.
///
/// Implementations provide a regex fragment for matching plus the two
/// conversions. Both conversions return `None` to reject a value: a rejected
/// segment makes the whole pattern fail to match, and a rejected value makes
/// reverse generation fail.
pub trait PathConverter: Send + Sync + fmt::Debug {
    /// Returns the regex fragment that matches valid segments for this converter.
    fn regex(&self) -> &'static str;

    /// Converts a matched, still percent-encoded segment into a param value.
    fn to_value(&self, raw: &str) -> Option<String>;

    /// Converts a param value into its URL form.
    fn to_url(&self, value: &str) -> Option<String>;
}

fn decode(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}

/// Converter for integer path segments.
///
/// Matches one or more digits that fit in an `i64`.
#[derive(Debug, Clone, Copy)]
pub struct IntConverter;

impl PathConverter for IntConverter {
    fn regex(&self) -> &'static str {
        "[0-9]+"
    }

    fn to_value(&self, raw: &str) -> Option<String> {
        raw.parse::<i64>().ok().map(|_| raw.to_string())
    }

    fn to_url(&self, value: &str) -> Option<String> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        value.parse::<i64>().ok().map(|_| value.to_string())
    }
}

/// Converter for single-segment parameters.
///
/// Matches any non-empty text without `/`; a `/` inside a value is
/// percent-encoded when generating a URL.
#[derive(Debug, Clone, Copy)]
pub struct StrConverter;

impl PathConverter for StrConverter {
    fn regex(&self) -> &'static str {
        "[^/]+"
    }

    fn to_value(&self, raw: &str) -> Option<String> {
        decode(raw).filter(|v| !v.is_empty())
    }

    fn to_url(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        Some(utf8_percent_encode(value, SEGMENT).to_string())
    }
}

/// Converter for slug path segments.
///
/// Matches strings containing only ASCII letters, digits, hyphens, and underscores.
#[derive(Debug, Clone, Copy)]
pub struct SlugConverter;

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl PathConverter for SlugConverter {
    fn regex(&self) -> &'static str {
        "[-a-zA-Z0-9_]+"
    }

    fn to_value(&self, raw: &str) -> Option<String> {
        is_slug(raw).then(|| raw.to_string())
    }

    fn to_url(&self, value: &str) -> Option<String> {
        is_slug(value).then(|| value.to_string())
    }
}

/// Converter for UUID path segments.
///
/// Matches the lowercase hyphenated format (`8-4-4-4-12` hex digits).
/// Generated URLs always use that format.
#[derive(Debug, Clone, Copy)]
pub struct UuidConverter;

impl PathConverter for UuidConverter {
    fn regex(&self) -> &'static str {
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
    }

    fn to_value(&self, raw: &str) -> Option<String> {
        raw.parse::<uuid::Uuid>().ok().map(|_| raw.to_string())
    }

    fn to_url(&self, value: &str) -> Option<String> {
        value
            .parse::<uuid::Uuid>()
            .ok()
            .map(|uuid| uuid.hyphenated().to_string())
    }
}

/// Converter for parameters that may span several segments.
///
/// Matches any non-empty text, including forward slashes.
#[derive(Debug, Clone, Copy)]
pub struct PathSegmentConverter;

impl PathConverter for PathSegmentConverter {
    fn regex(&self) -> &'static str {
        ".+"
    }

    fn to_value(&self, raw: &str) -> Option<String> {
        decode(raw).filter(|v| !v.is_empty())
    }

    fn to_url(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        Some(utf8_percent_encode(value, PATH).to_string())
    }
}

/// Creates a boxed path converter for the given type name.
///
/// # Supported types
///
/// - `"int"` -> [`IntConverter`]
/// - `"str"` -> [`StrConverter`]
/// - `"slug"` -> [`SlugConverter`]
/// - `"uuid"` -> [`UuidConverter`]
/// - `"path"` -> [`PathSegmentConverter`]
///
/// # Errors
///
/// Returns [`RouterError::InvalidPattern`] if the type name is not recognized.
pub fn get_converter(type_name: &str) -> RouterResult<Box<dyn PathConverter>> {
    match type_name {
        "int" => Ok(Box::new(IntConverter)),
        "str" => Ok(Box::new(StrConverter)),
        "slug" => Ok(Box::new(SlugConverter)),
        "uuid" => Ok(Box::new(UuidConverter)),
        "path" => Ok(Box::new(PathSegmentConverter)),
        _ => Err(RouterError::InvalidPattern(format!(
            "Unknown path converter type: {type_name}"
        ))),
    }
}
