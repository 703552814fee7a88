//! Core error types for navroute.
//!
//! This module provides the single error enum [`RouterError`] used by every
//! navroute crate. Errors fall into two categories:
//!
//! - **Configuration** errors are raised while a router is being set up
//!   (duplicate route names, malformed patterns, unreadable settings). They
//!   abort construction and must be fixed in the route configuration.
//! - **Navigation** errors are returned by navigation calls (`go_to`,
//!   `back_to`, `reverse`). They leave the current route untouched and are
//!   expected to be handled by the caller.
//!
//! A pathname that matches no route is not an error: it resolves to the
//! configured unknown route.

use thiserror::Error;

/// The primary error type for navroute.
///
/// Use [`RouterError::is_configuration`] to tell setup failures apart from
/// recoverable navigation failures.
#[derive(Error, Debug)]
pub enum RouterError {
    // ── Configuration ────────────────────────────────────────────────

    /// Two route definitions share the same name.
    #[error(
        "Routes must be unique, route {name} with spec \"{existing_spec}\" cannot be redefined with another spec \"{new_spec}\""
    )]
    DuplicateRouteName {
        /// Debug rendering of the duplicated route name.
        name: String,
        /// The spec registered first under this name.
        existing_spec: String,
        /// The spec that tried to reuse the name.
        new_spec: String,
    },

    /// A route spec could not be compiled.
    #[error("Invalid route pattern: {0}")]
    InvalidPattern(String),

    /// A settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred while reading configuration.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ── Navigation ───────────────────────────────────────────────────

    /// The params given for a route do not satisfy its spec.
    #[error("Params don't fit to route definition {name} (spec \"{spec}\")")]
    ParamsMismatch {
        /// Debug rendering of the target route name.
        name: String,
        /// The spec the params were checked against.
        spec: String,
    },

    /// No route is registered under the requested name.
    #[error("Definition {0} doesn't fit any previously configured")]
    UnknownRouteName(String),

    /// The location source cannot go back any further.
    #[error("History exhausted: no earlier entry to go back to")]
    HistoryExhausted,

    /// A backward navigation gave up after the configured number of steps.
    #[error("Back navigation stopped after {0} steps without a match")]
    BackStepLimit(usize),

    /// A pending navigation was cancelled by its caller.
    #[error("Navigation cancelled")]
    Cancelled,

    /// The location source stopped delivering change events.
    #[error("Location source closed")]
    LocationSourceClosed,
}

impl RouterError {
    /// Returns `true` for errors raised while configuring a router.
    ///
    /// Configuration errors are fatal for the router being built; every other
    /// variant is a navigation error that leaves the router usable.
    pub const fn is_configuration(&self) -> bool {
        match self {
            Self::DuplicateRouteName { .. }
            | Self::InvalidPattern(_)
            | Self::ConfigurationError(_)
            | Self::IoError(_) => true,
            Self::ParamsMismatch { .. }
            | Self::UnknownRouteName(_)
            | Self::HistoryExhausted
            | Self::BackStepLimit(_)
            | Self::Cancelled
            | Self::LocationSourceClosed => false,
        }
    }

    /// Returns `true` for errors returned by navigation calls.
    pub const fn is_navigation(&self) -> bool {
        !self.is_configuration()
    }
}

/// A convenience type alias for `Result<T, RouterError>`.
pub type RouterResult<T> = Result<T, RouterError>;
