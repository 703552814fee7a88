//! # navroute-core
//!
//! Core types shared by every navroute crate: the error enum, router settings
//! and their loaders, and tracing-based logging setup. This crate has no
//! routing logic of its own.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Router settings and route entries
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RouterError, RouterResult};
pub use settings::{RouteEntry, Settings};
