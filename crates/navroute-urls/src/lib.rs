//! # navroute-urls
//!
//! Route patterns and resolution for navroute:
//!
//! - [`converters`]: Path type converters (`int`, `str`, `slug`, `uuid`, `path`)
//! - [`pattern`]: Spec compilation, forward matching, and reverse generation
//! - [`registry`]: The ordered, name-unique [`RouteTable`]
//! - [`resolver`]: Pathname classification into [`RouteData`]
//! - [`reverse`]: Pathname generation from a route name and params
//!
//! # Examples
//!
//! ```
//! use navroute_urls::{RouteDefinition, RouteParams, RouteTable};
//!
//! let table = RouteTable::register(vec![
//!     RouteDefinition::new("home", "/"),
//!     RouteDefinition::new("article", "/articles/<int:year>/:slug"),
//! ])
//! .unwrap();
//!
//! // Forward resolution
//! let data = table.resolve("/articles/2024/hello", &"unknown");
//! assert_eq!(data.name, "article");
//! assert_eq!(data.param("year"), Some("2024"));
//!
//! // Reverse resolution
//! let url = table.reverse(&data.name, &data.params).unwrap();
//! assert_eq!(url, "/articles/2024/hello");
//! ```

pub mod converters;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod reverse;

pub use pattern::RoutePattern;
pub use registry::{CompiledRoute, RouteDefinition, RouteTable};
pub use resolver::{RouteData, RouteName, RouteParams};
