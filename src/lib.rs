#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![cfg_attr(not(feature = "std"), no_std)]

//! A URI builder and parser with percent-encoding and query parameter handling,
//! following IETF [RFC 3986].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! The entry points are [`parse_uri`] and [`new_uri`], which both yield a
//! [`UriBuilder`]. A builder holds every component in decoded and raw
//! (percent-encoded) form, and keeps the query both as a raw string and as
//! a list of decoded [`QueryParameter`]s.
//!
//! ```
//! use uri_builder::{new_uri, parse_uri};
//!
//! let s = new_uri()
//!     .set_scheme("file")
//!     .set_path("/foo/bar.txt")
//!     .add_query_parameter("param1", "value1")
//!     .build_string();
//! assert_eq!(s, "file:///foo/bar.txt?param1=value1");
//!
//! let builder = parse_uri(&s)?;
//! assert_eq!(builder.path(), Some("/foo/bar.txt"));
//! assert_eq!(builder.first_query_parameter_value("param1"), Some("value1"));
//! assert_eq!(builder.build_string(), s);
//! # Ok::<_, uri_builder::SyntaxError>(())
//! ```
//!
//! Lower-level pieces are available on their own: [`Uri`] for validated URI
//! references with zero-copy accessors, [`escape`] and [`pct_enc`] for
//! percent-encoding, [`query`] for query strings, and [`multimap`] for the
//! multi-valued map the parameters are grouped in.
//!
//! # Feature flags
//!
//! All features except `std` are disabled by default.
//!
//! - `std`: Enables `std` support. This includes [`Error`] implementations
//!   and the [`file`] module.
//!
//! - `serde`: Enables [`serde`] support for [`Uri`], [`Scheme`]
//!   and [`QueryParameter`].
//!
//! - `log`: Emits trace and debug records through the [`log`] facade when
//!   URIs are parsed or built and when query strings are regenerated.
//!
//! [`Error`]: std::error::Error
//! [`serde`]: https://docs.rs/serde
//! [`log`]: https://docs.rs/log
//! [`Scheme`]: component::Scheme
//! [`QueryParameter`]: query::QueryParameter

extern crate alloc;

pub mod component;
pub mod entry;
pub mod error;
pub mod escape;
pub mod multimap;
pub mod pct_enc;
pub mod query;

#[cfg(feature = "std")]
pub mod file;

mod builder;
mod log;
mod parse;
mod uri;

pub use builder::{add_parameter_to_uri, AddParameterMode, UriBuilder};
pub use error::{Error, ParseError, SyntaxError};
pub use uri::Uri;

/// Parses a URI string into a [`UriBuilder`].
///
/// An empty host is treated as absent and the path is always present,
/// possibly empty.
///
/// # Errors
///
/// Returns `Err` if the string is blank or is not a valid URI reference,
/// or if a component does not decode to valid UTF-8.
///
/// # Examples
///
/// ```
/// use uri_builder::parse_uri;
///
/// let builder = parse_uri("file://?param1=value1")?;
/// assert_eq!(builder.host(), None);
/// assert_eq!(builder.path(), Some(""));
/// assert_eq!(builder.query_parameters().len(), 1);
///
/// assert!(parse_uri("  ").is_err());
/// # Ok::<_, uri_builder::SyntaxError>(())
/// ```
pub fn parse_uri(text: &str) -> Result<UriBuilder, SyntaxError> {
    UriBuilder::parse(text)
}

/// Creates an empty [`UriBuilder`].
#[must_use]
pub fn new_uri() -> UriBuilder {
    UriBuilder::new()
}
