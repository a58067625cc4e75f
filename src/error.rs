//! Error types.

pub use crate::parse::{ParseError, ParseErrorKind};

use crate::pct_enc::DecodeError;
use alloc::string::String;
use core::fmt;

/// An error occurred when a string could not be parsed into a URI, carrying the input.
///
/// Its message reads `illegal URI syntax: <input> (<cause>)`.
///
/// # Examples
///
/// ```
/// use uri_builder::{parse_uri, error::ParseErrorKind};
///
/// let e = parse_uri("file://").unwrap_err();
/// assert_eq!(e.input(), "file://");
/// assert_eq!(e.plain().kind(), ParseErrorKind::MissingAuthority);
/// assert_eq!(e.to_string(), "illegal URI syntax: file:// (expected authority at index 7)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    cause: ParseError,
    input: String,
}

impl SyntaxError {
    pub(crate) fn new(cause: ParseError, input: impl Into<String>) -> Self {
        Self {
            cause,
            input: input.into(),
        }
    }

    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Recovers the input that failed to parse.
    #[must_use]
    pub fn into_input(self) -> String {
        self.input
    }

    /// Returns the error with input erased.
    #[must_use]
    pub fn plain(&self) -> ParseError {
        self.cause
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal URI syntax: {} ({})", self.input, self.cause)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// An error occurred when an argument did not satisfy a precondition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidArgument(&'static str);

impl InvalidArgument {
    pub(crate) const fn new(msg: &'static str) -> Self {
        Self(msg)
    }

    /// Returns the violated precondition.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidArgument {}

/// An error occurred when mutating a value that cannot be mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnsupportedOperation(&'static str);

impl UnsupportedOperation {
    pub(crate) const fn new(msg: &'static str) -> Self {
        Self(msg)
    }

    /// Returns a description of the rejected operation.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported operation: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnsupportedOperation {}

/// Any error returned by this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Malformed URI text.
    Syntax(SyntaxError),
    /// Malformed percent-encoded text.
    Decode(DecodeError),
    /// Rejected precondition.
    InvalidArgument(InvalidArgument),
    /// Mutation of an immutable value.
    UnsupportedOperation(UnsupportedOperation),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => fmt::Display::fmt(e, f),
            Self::Decode(e) => fmt::Display::fmt(e, f),
            Self::InvalidArgument(e) => fmt::Display::fmt(e, f),
            Self::UnsupportedOperation(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(match self {
            Self::Syntax(e) => e,
            Self::Decode(e) => e,
            Self::InvalidArgument(e) => e,
            Self::UnsupportedOperation(e) => e,
        })
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<InvalidArgument> for Error {
    fn from(e: InvalidArgument) -> Self {
        Self::InvalidArgument(e)
    }
}

impl From<UnsupportedOperation> for Error {
    fn from(e: UnsupportedOperation) -> Self {
        Self::UnsupportedOperation(e)
    }
}
