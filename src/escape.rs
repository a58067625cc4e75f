//! Escaping helpers for each URI context.
//!
//! Every function percent-encodes the characters that may not appear
//! unencoded in its context, using uppercase hexadecimal digits. A string
//! made only of allowed characters is returned unchanged.
//!
//! ```
//! use uri_builder::escape;
//!
//! assert_eq!(escape::escape_path_segment("a b/c"), "a%20b%2Fc");
//! assert_eq!(escape::escape_path("/a b/c")?, "/a%20b/c");
//! assert_eq!(escape::escape_query_param("x=1&y"), "x%3D1%26y");
//! assert_eq!(escape::unescape("a%20b%2Fc")?, "a b/c");
//! # Ok::<_, uri_builder::error::Error>(())
//! ```

use crate::{
    error::InvalidArgument,
    pct_enc::{self, encoder::*, DecodeError},
};
use alloc::string::String;

/// Escapes a userinfo subcomponent. `':'` is kept.
#[must_use]
pub fn escape_user_info(s: &str) -> String {
    pct_enc::encode::<Userinfo>(s).into_owned()
}

/// Escapes a registered name host.
#[must_use]
pub fn escape_host(s: &str) -> String {
    pct_enc::encode::<RegName>(s).into_owned()
}

/// Escapes a single path segment. `'/'` is escaped.
#[must_use]
pub fn escape_path_segment(s: &str) -> String {
    pct_enc::encode::<PathSegment>(s).into_owned()
}

/// Escapes a whole absolute path. `'/'` is kept.
///
/// # Errors
///
/// Returns `Err` if the path is empty or does not start with `'/'`.
pub fn escape_path(s: &str) -> Result<String, InvalidArgument> {
    if s.is_empty() {
        return Err(InvalidArgument::new("path cannot be empty"));
    }
    if !s.starts_with('/') {
        return Err(InvalidArgument::new("path must start with '/'"));
    }
    Ok(pct_enc::encode::<Path>(s).into_owned())
}

/// Escapes the name or the value of a query parameter.
///
/// `'&'`, `'='`, `'+'` and space are escaped.
#[must_use]
pub fn escape_query_param(s: &str) -> String {
    pct_enc::encode::<QueryParam>(s).into_owned()
}

/// Escapes a fragment component.
#[must_use]
pub fn escape_fragment(s: &str) -> String {
    pct_enc::encode::<Fragment>(s).into_owned()
}

/// Unescapes a string escaped in any context.
///
/// # Errors
///
/// Returns `Err` if a `'%'` is not followed by two hexadecimal digits,
/// or if the unescaped bytes are not valid UTF-8.
pub fn unescape(s: &str) -> Result<String, DecodeError> {
    pct_enc::decode(s).map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_path_preconditions() {
        assert_eq!(
            escape_path("").unwrap_err().message(),
            "path cannot be empty"
        );
        assert!(escape_path("rel/path").is_err());
        assert_eq!(escape_path("/").unwrap(), "/");
        assert_eq!(escape_path("/a%b").unwrap(), "/a%25b");
    }

    #[test]
    fn contexts_differ() {
        let s = "a/b?c#d e&f=g:h@i";
        assert_eq!(escape_user_info(s), "a%2Fb%3Fc%23d%20e&f=g:h%40i");
        assert_eq!(escape_host(s), "a%2Fb%3Fc%23d%20e&f=g%3Ah%40i");
        assert_eq!(escape_path_segment(s), "a%2Fb%3Fc%23d%20e&f=g:h@i");
        assert_eq!(escape_query_param(s), "a/b?c%23d%20e%26f%3Dg:h@i");
        assert_eq!(escape_fragment(s), "a/b?c%23d%20e&f=g:h@i");
    }
}
