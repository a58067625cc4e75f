//! Conversions between file URIs and file system paths.
//!
//! ```
//! # #[cfg(unix)] {
//! use std::path::Path;
//! use uri_builder::file;
//!
//! let uri = file::from_file_path(Path::new("/tmp/my notes.txt"), true)?;
//! assert_eq!(uri, "file:///tmp/my%20notes.txt");
//! assert_eq!(file::to_file_path(&uri)?, Path::new("/tmp/my notes.txt"));
//! # }
//! # Ok::<_, uri_builder::error::Error>(())
//! ```

use crate::{
    component::Scheme,
    error::{Error, InvalidArgument, SyntaxError},
    escape, log, Uri,
};
use borrow_or_share::Bos;
use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
    string::String,
};

/// Converts a file URI string to a file system path.
///
/// Spaces in the string are percent-encoded before parsing, so that
/// paths written by hand with unescaped spaces are accepted.
///
/// # Errors
///
/// Returns `Err` if the string is empty or is not a valid URI reference,
/// or for the reasons listed in [`uri_to_file_path`].
pub fn to_file_path(text: &str) -> Result<PathBuf, Error> {
    if text.is_empty() {
        return Err(InvalidArgument::new("URI string cannot be empty").into());
    }
    let text = if text.contains(' ') {
        Cow::Owned(text.replace(' ', "%20"))
    } else {
        Cow::Borrowed(text)
    };
    let uri = Uri::parse(&*text).map_err(|e| SyntaxError::new(e, &*text))?;
    uri_to_file_path(&uri)
}

/// Converts a parsed file URI to a file system path.
///
/// The scheme, if any, must be `file` (compared case-insensitively).
/// The returned path is the decoded path component; the authority,
/// query and fragment are ignored.
///
/// # Errors
///
/// Returns `Err` if the path is empty, if the scheme is not `file`,
/// or if the path does not decode to valid UTF-8.
pub fn uri_to_file_path<T: Bos<str>>(uri: &Uri<T>) -> Result<PathBuf, Error> {
    let path = uri.path();
    if path.is_empty() {
        return Err(InvalidArgument::new("URI path cannot be empty").into());
    }
    if uri.scheme().is_some_and(|s| s != Scheme::FILE) {
        return Err(InvalidArgument::new("URI scheme must be file").into());
    }
    let decoded = path.decode().to_string()?;
    log::trace!("converted URI {:?} to file path {:?}", uri.as_str(), decoded);
    Ok(PathBuf::from(decoded.into_owned()))
}

/// Converts an absolute file system path to a URI string.
///
/// Every normal component of the path is escaped as a path segment and
/// preceded by `'/'`. The root path yields `"/"`. The string is prefixed
/// with `"file://"` if `include_scheme` is `true`.
///
/// # Errors
///
/// Returns `Err` if the path is empty, is not absolute, or has a component
/// that is not valid UTF-8.
pub fn from_file_path(path: &Path, include_scheme: bool) -> Result<String, InvalidArgument> {
    if path.as_os_str().is_empty() {
        return Err(InvalidArgument::new("file path cannot be empty"));
    }
    if !path.is_absolute() {
        return Err(InvalidArgument::new("file path must be absolute"));
    }

    let mut buf = String::new();
    if include_scheme {
        buf.push_str(Scheme::FILE.as_str());
        buf.push_str("://");
    }
    let start = buf.len();
    for comp in path.components() {
        if let Component::Normal(name) = comp {
            let name = name
                .to_str()
                .ok_or(InvalidArgument::new("file path must be valid UTF-8"))?;
            buf.push('/');
            buf.push_str(&escape::escape_path_segment(name));
        }
    }
    if buf.len() == start {
        buf.push('/');
    }
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn from_path() {
        assert_eq!(
            from_file_path(Path::new("/a/b c/d#e"), true).unwrap(),
            "file:///a/b%20c/d%23e"
        );
        assert_eq!(from_file_path(Path::new("/a//b/"), false).unwrap(), "/a/b");
        assert_eq!(from_file_path(Path::new("/"), true).unwrap(), "file:///");
        assert_eq!(
            from_file_path(Path::new(""), true).unwrap_err().message(),
            "file path cannot be empty"
        );
        assert_eq!(
            from_file_path(Path::new("rel/x"), true).unwrap_err().message(),
            "file path must be absolute"
        );
    }

    #[test]
    fn to_path() {
        assert_eq!(
            to_file_path("file:///a/b c.txt").unwrap(),
            Path::new("/a/b c.txt")
        );
        assert_eq!(
            to_file_path("FILE:///a/%E5%BC%A0").unwrap(),
            Path::new("/a/张")
        );
        assert_eq!(to_file_path("/no/scheme").unwrap(), Path::new("/no/scheme"));

        assert!(matches!(
            to_file_path("http://h/x"),
            Err(Error::InvalidArgument(e)) if e.message() == "URI scheme must be file"
        ));
        assert!(matches!(
            to_file_path("file:?q"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(to_file_path("file://"), Err(Error::Syntax(_))));
        assert!(matches!(to_file_path("/%FF"), Err(Error::Decode(_))));
    }
}
