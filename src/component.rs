//! URI components.

use crate::pct_enc::{self, encoder::RegName, table, DecodeError, EStr, Encoder};
use alloc::{borrow::ToOwned, string::String};
use core::{fmt, hash, marker::PhantomData, net::Ipv6Addr};
use ref_cast::{ref_cast_custom, RefCastCustom};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A [scheme] component.
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
///
/// # Comparison
///
/// `Scheme`s are compared case-insensitively. You should do a case-insensitive
/// comparison if the scheme specification allows both letter cases in the scheme name.
///
/// # Examples
///
/// ```
/// use uri_builder::{component::Scheme, Uri};
///
/// let scheme = Uri::parse("HTTP://EXAMPLE.COM/")?.scheme().unwrap();
///
/// // Case-insensitive comparison.
/// assert_eq!(scheme, Scheme::HTTP);
/// // Case-sensitive comparison.
/// assert_eq!(scheme.as_str(), "HTTP");
/// # Ok::<_, uri_builder::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Scheme {
    inner: str,
}

impl Scheme {
    #[ref_cast_custom]
    #[inline]
    pub(crate) const fn new_validated(scheme: &str) -> &Scheme;

    /// The `file` scheme.
    pub const FILE: &'static Scheme = Scheme::new_or_panic("file");

    /// The `ftp` scheme.
    pub const FTP: &'static Scheme = Scheme::new_or_panic("ftp");

    /// The `http` scheme.
    pub const HTTP: &'static Scheme = Scheme::new_or_panic("http");

    /// The `https` scheme.
    pub const HTTPS: &'static Scheme = Scheme::new_or_panic("https");

    /// The `sftp` scheme.
    pub const SFTP: &'static Scheme = Scheme::new_or_panic("sftp");

    /// Converts a string slice to `&Scheme`.
    ///
    /// # Panics
    ///
    /// Panics if the string is not a valid scheme name according to
    /// [Section 3.1 of RFC 3986][scheme]. For a non-panicking variant,
    /// use [`new`](Self::new).
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    #[inline]
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Scheme {
        match Self::new(s) {
            Some(scheme) => scheme,
            None => panic!("invalid scheme"),
        }
    }

    /// Converts a string slice to `&Scheme`, returning `None` if the conversion fails.
    #[inline]
    #[must_use]
    pub const fn new(s: &str) -> Option<&Scheme> {
        if matches!(s.as_bytes(), [first, rem @ ..]
        if first.is_ascii_alphabetic() && table::SCHEME.validate(rem))
        {
            Some(Scheme::new_validated(s))
        } else {
            None
        }
    }

    /// Returns the scheme component as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for Scheme {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_ignore_ascii_case(&other.inner)
    }
}

impl Eq for Scheme {}

impl hash::Hash for Scheme {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for x in self.inner.bytes() {
            state.write_u8(x.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Scheme {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for Scheme {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Scheme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A parsed [host] component.
///
/// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
///
/// # Examples
///
/// ```
/// use core::net::Ipv6Addr;
/// use uri_builder::{component::Host, Uri};
///
/// let uri = Uri::parse("ftp://[::1]:21/")?;
/// assert_eq!(uri.host(), Some("[::1]"));
/// assert!(matches!(uri.host_parsed(), Some(Host::Ipv6(addr)) if addr == Ipv6Addr::LOCALHOST));
///
/// let uri = Uri::parse("ftp://ex%41mple.com/")?;
/// let Some(Host::RegName(name)) = uri.host_parsed() else { unreachable!() };
/// assert_eq!(name.decode().to_string().unwrap(), "exAmple.com");
/// # Ok::<_, uri_builder::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Host<'a> {
    /// An IPv6 address, written in brackets in the URI.
    Ipv6(Ipv6Addr),
    /// A registered name, which may be empty.
    ///
    /// IPv4 addresses are registered names at this level.
    RegName(&'a EStr<RegName>),
}

/// A component value held in both its decoded and its raw (percent-encoded) form.
///
/// The two forms are always consistent: the raw form is the decoded form
/// encoded with `E`, or the decoded form is the raw form decoded.
/// A `Component` can only be created through a constructor that derives
/// one form from the other.
///
/// # Examples
///
/// ```
/// use uri_builder::{component::Component, pct_enc::encoder::Path};
///
/// let path = Component::<Path>::from_decoded("/my docs/a#b");
/// assert_eq!(path.raw(), "/my%20docs/a%23b");
///
/// let path = Component::<Path>::from_raw("/%E5%BC%A0")?;
/// assert_eq!(path.decoded(), "/张");
/// # Ok::<_, uri_builder::pct_enc::DecodeError>(())
/// ```
pub struct Component<E> {
    decoded: String,
    raw: String,
    encoder: PhantomData<E>,
}

impl<E: Encoder> Component<E> {
    /// Creates a component from its decoded form, encoding it with `E`.
    #[must_use]
    pub fn from_decoded(decoded: &str) -> Self {
        Self {
            raw: pct_enc::encode::<E>(decoded).into_owned(),
            decoded: decoded.to_owned(),
            encoder: PhantomData,
        }
    }

    /// Creates a component from its raw form, decoding it.
    ///
    /// The raw form is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the raw form contains a malformed escape sequence
    /// or does not decode to valid UTF-8.
    pub fn from_raw(raw: &str) -> Result<Self, DecodeError> {
        Ok(Self {
            decoded: pct_enc::decode(raw)?.into_owned(),
            raw: raw.to_owned(),
            encoder: PhantomData,
        })
    }
}

impl<E> Component<E> {
    pub(crate) fn from_parts(decoded: String, raw: String) -> Self {
        Self {
            decoded,
            raw,
            encoder: PhantomData,
        }
    }

    /// Returns the decoded form.
    #[must_use]
    pub fn decoded(&self) -> &str {
        &self.decoded
    }

    /// Returns the raw form.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl<E> Clone for Component<E> {
    fn clone(&self) -> Self {
        Self::from_parts(self.decoded.clone(), self.raw.clone())
    }
}

impl<E> PartialEq for Component<E> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.decoded == other.decoded
    }
}

impl<E> Eq for Component<E> {}

impl<E> fmt::Debug for Component<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("decoded", &self.decoded)
            .field("raw", &self.raw)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pct_enc::{encoder::*, DecodeErrorKind};

    #[test]
    fn scheme() {
        assert!(Scheme::new("").is_none());
        assert!(Scheme::new("1http").is_none());
        assert!(Scheme::new("ht tp").is_none());
        assert!(Scheme::new("svn+ssh").is_some());
        assert_eq!(Scheme::new("FILE").unwrap(), Scheme::FILE);
        assert_ne!(Scheme::HTTP, Scheme::HTTPS);
    }

    #[test]
    fn component_forms() {
        let c = Component::<Userinfo>::from_decoded("user:p@ss");
        assert_eq!(c.decoded(), "user:p@ss");
        assert_eq!(c.raw(), "user:p%40ss");

        let c = Component::<Fragment>::from_raw("a%20b%2fc").unwrap();
        assert_eq!(c.decoded(), "a b/c");
        assert_eq!(c.raw(), "a%20b%2fc");

        let e = Component::<Path>::from_raw("/%zz").unwrap_err();
        assert_eq!(e.kind(), DecodeErrorKind::MalformedEscapeSequence);
        assert_eq!(e.index(), 1);
    }
}
