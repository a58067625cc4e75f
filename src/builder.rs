use crate::{
    component::{Component, Host},
    error::{ParseError, ParseErrorKind, SyntaxError},
    log,
    multimap::MultiMap,
    pct_enc::{
        encoder::{Fragment, Path, RegName, Userinfo},
        DecodeError,
    },
    query::{QueryParameter, QueryParameters},
    Uri,
};
use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
};
use borrow_or_share::Bos;
use core::{fmt::Write, net::Ipv6Addr};

/// A mutable builder for URIs.
///
/// For each of userinfo, host, path and fragment, the builder keeps a decoded
/// and a raw (percent-encoded) form. Setting either form derives the other,
/// and `None` clears both. The query is kept as a raw query string along with
/// the decoded [`QueryParameters`], regenerated on every parameter mutation.
///
/// Setters return `&mut Self` so that calls can be chained.
///
/// # Examples
///
/// ```
/// use uri_builder::new_uri;
///
/// let s = new_uri()
///     .set_scheme("https")
///     .set_host("example.com")
///     .set_path("/search results")
///     .add_query_parameter("q", "rust & uri")
///     .add_query_parameter("page", "2")
///     .set_fragment("top")
///     .build_string();
///
/// assert_eq!(s, "https://example.com/search%20results?q=rust%20%26%20uri&page=2#top");
/// ```
///
/// Parsing and modifying:
///
/// ```
/// use uri_builder::parse_uri;
///
/// let mut builder = parse_uri("http://example.com/?a=1&b=2&a=3")?;
/// assert_eq!(builder.query_parameter_values("a").unwrap(), ["1", "3"]);
///
/// builder.set_query_parameter("a", "4").remove_query_parameter("b");
/// assert_eq!(builder.build()?, "http://example.com/?a=4");
/// # Ok::<_, uri_builder::SyntaxError>(())
/// ```
///
/// # Output
///
/// [`build_string`] concatenates the raw components verbatim, in this order:
/// `scheme "://"`, `userinfo "@"`, host, `":" port`, path, `"?"` (if a query
/// or a fragment is set), query, `"#" fragment`. Note that `"://"` follows
/// any scheme, and that `"?"` precedes a fragment even without a query.
///
/// [`build_string`]: Self::build_string
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UriBuilder {
    scheme: Option<String>,
    userinfo: Option<Component<Userinfo>>,
    host: Option<Component<RegName>>,
    port: Option<u16>,
    path: Option<Component<Path>>,
    query: Option<String>,
    params: QueryParameters,
    fragment: Option<Component<Fragment>>,
}

/// How [`add_parameter_to_uri`] treats a parameter name that already has values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddParameterMode {
    /// Appends another parameter with the same name.
    Add,
    /// Replaces every existing value with the new one.
    Override,
    /// Keeps the existing values, leaving the URI untouched.
    KeepPreviousValue,
}

/// Adds a query parameter to a URI string and returns the resulting URI string.
///
/// # Errors
///
/// Returns `Err` if `uri` is not a valid URI reference.
///
/// # Examples
///
/// ```
/// use uri_builder::{add_parameter_to_uri, AddParameterMode};
///
/// let uri = "file:///data.csv?sep=%3B";
/// assert_eq!(
///     add_parameter_to_uri(uri, "sep", Some(","), AddParameterMode::Add)?,
///     "file:///data.csv?sep=%3B&sep=,"
/// );
/// assert_eq!(
///     add_parameter_to_uri(uri, "sep", Some(","), AddParameterMode::Override)?,
///     "file:///data.csv?sep=,"
/// );
/// assert_eq!(
///     add_parameter_to_uri(uri, "sep", Some(","), AddParameterMode::KeepPreviousValue)?,
///     "file:///data.csv?sep=%3B"
/// );
/// # Ok::<_, uri_builder::SyntaxError>(())
/// ```
pub fn add_parameter_to_uri(
    uri: &str,
    key: &str,
    value: Option<&str>,
    mode: AddParameterMode,
) -> Result<String, SyntaxError> {
    let mut builder = UriBuilder::parse(uri)?;
    match mode {
        AddParameterMode::Add => {
            builder.add_query_parameter(key, value);
        }
        AddParameterMode::Override => {
            builder.set_query_parameter(key, value);
        }
        AddParameterMode::KeepPreviousValue => {
            if builder.query_parameter_values(key).is_none() {
                builder.set_query_parameter(key, value);
            }
        }
    }
    Ok(builder.build_string())
}

// Byte offset of `part` within `base`, `part` being a subslice of `base`.
fn offset_in(base: &str, part: &str) -> usize {
    part.as_ptr() as usize - base.as_ptr() as usize
}

fn non_utf8_at(index: usize) -> impl FnOnce(DecodeError) -> ParseError {
    move |_| ParseError {
        index,
        kind: ParseErrorKind::NonUtf8Octets,
    }
}

fn host_from_decoded(host: &str) -> Component<RegName> {
    if host.parse::<Ipv6Addr>().is_ok() {
        let raw = ["[", host, "]"].concat();
        return Component::from_parts(host.to_owned(), raw);
    }
    Component::from_decoded(host)
}

fn host_from_raw(host: &str) -> Result<Component<RegName>, DecodeError> {
    if let Some(addr) = host.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return Ok(Component::from_parts(addr.to_owned(), host.to_owned()));
    }
    Component::from_raw(host)
}

impl UriBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URI string into a builder.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is blank or is not a valid URI reference,
    /// or if a component does not decode to valid UTF-8.
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        if text.trim().is_empty() {
            let e = ParseError {
                index: 0,
                kind: ParseErrorKind::EmptyInput,
            };
            return Err(SyntaxError::new(e, text));
        }
        let uri = Uri::parse(text).map_err(|e| SyntaxError::new(e, text))?;
        Self::digest(&uri).map_err(|e| SyntaxError::new(e, text))
    }

    /// Creates a builder from the components of a parsed URI.
    ///
    /// An empty host is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a component does not decode to valid UTF-8.
    pub fn from_uri<T: Bos<str>>(uri: &Uri<T>) -> Result<Self, SyntaxError> {
        Self::digest(uri).map_err(|e| SyntaxError::new(e, uri.as_str()))
    }

    fn digest<T: Bos<str>>(uri: &Uri<T>) -> Result<Self, ParseError> {
        let s = uri.as_str();

        let userinfo = uri
            .userinfo()
            .map(|u| {
                let u = u.as_str();
                Component::from_raw(u).map_err(non_utf8_at(offset_in(s, u)))
            })
            .transpose()?;

        let host = match uri.host_parsed() {
            Some(Host::Ipv6(addr)) => {
                let raw = uri.host().unwrap_or_default();
                let decoded = raw
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .map_or_else(|| addr.to_string(), ToOwned::to_owned);
                Some(Component::from_parts(decoded, raw.to_owned()))
            }
            Some(Host::RegName(name)) if !name.is_empty() => Some(
                Component::from_raw(name.as_str())
                    .map_err(non_utf8_at(offset_in(s, name.as_str())))?,
            ),
            _ => None,
        };

        let path = uri.path().as_str();
        let path = Component::from_raw(path).map_err(non_utf8_at(offset_in(s, path)))?;

        let query = uri.query().map(|q| q.as_str());
        let params = match query {
            Some(q) => QueryParameters::parse(Some(q)).map_err(non_utf8_at(offset_in(s, q)))?,
            None => QueryParameters::new(),
        };

        let fragment = uri
            .fragment()
            .map(|f| {
                let f = f.as_str();
                Component::from_raw(f).map_err(non_utf8_at(offset_in(s, f)))
            })
            .transpose()?;

        log::trace!("digested URI {:?}", s);
        Ok(Self {
            scheme: uri.scheme().map(|s| s.as_str().to_owned()),
            userinfo,
            host,
            port: uri.port(),
            path: Some(path),
            query: query.map(ToOwned::to_owned),
            params,
            fragment,
        })
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Sets the scheme.
    ///
    /// The scheme is not validated until [`build`](Self::build).
    pub fn set_scheme<'a>(&mut self, scheme: impl Into<Option<&'a str>>) -> &mut Self {
        self.scheme = scheme.into().map(ToOwned::to_owned);
        self
    }

    /// Returns the decoded userinfo.
    #[must_use]
    pub fn user_info(&self) -> Option<&str> {
        self.userinfo.as_ref().map(Component::decoded)
    }

    /// Sets the decoded userinfo.
    pub fn set_user_info<'a>(&mut self, userinfo: impl Into<Option<&'a str>>) -> &mut Self {
        self.userinfo = userinfo.into().map(Component::from_decoded);
        self
    }

    /// Returns the raw userinfo.
    #[must_use]
    pub fn raw_user_info(&self) -> Option<&str> {
        self.userinfo.as_ref().map(Component::raw)
    }

    /// Sets the raw userinfo.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the userinfo fails to decode, leaving the builder unchanged.
    pub fn set_raw_user_info<'a>(
        &mut self,
        userinfo: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, DecodeError> {
        self.userinfo = userinfo.into().map(Component::from_raw).transpose()?;
        Ok(self)
    }

    /// Returns the decoded host.
    ///
    /// An IPv6 address is returned without brackets.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_ref().map(Component::decoded)
    }

    /// Sets the decoded host.
    ///
    /// A host that is an IPv6 address is enclosed in brackets in its raw form.
    ///
    /// ```
    /// use uri_builder::new_uri;
    ///
    /// let mut builder = new_uri();
    /// builder.set_host("::1");
    /// assert_eq!(builder.raw_host(), Some("[::1]"));
    /// builder.set_host("my host");
    /// assert_eq!(builder.raw_host(), Some("my%20host"));
    /// ```
    pub fn set_host<'a>(&mut self, host: impl Into<Option<&'a str>>) -> &mut Self {
        self.host = host.into().map(host_from_decoded);
        self
    }

    /// Returns the raw host.
    #[must_use]
    pub fn raw_host(&self) -> Option<&str> {
        self.host.as_ref().map(Component::raw)
    }

    /// Sets the raw host.
    ///
    /// A host enclosed in brackets is taken as an IP literal and not decoded.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host fails to decode, leaving the builder unchanged.
    pub fn set_raw_host<'a>(
        &mut self,
        host: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, DecodeError> {
        self.host = host.into().map(host_from_raw).transpose()?;
        Ok(self)
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Sets the port.
    pub fn set_port(&mut self, port: impl Into<Option<u16>>) -> &mut Self {
        self.port = port.into();
        self
    }

    /// Returns the decoded path.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_ref().map(Component::decoded)
    }

    /// Sets the decoded path. `'/'` is kept as the segment separator.
    pub fn set_path<'a>(&mut self, path: impl Into<Option<&'a str>>) -> &mut Self {
        self.path = path.into().map(Component::from_decoded);
        self
    }

    /// Returns the raw path.
    #[must_use]
    pub fn raw_path(&self) -> Option<&str> {
        self.path.as_ref().map(Component::raw)
    }

    /// Sets the raw path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the path fails to decode, leaving the builder unchanged.
    pub fn set_raw_path<'a>(
        &mut self,
        path: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, DecodeError> {
        self.path = path.into().map(Component::from_raw).transpose()?;
        Ok(self)
    }

    /// Returns the raw query string.
    #[must_use]
    pub fn raw_query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Sets the raw query string, replacing every query parameter.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a parameter fails to decode, leaving the builder unchanged.
    pub fn set_raw_query_string<'a>(
        &mut self,
        query: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, DecodeError> {
        let query = query.into();
        self.params = QueryParameters::parse(query)?;
        self.query = query.map(ToOwned::to_owned);
        Ok(self)
    }

    /// Returns the query parameters in encounter order.
    #[must_use]
    pub fn query_parameters(&self) -> &[QueryParameter] {
        self.params.as_slice()
    }

    /// Returns the query parameters grouped by name.
    ///
    /// A parameter without a value is grouped as an empty string.
    #[must_use]
    pub fn query_parameters_multimap(&self) -> &MultiMap<String, String> {
        self.params.multimap()
    }

    /// Returns every value of a query parameter, in encounter order.
    #[must_use]
    pub fn query_parameter_values(&self, name: &str) -> Option<&[String]> {
        self.params.values(name)
    }

    /// Returns the first value of a query parameter.
    #[must_use]
    pub fn first_query_parameter_value(&self, name: &str) -> Option<&str> {
        self.params.get_first(name)
    }

    /// Appends a query parameter given its decoded name and value.
    pub fn add_query_parameter<'a>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'a str>>,
    ) -> &mut Self {
        self.params.add(name, value.into());
        self.regenerate_query();
        self
    }

    /// Removes every query parameter with the given name.
    pub fn remove_query_parameter(&mut self, name: &str) -> &mut Self {
        self.params.remove_all(name);
        self.regenerate_query();
        self
    }

    /// Replaces every query parameter with the given name by a single one,
    /// appended after the other parameters.
    pub fn set_query_parameter<'a>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'a str>>,
    ) -> &mut Self {
        self.params.set(name, value.into());
        self.regenerate_query();
        self
    }

    fn regenerate_query(&mut self) {
        self.query = (!self.params.is_empty()).then(|| self.params.to_raw());
    }

    /// Returns the decoded fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_ref().map(Component::decoded)
    }

    /// Sets the decoded fragment.
    pub fn set_fragment<'a>(&mut self, fragment: impl Into<Option<&'a str>>) -> &mut Self {
        self.fragment = fragment.into().map(Component::from_decoded);
        self
    }

    /// Returns the raw fragment.
    #[must_use]
    pub fn raw_fragment(&self) -> Option<&str> {
        self.fragment.as_ref().map(Component::raw)
    }

    /// Sets the raw fragment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the fragment fails to decode, leaving the builder unchanged.
    pub fn set_raw_fragment<'a>(
        &mut self,
        fragment: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, DecodeError> {
        self.fragment = fragment.into().map(Component::from_raw).transpose()?;
        Ok(self)
    }

    /// Assembles the URI string from the raw components.
    ///
    /// This method never fails, but its output is not guaranteed to be a
    /// valid URI, for example with an invalid scheme. Use [`build`](Self::build)
    /// to check it.
    #[must_use]
    pub fn build_string(&self) -> String {
        let mut buf = String::new();
        if let Some(scheme) = &self.scheme {
            buf.push_str(scheme);
            buf.push_str("://");
        }
        if let Some(userinfo) = &self.userinfo {
            buf.push_str(userinfo.raw());
            buf.push('@');
        }
        if let Some(host) = &self.host {
            buf.push_str(host.raw());
        }
        if let Some(port) = self.port {
            // Writing to a `String` never fails.
            let _ = write!(buf, ":{port}");
        }
        if let Some(path) = &self.path {
            buf.push_str(path.raw());
        }
        if self.query.is_some() || self.fragment.is_some() {
            buf.push('?');
        }
        if let Some(query) = &self.query {
            buf.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            buf.push('#');
            buf.push_str(fragment.raw());
        }
        buf
    }

    /// Assembles the URI string and parses it into a [`Uri`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the assembled string is not a valid URI reference.
    pub fn build(&self) -> Result<Uri<String>, SyntaxError> {
        let s = self.build_string();
        log::trace!("built URI {:?}", s);
        Uri::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builds_empty() {
        assert_eq!(UriBuilder::new().build_string(), "");
        assert_eq!(UriBuilder::new().build().unwrap(), "");
    }

    #[test]
    fn setters_sync_forms() {
        let mut b = UriBuilder::new();
        b.set_user_info("a b:c").set_path("/x y").set_fragment("f g");
        assert_eq!(b.raw_user_info(), Some("a%20b:c"));
        assert_eq!(b.raw_path(), Some("/x%20y"));
        assert_eq!(b.raw_fragment(), Some("f%20g"));

        b.set_raw_path("/%41%2F").unwrap();
        assert_eq!(b.path(), Some("/A/"));
        assert_eq!(b.raw_path(), Some("/%41%2F"));

        b.set_path(None);
        assert_eq!(b.path(), None);
        assert_eq!(b.raw_path(), None);
    }

    #[test]
    fn raw_setter_error_keeps_state() {
        let mut b = UriBuilder::new();
        b.set_fragment("keep");
        assert!(b.set_raw_fragment("%zz").is_err());
        assert_eq!(b.fragment(), Some("keep"));

        b.set_raw_query_string("a=1").unwrap();
        assert!(b.set_raw_query_string("b=%FF").is_err());
        assert_eq!(b.raw_query_string(), Some("a=1"));
        assert_eq!(b.first_query_parameter_value("a"), Some("1"));
    }

    #[test]
    fn ipv6_host() {
        let mut b = UriBuilder::new();
        b.set_raw_host("[fe80::1]").unwrap();
        assert_eq!(b.host(), Some("fe80::1"));

        let b = UriBuilder::parse("http://[::1]:8080/").unwrap();
        assert_eq!(b.host(), Some("::1"));
        assert_eq!(b.raw_host(), Some("[::1]"));
        assert_eq!(b.port(), Some(8080));
        assert_eq!(b.build_string(), "http://[::1]:8080/");
    }

    #[test]
    fn non_utf8_component() {
        let e = UriBuilder::parse("http://h/ok?a=%FF").unwrap_err();
        assert_eq!(e.plain().kind(), ParseErrorKind::NonUtf8Octets);
        assert_eq!(e.plain().index(), 12);

        let e = UriBuilder::parse("http://h/%C3").unwrap_err();
        assert_eq!(e.plain().index(), 8);
    }

    #[test]
    fn fragment_only() {
        let mut b = UriBuilder::new();
        b.set_path("/p").set_fragment("f");
        assert_eq!(b.build_string(), "/p?#f");
    }
}
