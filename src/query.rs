//! Query parameters and the query string codec.
//!
//! A raw query string is a list of entries separated by [`ENTRY_DELIMITER`].
//! Each entry holds a parameter name, optionally followed by
//! [`KEY_VALUE_DELIMITER`] and a value. Names and values are escaped with
//! the [`QueryParam`] encoder, so `'&'`, `'='` and `'+'` inside them survive a
//! round trip.
//!
//! ```
//! use uri_builder::query::QueryParameters;
//!
//! let mut params = QueryParameters::parse(Some("a=1&b=2&a=3"))?;
//! assert_eq!(params.values("a"), Some(&["1".to_owned(), "3".to_owned()][..]));
//!
//! params.set("a", Some("x&y"));
//! assert_eq!(params.to_raw(), "b=2&a=x%26y");
//! # Ok::<_, uri_builder::pct_enc::DecodeError>(())
//! ```

use crate::{
    log,
    multimap::MultiMap,
    pct_enc::{self, encoder::QueryParam, DecodeError},
};
use alloc::{
    borrow::{Cow, ToOwned},
    string::String,
    vec::Vec,
};
use core::{fmt, hash, slice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separates the entries of a query string.
pub const ENTRY_DELIMITER: char = '&';

/// Separates the name of a query parameter from its value.
pub const KEY_VALUE_DELIMITER: char = '=';

/// A query parameter: a name and an optional value, both decoded.
///
/// A parameter parsed from a query string remembers its raw entry,
/// which is reused verbatim when the query string is regenerated.
/// Two parameters are equal if their names and values are equal.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueryParameter {
    name: String,
    value: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    raw: Option<String>,
}

impl QueryParameter {
    /// Creates a query parameter from its decoded name and value.
    #[must_use]
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            value: value.map(ToOwned::to_owned),
            raw: None,
        }
    }

    /// Parses a raw query string entry.
    fn from_raw_entry(entry: &str) -> Result<Self, DecodeError> {
        let (name, value) = match entry.split_once(KEY_VALUE_DELIMITER) {
            Some((name, value)) => (name, Some(value)),
            None => (entry, None),
        };
        Ok(Self {
            name: pct_enc::decode(name)?.into_owned(),
            value: value
                .map(|v| pct_enc::decode(v).map(Cow::into_owned))
                .transpose()?,
            raw: Some(entry.to_owned()),
        })
    }

    /// Returns the decoded name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the raw entry of this parameter in a query string.
    ///
    /// ```
    /// use uri_builder::query::QueryParameter;
    ///
    /// assert_eq!(QueryParameter::new("q", Some("a b&c")).to_raw(), "q=a%20b%26c");
    /// assert_eq!(QueryParameter::new("flag", None).to_raw(), "flag");
    /// ```
    #[must_use]
    pub fn to_raw(&self) -> Cow<'_, str> {
        if let Some(raw) = &self.raw {
            return Cow::Borrowed(raw);
        }
        let mut buf = String::new();
        self.write_raw(&mut buf);
        Cow::Owned(buf)
    }

    fn write_raw(&self, buf: &mut String) {
        if let Some(raw) = &self.raw {
            buf.push_str(raw);
            return;
        }
        pct_enc::encode_to::<QueryParam>(&self.name, buf);
        if let Some(value) = &self.value {
            buf.push(KEY_VALUE_DELIMITER);
            pct_enc::encode_to::<QueryParam>(value, buf);
        }
    }
}

impl PartialEq for QueryParameter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for QueryParameter {}

impl hash::Hash for QueryParameter {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Debug for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParameter")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// Query parameters, both in encounter order and grouped by name.
///
/// In the grouped view, a parameter without a value contributes an empty
/// string, so every name present has at least one value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    list: Vec<QueryParameter>,
    map: MultiMap<String, String>,
}

impl QueryParameters {
    /// Creates an empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw query string.
    ///
    /// Empty entries are skipped. An entry without `'='` yields a parameter
    /// without a value, and an entry starting with `'='` yields a parameter
    /// with an empty name. `None` or an empty string yield no parameter.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a name or a value fails to decode. The error index
    /// is relative to that name or value.
    pub fn parse(raw: Option<&str>) -> Result<Self, DecodeError> {
        let mut params = Self::new();
        let Some(raw) = raw else {
            return Ok(params);
        };
        for entry in raw.split(ENTRY_DELIMITER).filter(|e| !e.is_empty()) {
            params.push(QueryParameter::from_raw_entry(entry)?);
        }
        Ok(params)
    }

    fn push(&mut self, param: QueryParameter) {
        self.map.add(
            param.name.clone(),
            param.value.clone().unwrap_or_default(),
        );
        self.list.push(param);
    }

    /// Appends a parameter.
    pub fn add(&mut self, name: &str, value: Option<&str>) {
        self.push(QueryParameter::new(name, value));
    }

    /// Removes every parameter with the given name.
    ///
    /// Returns `true` if any parameter was removed.
    pub fn remove_all(&mut self, name: &str) -> bool {
        self.list.retain(|p| p.name != name);
        self.map.remove(name).is_some()
    }

    /// Replaces every parameter with the given name by a single one, appended at the end.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        self.remove_all(name);
        self.add(name, value);
    }

    /// Returns the first value of the given name.
    #[must_use]
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.map.get_first(name).map(String::as_str)
    }

    /// Returns every value of the given name, in encounter order.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.map.get(name)
    }

    /// Returns the parameters grouped by name.
    #[must_use]
    pub fn multimap(&self) -> &MultiMap<String, String> {
        &self.map
    }

    /// Returns the parameters in encounter order.
    #[must_use]
    pub fn as_slice(&self) -> &[QueryParameter] {
        &self.list
    }

    /// Returns an iterator over the parameters in encounter order.
    pub fn iter(&self) -> slice::Iter<'_, QueryParameter> {
        self.list.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Checks whether there is no parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Encodes the parameters into a raw query string.
    ///
    /// Entries are joined with `'&'`, with no trailing delimiter.
    /// No parameter yields an empty string.
    #[must_use]
    pub fn to_raw(&self) -> String {
        let mut buf = String::new();
        for (i, param) in self.list.iter().enumerate() {
            if i > 0 {
                buf.push(ENTRY_DELIMITER);
            }
            param.write_raw(&mut buf);
        }
        log::debug!("regenerated query string {:?}", buf);
        buf
    }
}

impl fmt::Debug for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.list.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a QueryParameters {
    type Item = &'a QueryParameter;
    type IntoIter = slice::Iter<'a, QueryParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pct_enc::DecodeErrorKind;
    use alloc::vec;

    fn pairs(params: &QueryParameters) -> Vec<(&str, Option<&str>)> {
        params.iter().map(|p| (p.name(), p.value())).collect()
    }

    #[test]
    fn parse_empty() {
        assert!(QueryParameters::parse(None).unwrap().is_empty());
        assert!(QueryParameters::parse(Some("")).unwrap().is_empty());
        assert!(QueryParameters::parse(Some("&&")).unwrap().is_empty());
        assert!(QueryParameters::parse(Some("")).unwrap().multimap().is_empty());
    }

    #[test]
    fn parse_keeps_order() {
        let params = QueryParameters::parse(Some("a=1&b=2&a=3")).unwrap();
        assert_eq!(
            pairs(&params),
            [("a", Some("1")), ("b", Some("2")), ("a", Some("3"))]
        );
        assert_eq!(params.values("a").unwrap(), ["1", "3"]);
        assert_eq!(params.values("b").unwrap(), ["2"]);
        assert_eq!(params.get_first("a"), Some("1"));
    }

    #[test]
    fn parse_edge_entries() {
        let params = QueryParameters::parse(Some("=v&flag&k=&a=b=c&&x%20y=%C3%A9")).unwrap();
        assert_eq!(
            pairs(&params),
            [
                ("", Some("v")),
                ("flag", None),
                ("k", Some("")),
                ("a", Some("b=c")),
                ("x y", Some("é")),
            ]
        );
        assert_eq!(params.values("flag").unwrap(), [""]);
        assert_eq!(params.get_first(""), Some("v"));
    }

    #[test]
    fn parse_errors() {
        let e = QueryParameters::parse(Some("a=1&b=%2")).unwrap_err();
        assert_eq!(e.kind(), DecodeErrorKind::MalformedEscapeSequence);
        let e = QueryParameters::parse(Some("a=%FF")).unwrap_err();
        assert_eq!(e.kind(), DecodeErrorKind::InvalidUtf8Sequence);
    }

    #[test]
    fn mutate() {
        let mut params = QueryParameters::parse(Some("k=v1&x=1&k=v2")).unwrap();
        params.set("k", Some("v3"));
        assert_eq!(pairs(&params), [("x", Some("1")), ("k", Some("v3"))]);
        assert_eq!(params.values("k").unwrap(), ["v3"]);

        assert!(params.remove_all("x"));
        assert!(!params.remove_all("x"));
        assert_eq!(params.len(), 1);
        assert!(params.values("x").is_none());

        params.add("k", None);
        assert_eq!(params.values("k").unwrap(), ["v3", ""]);
    }

    #[test]
    fn to_raw_reuses_parsed_entries() {
        let mut params = QueryParameters::parse(Some("a=%7e&&b=x+y")).unwrap();
        params.add("c d", Some("1+1=2"));
        assert_eq!(params.to_raw(), "a=%7e&b=x+y&c%20d=1%2B1%3D2");
    }

    #[test]
    fn to_raw_empty() {
        assert_eq!(QueryParameters::new().to_raw(), "");
        let mut params = QueryParameters::new();
        params.add("a", None);
        params.add("b", Some(""));
        assert_eq!(params.to_raw(), "a&b=");
    }

    #[test]
    fn equality_ignores_raw() {
        let parsed = QueryParameters::parse(Some("a=%41")).unwrap();
        let mut built = QueryParameters::new();
        built.add("a", Some("A"));
        assert_eq!(parsed, built);
        assert_eq!(parsed.as_slice(), vec![QueryParameter::new("a", Some("A"))]);
    }
}
