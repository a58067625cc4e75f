//! Percent-encoders for URI components.
//!
//! Each encoder names the context a string is escaped for. A character is
//! kept as is if the encoder's table allows it, and percent-encoded otherwise.

use super::{table, Encoder, Table};

/// An encoder for the userinfo subcomponent.
#[derive(Clone, Copy, Debug)]
pub struct Userinfo(());

impl Encoder for Userinfo {
    const TABLE: Table = table::USERINFO;
}

/// An encoder for a registered name host.
#[derive(Clone, Copy, Debug)]
pub struct RegName(());

impl Encoder for RegName {
    const TABLE: Table = table::REG_NAME;
}

/// An encoder for the port subcomponent.
#[derive(Clone, Copy, Debug)]
pub struct Port(());

impl Encoder for Port {
    const TABLE: Table = table::PORT;
}

/// An encoder for the path component.
///
/// The slash (`'/'`) is preserved.
#[derive(Clone, Copy, Debug)]
pub struct Path(());

impl Encoder for Path {
    const TABLE: Table = table::PATH;
}

/// An encoder for a single path segment.
///
/// The slash (`'/'`) is percent-encoded.
#[derive(Clone, Copy, Debug)]
pub struct PathSegment(());

impl Encoder for PathSegment {
    const TABLE: Table = table::PATH_SEGMENT;
}

/// An encoder for the whole query component.
#[derive(Clone, Copy, Debug)]
pub struct Query(());

impl Encoder for Query {
    const TABLE: Table = table::QUERY;
}

/// An encoder for the name or the value of a query parameter.
///
/// The delimiters `'&'` and `'='` are percent-encoded, and so is `'+'`.
#[derive(Clone, Copy, Debug)]
pub struct QueryParam(());

impl Encoder for QueryParam {
    const TABLE: Table = table::QUERY_PARAM;
}

/// An encoder for the fragment component.
#[derive(Clone, Copy, Debug)]
pub struct Fragment(());

impl Encoder for Fragment {
    const TABLE: Table = table::FRAGMENT;
}
