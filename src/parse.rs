use crate::{
    error::SyntaxError,
    pct_enc::{
        self,
        table::{self, Table},
    },
};
use alloc::string::String;
use core::{
    fmt,
    net::Ipv6Addr,
    num::NonZeroUsize,
    ops::{Deref, DerefMut},
    str,
};

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete.
    ///
    /// The error index points to the percent character "%" of the octet.
    InvalidOctet,
    /// Unexpected character or end of input that is not allowed by the URI syntax.
    ///
    /// The error index points to the character, or equals the input length.
    UnexpectedCharOrEnd,
    /// Invalid IPv6 literal address.
    ///
    /// The error index points to the preceding left square bracket "[".
    InvalidIpv6Addr,
    /// Port number out of range of `u16`.
    ///
    /// The error index points to the first digit of the port.
    InvalidPort,
    /// A `"//"` that introduces no authority, no path, no query and no fragment.
    ///
    /// The error index equals the input length.
    MissingAuthority,
    /// Blank input.
    ///
    /// The error index is zero.
    EmptyInput,
    /// Percent-encoded octets that do not decode to valid UTF-8.
    ///
    /// The error index points to the start of the component holding the octets.
    NonUtf8Octets,
}

/// An error occurred when parsing a URI reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the index where the error occurred in the input string.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::InvalidOctet => "invalid percent-encoded octet at index ",
            ParseErrorKind::UnexpectedCharOrEnd => "unexpected character or end of input at index ",
            ParseErrorKind::InvalidIpv6Addr => "invalid IPv6 address at index ",
            ParseErrorKind::InvalidPort => "invalid port at index ",
            ParseErrorKind::MissingAuthority => "expected authority at index ",
            ParseErrorKind::EmptyInput => "empty input at index ",
            ParseErrorKind::NonUtf8Octets => "percent-encoded octets not valid UTF-8 at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

/// Component bounds of a parsed URI reference.
#[derive(Clone, Copy, Debug, Default)]
pub struct Meta {
    // The index of the trailing colon.
    pub scheme_end: Option<NonZeroUsize>,
    pub auth_meta: Option<AuthMeta>,
    pub path_bounds: (usize, usize),
    // One byte past the last byte of query.
    pub query_end: Option<NonZeroUsize>,
}

impl Meta {
    #[inline]
    pub fn query_or_path_end(&self) -> usize {
        self.query_end.map_or(self.path_bounds.1, |i| i.get())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AuthMeta {
    // Brackets included for an IPv6 literal.
    pub host_bounds: (usize, usize),
    pub host_meta: HostMeta,
    pub port: Option<u16>,
}

#[derive(Clone, Copy, Debug)]
pub enum HostMeta {
    Ipv6(Ipv6Addr),
    RegName,
}

/// Inputs accepted by [`Uri::parse`](crate::Uri::parse).
pub trait Parse: Sized {
    type Val;
    type Err;

    fn parse(self) -> core::result::Result<(Self::Val, Meta), Self::Err>;
}

impl<'a> Parse for &'a str {
    type Val = &'a str;
    type Err = ParseError;

    fn parse(self) -> Result<(&'a str, Meta)> {
        parse(self.as_bytes()).map(|meta| (self, meta))
    }
}

impl Parse for String {
    type Val = String;
    type Err = SyntaxError;

    fn parse(self) -> core::result::Result<(String, Meta), SyntaxError> {
        match parse(self.as_bytes()) {
            Ok(meta) => Ok((self, meta)),
            Err(e) => Err(SyntaxError::new(e, self)),
        }
    }
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Meta> {
    let mut parser = Parser {
        reader: Reader::new(bytes),
        out: Meta::default(),
    };
    parser.parse_from_scheme()?;
    Ok(parser.out)
}

/// URI reference parser.
///
/// # Invariants
///
/// `pos <= len`, `pos` is non-decreasing and on the boundary of a UTF-8 code point.
///
/// # Preconditions and guarantees
///
/// Before parsing, ensure that `pos == 0`, `out` is default initialized
/// and `bytes` is valid UTF-8.
///
/// Start and finish parsing by calling `parse_from_scheme`.
/// The following are guaranteed when parsing succeeds:
///
/// - All output indexes are within bounds, correctly ordered
///   and on the boundary of a UTF-8 code point.
/// - All components defined by output indexes are validated.
struct Parser<'a> {
    reader: Reader<'a>,
    out: Meta,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Deref for Parser<'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl DerefMut for Parser<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

enum PathKind {
    General,
    AbEmpty,
    ContinuedNoScheme,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    // Any call to this method must keep the invariants.
    fn skip(&mut self, n: usize) {
        // INVARIANT: `pos` is non-decreasing.
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    // Returns `true` iff any byte is read.
    fn read(&mut self, table: Table) -> Result<bool> {
        let start = self.pos;
        self.read_with(table, |_, _| {})?;
        Ok(self.pos > start)
    }

    fn read_with(&mut self, table: Table, mut f: impl FnMut(usize, u8)) -> Result<()> {
        let mut i = self.pos;
        let allow_pct_encoded = table.allows_pct_encoded();

        while i < self.len() {
            let x = self.bytes[i];
            if allow_pct_encoded && x == b'%' {
                let [hi, lo, ..] = self.bytes[i + 1..] else {
                    err!(i, InvalidOctet);
                };
                if !pct_enc::is_hexdig_pair(hi, lo) {
                    err!(i, InvalidOctet);
                }
                i += 3;
            } else {
                // Non-ASCII bytes are never allowed, so `i` stays on a code point boundary.
                if !table.allows_ascii(x) {
                    break;
                }
                f(i, x);
                i += 1;
            }
        }

        // INVARIANT: `i` is non-decreasing.
        self.pos = i;
        Ok(())
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            // INVARIANT: The remaining bytes start with `s` so it's fine to skip `s.len()`.
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    fn count_digits(&self) -> usize {
        self.bytes[self.pos..]
            .iter()
            .take_while(|x| x.is_ascii_digit())
            .count()
    }

    // Reads an optional port after the host.
    fn read_port(&mut self) -> Result<Option<u16>> {
        if !self.read_str(":") {
            return Ok(None);
        }
        let start = self.pos;
        let len = self.count_digits();
        // INVARIANT: Skipping `len` digits is fine.
        self.skip(len);
        parse_port(self.bytes, start, self.pos)
    }

    fn read_ip_literal(&mut self) -> Result<Option<HostMeta>> {
        let bracket_i = self.pos;
        if !self.read_str("[") {
            return Ok(None);
        }

        let Some(len) = self.bytes[self.pos..].iter().position(|&x| x == b']') else {
            err!(bracket_i, InvalidIpv6Addr);
        };
        let addr = str::from_utf8(&self.bytes[self.pos..self.pos + len])
            .ok()
            .and_then(|s| s.parse::<Ipv6Addr>().ok());
        let Some(addr) = addr else {
            err!(bracket_i, InvalidIpv6Addr);
        };

        // INVARIANT: Skipping the address and "]" is fine.
        self.skip(len + 1);
        Ok(Some(HostMeta::Ipv6(addr)))
    }
}

// Parses the digits in `bytes[start..end]`, an empty port being absent.
fn parse_port(bytes: &[u8], start: usize, end: usize) -> Result<Option<u16>> {
    if start == end {
        return Ok(None);
    }
    let mut port: u32 = 0;
    for &x in &bytes[start..end] {
        port = port * 10 + (x - b'0') as u32;
        if port > u16::MAX as u32 {
            err!(start, InvalidPort);
        }
    }
    Ok(Some(port as u16))
}

impl Parser<'_> {
    fn read_host(&mut self) -> Result<HostMeta> {
        match self.read_ip_literal()? {
            Some(host) => Ok(host),
            None => {
                self.read(table::REG_NAME)?;
                Ok(HostMeta::RegName)
            }
        }
    }

    fn parse_from_scheme(&mut self) -> Result<()> {
        self.read(table::SCHEME)?;

        if self.peek(0) == Some(b':') {
            // Scheme starts with a letter.
            if self.pos > 0 && self.bytes[0].is_ascii_alphabetic() {
                self.out.scheme_end = NonZeroUsize::new(self.pos);
            } else {
                err!(0, UnexpectedCharOrEnd);
            }

            // INVARIANT: Skipping ":" is fine.
            self.skip(1);
            return if self.read_str("//") {
                self.parse_from_authority()
            } else {
                self.parse_from_path(PathKind::General)
            };
        } else if self.pos == 0 {
            // Nothing read.
            if self.read_str("//") {
                return self.parse_from_authority();
            }
        }
        // Scheme chars are valid for path.
        self.parse_from_path(PathKind::ContinuedNoScheme)
    }

    fn parse_from_authority(&mut self) -> Result<()> {
        if !self.has_remaining() {
            err!(self.pos, MissingAuthority);
        }

        let host_bounds;
        let host_meta;
        let port;

        let mut colon_cnt = 0;
        let mut colon_i = 0;

        let auth_start = self.pos;

        // `USERINFO` contains userinfo, registered name, ':', and port.
        self.read_with(table::USERINFO, |i, x| {
            if x == b':' {
                colon_cnt += 1;
                colon_i = i;
            }
        })?;

        if self.peek(0) == Some(b'@') {
            // Userinfo present.
            // INVARIANT: Skipping "@" is fine.
            self.skip(1);

            let host_start = self.pos;
            host_meta = self.read_host()?;
            host_bounds = (host_start, self.pos);
            port = self.read_port()?;
        } else if self.pos == auth_start {
            // Nothing read. We're now at the start of an IP literal or the path.
            if let Some(meta) = self.read_ip_literal()? {
                host_meta = meta;
                host_bounds = (auth_start, self.pos);
                port = self.read_port()?;
            } else {
                // Empty authority.
                host_meta = HostMeta::RegName;
                host_bounds = (self.pos, self.pos);
                port = None;
            }
        } else {
            // The whole authority read. Try to parse the host and port.
            let host_end = match colon_cnt {
                // All host.
                0 => {
                    port = None;
                    self.pos
                }
                // Host and port.
                1 => {
                    for i in colon_i + 1..self.pos {
                        if !self.bytes[i].is_ascii_digit() {
                            err!(i, UnexpectedCharOrEnd);
                        }
                    }
                    port = parse_port(self.bytes, colon_i + 1, self.pos)?;
                    colon_i
                }
                // Multiple colons.
                _ => err!(colon_i, UnexpectedCharOrEnd),
            };

            host_meta = HostMeta::RegName;
            host_bounds = (auth_start, host_end);
        }

        self.out.auth_meta = Some(AuthMeta {
            host_bounds,
            host_meta,
            port,
        });
        self.parse_from_path(PathKind::AbEmpty)
    }

    fn parse_from_path(&mut self, kind: PathKind) -> Result<()> {
        self.out.path_bounds = match kind {
            PathKind::General => {
                let start = self.pos;
                self.read(table::PATH)?;
                (start, self.pos)
            }
            PathKind::AbEmpty => {
                let start = self.pos;
                // Either empty or starting with '/'.
                if self.read(table::PATH)? && self.bytes[start] != b'/' {
                    err!(start, UnexpectedCharOrEnd);
                }
                (start, self.pos)
            }
            PathKind::ContinuedNoScheme => {
                self.read(table::SEGMENT_NZ_NC)?;

                if self.peek(0) == Some(b':') {
                    // In a relative reference, the first path
                    // segment cannot contain a colon character.
                    err!(self.pos, UnexpectedCharOrEnd);
                }

                self.read(table::PATH)?;
                (0, self.pos)
            }
        };

        if self.read_str("?") {
            self.read(table::QUERY)?;
            self.out.query_end = NonZeroUsize::new(self.pos);
        }

        if self.read_str("#") {
            self.read(table::FRAGMENT)?;
        }

        if self.has_remaining() {
            err!(self.pos, UnexpectedCharOrEnd);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(s: &str) -> (usize, ParseErrorKind) {
        let e = parse(s.as_bytes()).unwrap_err();
        (e.index(), e.kind())
    }

    #[test]
    fn bounds() {
        let s = "http://user@example.com:8080/a/b?q=1#frag";
        let meta = parse(s.as_bytes()).unwrap();
        assert_eq!(meta.scheme_end.map(|i| i.get()), Some(4));
        let auth = meta.auth_meta.unwrap();
        assert_eq!(&s[auth.host_bounds.0..auth.host_bounds.1], "example.com");
        assert_eq!(auth.port, Some(8080));
        assert_eq!(&s[meta.path_bounds.0..meta.path_bounds.1], "/a/b");
        assert_eq!(meta.query_end.map(|i| i.get()), Some(s.find('#').unwrap()));
    }

    #[test]
    fn ipv6_host() {
        let s = "http://[::1]:80/";
        let auth = parse(s.as_bytes()).unwrap().auth_meta.unwrap();
        assert_eq!(&s[auth.host_bounds.0..auth.host_bounds.1], "[::1]");
        assert!(matches!(auth.host_meta, HostMeta::Ipv6(addr) if addr == Ipv6Addr::LOCALHOST));

        assert_eq!(parse_err("http://[::1/"), (7, ParseErrorKind::InvalidIpv6Addr));
        assert_eq!(parse_err("http://[1:2]/"), (7, ParseErrorKind::InvalidIpv6Addr));
        assert_eq!(parse_err("http://u@[::g]/"), (9, ParseErrorKind::InvalidIpv6Addr));
    }

    #[test]
    fn empty_authority() {
        let meta = parse(b"file://?param1=value1").unwrap();
        let auth = meta.auth_meta.unwrap();
        assert_eq!(auth.host_bounds, (7, 7));
        assert_eq!(meta.path_bounds, (7, 7));

        assert!(parse(b"file:///").is_ok());
        assert!(parse(b"file://#f").is_ok());
        assert_eq!(parse_err("file://"), (7, ParseErrorKind::MissingAuthority));
        assert_eq!(parse_err("//"), (2, ParseErrorKind::MissingAuthority));
    }

    #[test]
    fn port() {
        let auth = parse(b"http://h:/").unwrap().auth_meta.unwrap();
        assert_eq!(auth.port, None);
        let auth = parse(b"http://u@h:65535").unwrap().auth_meta.unwrap();
        assert_eq!(auth.port, Some(65535));

        assert_eq!(parse_err("http://h:65536/"), (9, ParseErrorKind::InvalidPort));
        assert_eq!(parse_err("http://u@h:99999"), (11, ParseErrorKind::InvalidPort));
        assert_eq!(parse_err("http://h:8a/"), (10, ParseErrorKind::UnexpectedCharOrEnd));
        assert_eq!(parse_err("http://h:1:2/"), (10, ParseErrorKind::UnexpectedCharOrEnd));
    }

    #[test]
    fn invalid() {
        assert_eq!(parse_err("1http://h"), (0, ParseErrorKind::UnexpectedCharOrEnd));
        assert_eq!(parse_err("a b"), (1, ParseErrorKind::UnexpectedCharOrEnd));
        assert_eq!(parse_err("/p%2"), (2, ParseErrorKind::InvalidOctet));
        assert_eq!(parse_err("/p?q#f#"), (6, ParseErrorKind::UnexpectedCharOrEnd));
        assert_eq!(parse_err("a:b/c:d:e%"), (9, ParseErrorKind::InvalidOctet));
        assert_eq!(parse_err(":x"), (0, ParseErrorKind::UnexpectedCharOrEnd));
        assert_eq!(parse_err("a/b:c d"), (5, ParseErrorKind::UnexpectedCharOrEnd));
        assert_eq!(parse_err("x:y\u{e9}"), (3, ParseErrorKind::UnexpectedCharOrEnd));
    }
}
