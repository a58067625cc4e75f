//! Percent-encoding utilities.
//!
//! Strings are escaped per URI context: every character allowed by the
//! context's [`Table`] is kept, every other character is replaced by the
//! `%XX` triplets of its UTF-8 bytes, with uppercase hexadecimal digits.
//!
//! ```
//! use uri_builder::pct_enc::{self, encoder::{Path, PathSegment, QueryParam}};
//!
//! assert_eq!(pct_enc::encode::<Path>("/a b/c#d"), "/a%20b/c%23d");
//! assert_eq!(pct_enc::encode::<PathSegment>("a/b"), "a%2Fb");
//! assert_eq!(pct_enc::encode::<QueryParam>("x=1&y"), "x%3D1%26y");
//!
//! assert_eq!(pct_enc::decode("%C2%A1Hola%21")?, "¡Hola!");
//! # Ok::<_, uri_builder::pct_enc::DecodeError>(())
//! ```

pub mod encoder;
pub mod table;

pub use table::Table;

use alloc::{
    borrow::{Cow, ToOwned},
    string::String,
    vec::Vec,
};
use core::{cmp::Ordering, fmt, hash, iter::FusedIterator, marker::PhantomData, str};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// A trait used by [`EStr`] and the encoding functions to specify the table used for encoding.
///
/// # Sub-encoders
///
/// A sub-encoder `SubE` of `E` is an encoder such that `SubE::TABLE` is a [subset] of `E::TABLE`.
///
/// [subset]: Table::is_subset
pub trait Encoder: 'static {
    /// The table used for encoding.
    const TABLE: Table;
}

/// Detailed cause of a [`DecodeError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeErrorKind {
    /// A `'%'` not followed by two hexadecimal digits.
    ///
    /// The error index points to the `'%'`.
    MalformedEscapeSequence,
    /// The decoded bytes are not valid UTF-8.
    ///
    /// The error index points to the first invalid byte of the decoded output.
    InvalidUtf8Sequence,
}

/// An error occurred when decoding a percent-encoded string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    pub(crate) index: usize,
    pub(crate) kind: DecodeErrorKind,
}

impl DecodeError {
    /// Returns the index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            DecodeErrorKind::MalformedEscapeSequence => "malformed escape sequence at index ",
            DecodeErrorKind::InvalidUtf8Sequence => "invalid UTF-8 sequence at decoded index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(is_hexdig_pair(hi, lo));
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes a string with the given encoder and appends the result onto `buf`.
///
/// Note that `U+0020` (space) is encoded as `%20`, never as `+`.
pub fn encode_to<E: Encoder>(s: &str, buf: &mut String) {
    for chunk in Encode::new(E::TABLE, s) {
        buf.push_str(chunk.as_str());
    }
}

/// Percent-encodes a string with the given encoder.
///
/// Borrows the input when no character needs encoding.
///
/// # Examples
///
/// ```
/// use uri_builder::pct_enc::{encode, encoder::Fragment};
///
/// assert_eq!(encode::<Fragment>("section 1"), "section%201");
/// assert_eq!(encode::<Fragment>("top"), "top");
/// assert_eq!(encode::<Fragment>("€"), "%E2%82%AC");
/// ```
#[must_use]
pub fn encode<E: Encoder>(s: &str) -> Cow<'_, str> {
    if s.bytes().all(|x| E::TABLE.allows_ascii(x)) {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len() * 3);
    encode_to::<E>(s, &mut buf);
    Cow::Owned(buf)
}

/// Decodes a percent-encoded string to bytes.
///
/// Characters not introduced by `'%'` are copied unchanged.
/// Borrows the input when it contains no `'%'`.
///
/// # Errors
///
/// Returns [`MalformedEscapeSequence`] if a `'%'` is not followed by two hexadecimal digits.
///
/// [`MalformedEscapeSequence`]: DecodeErrorKind::MalformedEscapeSequence
pub fn decode_to_bytes(s: &str) -> Result<Cow<'_, [u8]>, DecodeError> {
    let bytes = s.as_bytes();
    let Some(first) = bytes.iter().position(|&x| x == b'%') else {
        return Ok(Cow::Borrowed(bytes));
    };

    let mut buf = Vec::with_capacity(bytes.len());
    buf.extend_from_slice(&bytes[..first]);

    let mut i = first;
    while i < bytes.len() {
        let x = bytes[i];
        if x != b'%' {
            buf.push(x);
            i += 1;
            continue;
        }
        match bytes.get(i + 1..i + 3) {
            Some(&[hi, lo]) if is_hexdig_pair(hi, lo) => {
                buf.push(decode_octet(hi, lo));
                i += 3;
            }
            _ => {
                return Err(DecodeError {
                    index: i,
                    kind: DecodeErrorKind::MalformedEscapeSequence,
                })
            }
        }
    }
    Ok(Cow::Owned(buf))
}

/// Decodes a percent-encoded string to a UTF-8 string.
///
/// Borrows the input when it contains no `'%'`.
///
/// # Errors
///
/// Returns [`MalformedEscapeSequence`] if a `'%'` is not followed by two hexadecimal digits,
/// or [`InvalidUtf8Sequence`] if the decoded bytes are not valid UTF-8.
///
/// [`MalformedEscapeSequence`]: DecodeErrorKind::MalformedEscapeSequence
/// [`InvalidUtf8Sequence`]: DecodeErrorKind::InvalidUtf8Sequence
///
/// # Examples
///
/// ```
/// use uri_builder::pct_enc::{decode, DecodeErrorKind};
///
/// assert_eq!(decode("a%20b").unwrap(), "a b");
/// assert_eq!(decode("%2").unwrap_err().kind(), DecodeErrorKind::MalformedEscapeSequence);
/// assert_eq!(decode("%FF").unwrap_err().kind(), DecodeErrorKind::InvalidUtf8Sequence);
/// ```
pub fn decode(s: &str) -> Result<Cow<'_, str>, DecodeError> {
    match decode_to_bytes(s)? {
        Cow::Borrowed(_) => Ok(Cow::Borrowed(s)),
        Cow::Owned(buf) => String::from_utf8(buf).map(Cow::Owned).map_err(|e| DecodeError {
            index: e.utf8_error().valid_up_to(),
            kind: DecodeErrorKind::InvalidUtf8Sequence,
        }),
    }
}

/// An iterator used to percent-encode a string slice.
#[derive(Clone, Debug)]
struct Encode<'s> {
    table: Table,
    source: &'s str,
    to_enc: &'s [u8],
}

impl<'s> Encode<'s> {
    fn new(table: Table, source: &'s str) -> Self {
        Self {
            table,
            source,
            to_enc: &[],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EncodedChunk<'a> {
    Unencoded(&'a str),
    PctEncoded(&'static str),
}

impl<'a> EncodedChunk<'a> {
    fn as_str(self) -> &'a str {
        match self {
            Self::Unencoded(s) | Self::PctEncoded(s) => s,
        }
    }
}

impl<'a> Iterator for Encode<'a> {
    type Item = EncodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let [x, rem @ ..] = self.to_enc {
            self.to_enc = rem;
            return Some(EncodedChunk::PctEncoded(encode_byte(*x)));
        }

        if self.source.is_empty() {
            return None;
        }

        let bytes = self.source.as_bytes();
        let allowed_len = bytes
            .iter()
            .position(|&x| !self.table.allows_ascii(x))
            .unwrap_or(bytes.len());

        if allowed_len > 0 {
            let allowed;
            (allowed, self.source) = self.source.split_at(allowed_len);
            return Some(EncodedChunk::Unencoded(allowed));
        }

        // Every unallowed byte is encoded, including the continuation bytes
        // of a non-ASCII character.
        let unallowed_len = bytes
            .iter()
            .position(|&x| self.table.allows_ascii(x))
            .unwrap_or(bytes.len());

        let unallowed;
        (unallowed, self.source) = self.source.split_at(unallowed_len);
        let (x, rem) = unallowed.as_bytes().split_first()?;
        self.to_enc = rem;
        Some(EncodedChunk::PctEncoded(encode_byte(*x)))
    }
}

impl FusedIterator for Encode<'_> {}

/// Percent-encoded string slices.
///
/// The underlying string of an `EStr<E>` only contains characters allowed
/// by `E::TABLE` and well-formed percent-encoded octets, so decoding it
/// can only fail on invalid UTF-8.
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// ```
/// use uri_builder::{pct_enc::EStr, Uri};
///
/// let uri = Uri::parse("http://example.com/%E5%BC%A0%E4%B8%89?speech=%C2%A1Ol%C3%A9%21")?;
/// assert_eq!(uri.path().decode().to_string().unwrap(), "/张三");
///
/// let (k, v) = uri.query().unwrap().split_once('=').unwrap();
/// assert_eq!(k, "speech");
/// assert_eq!(v.decode().to_string_lossy(), "¡Olé!");
/// # Ok::<_, uri_builder::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

impl<E: Encoder> EStr<E> {
    /// Converts a string slice to an `EStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to an `EStr` slice.
    ///
    /// # Panics
    ///
    /// Panics if the string is not properly encoded with `E`.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly encoded string"),
        }
    }

    /// Converts a string slice to an `EStr` slice, returning `None` if the conversion fails.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if E::TABLE.validate(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns a decoder for the `EStr` slice.
    ///
    /// Always **split before decoding**, as otherwise the data may be
    /// mistaken for component delimiters.
    ///
    /// Note that `U+002B` (+) is **not** decoded as `0x20` (space).
    pub fn decode(&self) -> Decode<'_> {
        Decode {
            source: &self.inner,
        }
    }

    /// Returns an iterator over subslices of the `EStr` slice separated by the given delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_builder::pct_enc::{encoder::Query, EStr};
    ///
    /// assert!(EStr::<Query>::new_or_panic("a=1&b=2").split('&').eq(["a=1", "b=2"]));
    /// assert!(EStr::<Query>::EMPTY.split('&').eq([""]));
    /// ```
    pub fn split(&self, delim: char) -> Split<'_, E> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        Split {
            inner: self.inner.split(delim),
            encoder: PhantomData,
        }
    }

    /// Splits the `EStr` slice on the first occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        self.inner
            .split_once(delim)
            .map(|(a, b)| (Self::new_validated(a), Self::new_validated(b)))
    }
}

/// Extension methods for the [path] component.
///
/// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
impl EStr<encoder::Path> {
    /// Checks whether the path is absolute, i.e., starting with `'/'`.
    #[inline]
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Returns an iterator over the path segments, separated by `'/'`.
    ///
    /// Returns `None` if the path does not start with `'/'`.
    ///
    /// ```
    /// use uri_builder::Uri;
    ///
    /// let path = Uri::parse("file:///path/to//dir/")?.path();
    /// assert!(path.segments_if_absolute().unwrap().eq(["path", "to", "", "dir", ""]));
    /// # Ok::<_, uri_builder::ParseError>(())
    /// ```
    #[must_use]
    pub fn segments_if_absolute(&self) -> Option<Split<'_, encoder::PathSegment>> {
        self.inner.strip_prefix('/').map(|s| Split {
            inner: s.split('/'),
            encoder: PhantomData,
        })
    }
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<E: Encoder> PartialEq for EStr<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E: Encoder> PartialEq<str> for EStr<E> {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl<E: Encoder> PartialEq<&str> for EStr<E> {
    fn eq(&self, other: &&str) -> bool {
        &self.inner == *other
    }
}

impl<E: Encoder> PartialEq<EStr<E>> for str {
    fn eq(&self, other: &EStr<E>) -> bool {
        self == &other.inner
    }
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> hash::Hash for EStr<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EStr<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EStr<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<E: Encoder> Default for &EStr<E> {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl<E: Encoder> fmt::Debug for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<E: Encoder> fmt::Display for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// A decoder for an [`EStr`] slice.
///
/// This struct is created by [`EStr::decode`].
#[derive(Clone, Copy, Debug)]
#[must_use = "decoders are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
}

impl<'a> Decode<'a> {
    /// Decodes the slice to bytes.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    #[must_use]
    pub fn to_bytes(self) -> Cow<'a, [u8]> {
        match decode_to_bytes(self.source) {
            Ok(bytes) => bytes,
            Err(_) => unreachable!("EStr contains malformed escape sequence"),
        }
    }

    /// Attempts to decode the slice to a string.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUtf8Sequence`] if the decoded bytes are not valid UTF-8.
    ///
    /// [`InvalidUtf8Sequence`]: DecodeErrorKind::InvalidUtf8Sequence
    pub fn to_string(self) -> Result<Cow<'a, str>, DecodeError> {
        decode(self.source)
    }

    /// Decodes the slice to a string, replacing any invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        match self.to_bytes() {
            Cow::Borrowed(_) => Cow::Borrowed(self.source),
            Cow::Owned(buf) => match String::from_utf8_lossy(&buf) {
                Cow::Borrowed(s) => Cow::Owned(s.to_owned()),
                Cow::Owned(s) => Cow::Owned(s),
            },
        }
    }
}

/// An iterator over subslices of an [`EStr`] slice separated by a delimiter.
///
/// This struct is created by [`EStr::split`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a, E: Encoder> {
    inner: str::Split<'a, char>,
    encoder: PhantomData<E>,
}

impl<'a, E: Encoder> Iterator for Split<'a, E> {
    type Item = &'a EStr<E>;

    fn next(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next().map(EStr::new_validated)
    }
}

impl<'a, E: Encoder> DoubleEndedIterator for Split<'a, E> {
    fn next_back(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next_back().map(EStr::new_validated)
    }
}

impl<E: Encoder> FusedIterator for Split<'_, E> {}
