//! Key-value pairs.

use crate::error::UnsupportedOperation;
use core::{fmt, hash, mem};

/// A key-value pair whose value may be replaced, unless it was created immutable.
///
/// Two entries are equal if their keys and values are equal, regardless of mutability.
///
/// # Examples
///
/// ```
/// use uri_builder::entry::Entry;
///
/// let mut entry = Entry::new("key", Some(1));
/// assert_eq!(entry.set_value(Some(2)), Ok(Some(1)));
/// assert_eq!(entry.value(), Some(&2));
///
/// let mut frozen = Entry::immutable("key", Some(1));
/// assert!(frozen.set_value(None).is_err());
/// assert_eq!(frozen.value(), Some(&1));
/// ```
#[derive(Clone, Copy)]
pub struct Entry<K, V> {
    key: K,
    value: Option<V>,
    mutable: bool,
}

impl<K, V> Entry<K, V> {
    /// Creates a mutable entry.
    pub const fn new(key: K, value: Option<V>) -> Self {
        Self {
            key,
            value,
            mutable: true,
        }
    }

    /// Creates an immutable entry.
    pub const fn immutable(key: K, value: Option<V>) -> Self {
        Self {
            key,
            value,
            mutable: false,
        }
    }

    /// Returns the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value, if any.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Checks whether the value may be replaced.
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Replaces the value and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the entry is immutable, leaving it unchanged.
    pub fn set_value(&mut self, value: Option<V>) -> Result<Option<V>, UnsupportedOperation> {
        if !self.mutable {
            return Err(UnsupportedOperation::new("value of an immutable entry cannot be changed"));
        }
        Ok(mem::replace(&mut self.value, value))
    }

    /// Consumes the entry and yields its key and value.
    pub fn into_pair(self) -> (K, Option<V>) {
        (self.key, self.value)
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl<K: Eq, V: Eq> Eq for Entry<K, V> {}

impl<K: hash::Hash, V: hash::Hash> hash::Hash for Entry<K, V> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("mutable", &self.mutable)
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}
