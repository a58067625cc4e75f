//! A map associating each key with an ordered list of values.

use alloc::{collections::btree_map, collections::BTreeMap, vec, vec::Vec};
use core::{borrow::Borrow, fmt};

/// A multi-valued map.
///
/// Keys are kept in ascending order. The values of a key are kept in the
/// order they were added, duplicates included. A key present in the map
/// always has at least one value.
///
/// # Examples
///
/// ```
/// use uri_builder::multimap::MultiMap;
///
/// let mut map = MultiMap::new();
/// map.add("a", 1);
/// map.add("b", 2);
/// map.add("a", 3);
///
/// assert_eq!(map.get("a"), Some(&[1, 3][..]));
/// assert_eq!(map.get_first("b"), Some(&2));
///
/// map.put_single("a", 4);
/// assert_eq!(map.get("a"), Some(&[4][..]));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MultiMap<K, V> {
    inner: BTreeMap<K, Vec<V>>,
}

impl<K, V> MultiMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Returns the number of keys in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the map has no key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns an iterator over the keys and their value lists, in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.inner.iter(),
        }
    }

    /// Returns an iterator over the keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.inner.keys()
    }
}

impl<K: Ord, V> MultiMap<K, V> {
    /// Appends a value to the list of a key, creating the list if absent.
    pub fn add(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Appends every value to the list of a key.
    ///
    /// Nothing happens when `values` is empty.
    pub fn add_all(&mut self, key: K, values: impl IntoIterator<Item = V>) {
        let mut values = values.into_iter().peekable();
        if values.peek().is_some() {
            self.inner.entry(key).or_default().extend(values);
        }
    }

    /// Inserts a value at the front of the list of a key.
    pub fn add_first(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().insert(0, value);
    }

    /// Replaces every value of a key with a single one.
    ///
    /// Returns the previous values, if any.
    pub fn put_single(&mut self, key: K, value: V) -> Option<Vec<V>> {
        self.inner.insert(key, vec![value])
    }

    /// Returns the values of a key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Returns the first value of a key.
    #[must_use]
    pub fn get_first<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.get(key).and_then(|values| values.first())
    }

    /// Checks whether the map has a key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Removes a key and returns its values.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Vec<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.remove(key)
    }
}

impl<K: Ord, V: Ord> MultiMap<K, V> {
    /// Compares two maps, ignoring the order of the values of each key.
    ///
    /// ```
    /// use uri_builder::multimap::MultiMap;
    ///
    /// let mut a = MultiMap::new();
    /// a.add("k", "x");
    /// a.add("k", "y");
    ///
    /// let mut b = MultiMap::new();
    /// b.add("k", "y");
    /// b.add("k", "x");
    ///
    /// assert_ne!(a, b);
    /// assert!(a.equals_ignore_value_order(&b));
    /// ```
    #[must_use]
    pub fn equals_ignore_value_order(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.inner.iter().all(|(key, values)| {
                other.inner.get(key).is_some_and(|other_values| {
                    let mut a: Vec<&V> = values.iter().collect();
                    let mut b: Vec<&V> = other_values.iter().collect();
                    a.sort_unstable();
                    b.sort_unstable();
                    a == b
                })
            })
    }
}

impl<K, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for MultiMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for MultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a MultiMap<K, V> {
    type Item = (&'a K, &'a [V]);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`MultiMap`].
///
/// This struct is created by [`MultiMap::iter`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: btree_map::Iter<'a, K, Vec<V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a [V]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
