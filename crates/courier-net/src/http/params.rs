//! String key-value store shared by headers, query and body parameters.

use std::collections::BTreeMap;

/// A string-to-string map with overwrite semantics.
///
/// Keys are unique and the last write wins. Iteration is ordered by key, so
/// anything encoded from a `ParamMap` comes out the same way every time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: BTreeMap<String, String>,
}

impl ParamMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get a value comparing keys ASCII case-insensitively.
    ///
    /// Header names are case-insensitive on the wire; this is how header
    /// lookups such as `Content-Type` are done.
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Remove every key matching `key` case-insensitively.
    pub fn remove_ignore_case(&mut self, key: &str) {
        self.entries.retain(|k, _| !k.eq_ignore_ascii_case(key));
    }

    /// Insert `key`, first dropping any key that differs from it only in
    /// ASCII case. Header names go through here so the latest write wins
    /// however it is spelled.
    pub fn set_ignore_case(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let key = key.into();
        let previous = self.get_ignore_case(&key).map(str::to_owned);
        self.remove_ignore_case(&key);
        self.entries.insert(key, value.into());
        previous
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy all entries of `other` into `self`, overwriting existing keys.
    pub fn extend_from(&mut self, other: &ParamMap) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ParamMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl From<&http::HeaderMap> for ParamMap {
    /// Collect headers whose values are valid strings. Repeated headers keep
    /// the last value.
    fn from(headers: &http::HeaderMap) -> Self {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParamMap {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
