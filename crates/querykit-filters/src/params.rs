//! Case-insensitive, multi-valued request parameters.

use indexmap::IndexMap;
use std::collections::HashMap;
use url::form_urlencoded;

/// Query parameters keyed by lowercased name.
///
/// Keys that differ only in case collapse into one entry and their values
/// are appended in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Example: `country=Greece&stars=1&stars=2&limit=50`
    pub fn parse_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes()).collect()
    }

    /// Append one value under `name`.
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .entry(name.as_ref().to_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Builder-style variant of [`append`](Self::append) for several values.
    #[must_use]
    pub fn with<I, V>(mut self, name: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let entry = self.entries.entry(name.as_ref().to_lowercase()).or_default();
        entry.extend(values.into_iter().map(Into::into));
        self
    }

    /// Values supplied for `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

impl From<HashMap<String, Vec<String>>> for QueryParams {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        map.into_iter()
            .fold(Self::new(), |params, (name, values)| params.with(name, values))
    }
}
