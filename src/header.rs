use std::collections::HashMap;

/// A case-insensitive, single-valued header map.
///
/// Lookup ignores ASCII case; the originally supplied name is preserved for
/// snapshots. A later insert for the same name (in any casing) replaces both
/// the stored name and the value - last write wins.
///
/// Real host containers perform their own case-insensitive header lookup, so
/// the passthrough adapters never touch this type; it backs the in-memory
/// mock adapter and is handy for host stubs in tests.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    // lowercase name -> (original name, value)
    entries: HashMap<String, (String, String)>,
}

impl HeaderMap {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any previous value for the same
    /// case-insensitive name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries
            .insert(name.to_ascii_lowercase(), (name, value.into()));
    }

    /// Looks up a header value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Returns true when a header with this case-insensitive name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Returns the number of stored headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no headers are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(original name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns a snapshot keyed by the originally supplied names.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries
            .values()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
