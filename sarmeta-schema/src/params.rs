//! Ordered string key/value maps.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Insertion-ordered map of unique string keys to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ParameterMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key/value pair.
    ///
    /// # Errors
    /// Returns the rejected key if it is already present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), String> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(key);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Builds a map from pairs, failing on the first repeated key.
    ///
    /// # Errors
    /// Returns the first repeated key.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = ParameterMap::new();
        map.insert("A", "1").expect("Failed to insert");
        map.insert("B", "2").expect("Failed to insert");
        assert_eq!(map.get("B"), Some("2"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut map = ParameterMap::new();
        map.insert("A", "1").expect("Failed to insert");
        assert_eq!(map.insert("A", "2"), Err("A".to_string()));
        assert_eq!(map.get("A"), Some("1"));
        assert_eq!(
            ParameterMap::try_from_pairs([("X", "1"), ("X", "2")]),
            Err("X".to_string())
        );
    }

    #[test]
    fn test_large_map_keeps_order_and_lookup() {
        let pairs: Vec<(String, String)> = (0..2000)
            .rev()
            .map(|i| (format!("key{i}"), i.to_string()))
            .collect();
        let map = ParameterMap::try_from_pairs(pairs).expect("Failed to build map");
        assert_eq!(map.len(), 2000);
        assert_eq!(map.iter().next(), Some(("key1999", "1999")));
        assert_eq!(map.iter().last(), Some(("key0", "0")));
        assert_eq!(map.get("key1000"), Some("1000"));
        assert!(!map.contains_key("key2000"));

        let mut copy = map.clone();
        assert_eq!(copy.insert("key7", "x"), Err("key7".to_string()));
        assert_eq!(copy, map);
    }

    #[test]
    fn test_serialize_as_map() {
        let map = ParameterMap::try_from_pairs([("k", "v")]).expect("Failed to build map");
        let json = serde_json::to_string(&map).expect("Failed to serialize");
        assert_eq!(json, r#"{"k":"v"}"#);
    }
}
