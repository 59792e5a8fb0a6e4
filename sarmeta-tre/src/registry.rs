//! Registry routing extensions to their layouts by tag.

use crate::codec::{Truncation, decode_record, encode_record};
use crate::error::TreError;
use crate::extension::{TreExtension, parse_extensions};
use crate::options::TreOptions;
use sarmeta_schema::{BinaryLayout, Node};
use std::collections::HashMap;
use std::sync::Arc;

/// An extension decoded through a [`TreRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedExtension {
    /// Tag with a registered layout, decoded into a record.
    Known(Node),
    /// Tag without a layout, kept as raw data.
    Unknown(TreExtension),
}

impl DecodedExtension {
    /// Extension tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Known(node) => node.name(),
            Self::Unknown(ext) => &ext.tag,
        }
    }

    /// Decoded record, if the tag was known.
    #[must_use]
    pub const fn node(&self) -> Option<&Node> {
        match self {
            Self::Known(node) => Some(node),
            Self::Unknown(_) => None,
        }
    }
}

/// Layouts keyed by extension tag.
#[derive(Debug, Clone, Default)]
pub struct TreRegistry {
    layouts: HashMap<String, Arc<BinaryLayout>>,
}

impl TreRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layout under its tag, returning the layout it replaces.
    pub fn register(&mut self, layout: Arc<BinaryLayout>) -> Option<Arc<BinaryLayout>> {
        self.layouts.insert(layout.tag().to_string(), layout)
    }

    /// Returns true if a layout is registered for the tag.
    #[must_use]
    pub fn has_layout(&self, tag: &str) -> bool {
        self.layouts.contains_key(tag)
    }

    /// Layout registered for the tag.
    #[must_use]
    pub fn layout(&self, tag: &str) -> Option<&Arc<BinaryLayout>> {
        self.layouts.get(tag)
    }

    /// Number of registered layouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Returns true if no layout is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Decodes one extension, keeping it raw if its tag is unknown.
    ///
    /// # Errors
    /// Returns `TreError` if a known extension fails to decode.
    pub fn decode(&self, extension: &TreExtension) -> Result<DecodedExtension, TreError> {
        match self.layouts.get(&extension.tag) {
            Some(layout) => decode_record(&extension.data, layout).map(DecodedExtension::Known),
            None => {
                tracing::debug!("No layout for extension {}, keeping raw data", extension.tag);
                Ok(DecodedExtension::Unknown(extension.clone()))
            }
        }
    }

    /// Splits an extension area and decodes every extension in it.
    ///
    /// # Errors
    /// Returns `TreError` if the area is malformed or a known extension fails
    /// to decode.
    pub fn decode_all(&self, bytes: &[u8]) -> Result<Vec<DecodedExtension>, TreError> {
        parse_extensions(bytes)?
            .iter()
            .map(|ext| self.decode(ext))
            .collect()
    }

    /// Encodes a record into an extension, using the layout registered under
    /// the record's name.
    ///
    /// # Returns
    /// The extension, or `None` if no layout is registered for the record,
    /// along with any string truncations.
    ///
    /// # Errors
    /// Returns `TreError` if the record does not fit its layout.
    pub fn encode(
        &self,
        node: &Node,
        options: &TreOptions,
    ) -> Result<Option<(TreExtension, Vec<Truncation>)>, TreError> {
        let Some(layout) = self.layouts.get(node.name()) else {
            tracing::warn!("No layout registered for record {}", node.name());
            return Ok(None);
        };
        let encoded = encode_record(node, layout, options)?;
        Ok(Some((
            TreExtension::new(layout.tag(), encoded.bytes),
            encoded.truncations,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn layout() -> Arc<BinaryLayout> {
        BinaryLayout::builder("PAIR01")
            .text("KEY", 4)
            .unsigned("VALUE", 3)
            .build()
            .expect("Failed to build layout")
    }

    #[test]
    fn test_register() {
        let mut registry = TreRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(layout()).is_none());
        assert!(registry.register(layout()).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.has_layout("PAIR01"));
        assert!(!registry.has_layout("OTHER"));
    }

    #[test]
    fn test_decode_known_and_unknown() {
        let mut registry = TreRegistry::new();
        registry.register(layout());

        let area = b"PAIR0100007ab  012OTHER 00003xyz";
        let decoded = registry.decode_all(area).expect("Failed to decode");
        assert_eq!(decoded.len(), 2);

        let node = decoded[0].node().expect("Failed to find record");
        assert_eq!(node.str("KEY"), Some("ab"));
        assert_eq!(node.int("VALUE"), Some(12));

        assert_eq!(decoded[1].tag(), "OTHER");
        assert_eq!(
            decoded[1],
            DecodedExtension::Unknown(TreExtension::new("OTHER", Bytes::from_static(b"xyz")))
        );
    }

    #[test]
    fn test_decode_short_known_record() {
        let mut registry = TreRegistry::new();
        registry.register(layout());
        let result = registry.decode_all(b"PAIR0100003abc");
        assert!(matches!(result, Err(TreError::TruncatedRecord { .. })));
    }

    #[test]
    fn test_encode_round_trip() {
        let mut registry = TreRegistry::new();
        let layout = layout();
        registry.register(layout.clone());

        let mut node = Node::new(layout.schema().clone());
        node.set("KEY", "k").expect("Failed to set");
        node.set("VALUE", 7).expect("Failed to set");

        let (ext, truncations) = registry
            .encode(&node, &TreOptions::new())
            .expect("Failed to encode")
            .expect("Failed to find layout");
        assert!(truncations.is_empty());
        let framed = ext.to_bytes().expect("Failed to frame");
        assert_eq!(&framed[..], b"PAIR0100007k   007");

        let decoded = registry.decode_all(&framed).expect("Failed to decode");
        assert_eq!(decoded[0].node(), Some(&node));
    }

    #[test]
    fn test_encode_unregistered() {
        let registry = TreRegistry::new();
        let node = Node::new(layout().schema().clone());
        let result = registry.encode(&node, &TreOptions::new()).expect("Failed to encode");
        assert!(result.is_none());
    }
}
