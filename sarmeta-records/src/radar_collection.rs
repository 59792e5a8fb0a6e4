//! SICD radar collection, reduced to the transmit band consulted when
//! deriving image formation defaults.

use sarmeta_schema::{FieldDescriptor, OrderedFields, RecordSchema, SchemaError};
use std::sync::{Arc, LazyLock};

static TX_FREQUENCY: LazyLock<Result<Arc<RecordSchema>, SchemaError>> = LazyLock::new(|| {
    RecordSchema::builder("TxFrequency")
        .field(FieldDescriptor::float("Min").required().frequency_relative())
        .field(FieldDescriptor::float("Max").required().frequency_relative())
        .numeric_format("Min", "0.16G")
        .numeric_format("Max", "0.16G")
        .predicate(OrderedFields::new("Min", "Max"))
        .build()
});

static RADAR_COLLECTION: LazyLock<Result<Arc<RecordSchema>, SchemaError>> =
    LazyLock::new(|| {
        RecordSchema::builder("RadarCollection")
            .field(FieldDescriptor::record("TxFrequency", tx_frequency()?).required())
            .field(FieldDescriptor::integer("RefFreqIndex"))
            .build()
    });

/// Transmitted frequency band, `Min <= Max`.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn tx_frequency() -> Result<Arc<RecordSchema>, SchemaError> {
    TX_FREQUENCY.clone()
}

/// Radar collection parameters.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn radar_collection() -> Result<Arc<RecordSchema>, SchemaError> {
    RADAR_COLLECTION.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarmeta_schema::Node;

    #[test]
    fn test_tx_frequency_positional() {
        let mut node = Node::new(radar_collection().expect("Failed to build schema"));
        node.set("TxFrequency", [9.0e9, 1.0e10]).expect("Failed to set");
        let band = node.record("TxFrequency").expect("Failed to get record");
        assert_eq!(band.float("Min"), Some(9.0e9));
        assert_eq!(band.float("Max"), Some(1.0e10));
        assert!(node.is_valid());
    }

    #[test]
    fn test_reversed_band() {
        let mut node = Node::new(tx_frequency().expect("Failed to build schema"));
        node.set("Min", 2.0).expect("Failed to set");
        node.set("Max", 1.0).expect("Failed to set");
        assert_eq!(node.validate().len(), 1);
    }
}
