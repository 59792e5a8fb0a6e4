//! # sarmeta Bench
//!
//! Record fixtures shared by the sarmeta benchmarks.

use sarmeta_core::RawValue;
use sarmeta_schema::{Node, NodeError, SchemaError};
use thiserror::Error;

/// Failure while building a benchmark fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Record definition failed to build.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Field assignment failed.
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// A fully populated image formation record with `steps` processing steps.
///
/// # Errors
/// Returns `FixtureError` if the record cannot be built.
pub fn image_formation(steps: usize) -> Result<Node, FixtureError> {
    let mut node = Node::new(sarmeta_records::image_formation()?);
    node.set(
        "RcvChanProc",
        RawValue::List(vec![4.into(), 1.0.into(), vec![1, 2, 3, 4].into()]),
    )?;
    node.set("TxRcvPolarizationProc", "H:V")?;
    node.set("TStartProc", 0.0)?;
    node.set("TEndProc", 3.141_592_653_589_793)?;
    node.set("TxFrequencyProc", [9.45e9, 9.75e9])?;
    node.set("ImageFormAlgo", "RMA")?;
    for name in ["STBeamComp", "ImageBeamComp", "AzAutofocus", "RgAutofocus"] {
        node.set(name, "SV")?;
    }

    let processing = sarmeta_records::image_formation::processing()?;
    for i in 0..steps {
        let mut step = Node::new(processing.clone());
        step.set("Type", format!("step-{i}"))?;
        step.set("Applied", i % 2 == 0)?;
        step.insert_parameter("Parameters", "Order", i.to_string())?;
        node.push_record("Processings", step)?;
    }
    Ok(node)
}

/// A color remap record with a `rows` x 3 lookup table.
///
/// # Errors
/// Returns `FixtureError` if the record cannot be built.
pub fn color_remap(rows: usize) -> Result<Node, FixtureError> {
    let mut node = Node::new(sarmeta_records::product_display::color_display_remap()?);
    let lut: Vec<RawValue> = (0..rows)
        .map(|i| {
            let v = (i % 256) as u8;
            [v, v / 2, 255 - v].into()
        })
        .collect();
    node.set("RemapLUT", lut)?;
    Ok(node)
}

/// A fully populated `CSCCGA` record.
///
/// # Errors
/// Returns `FixtureError` if the record cannot be built.
pub fn csccga() -> Result<Node, FixtureError> {
    let layout = sarmeta_records::csccga()?;
    let mut node = Node::new(layout.schema().clone());
    node.set("CCG_SOURCE", "CLOUD COVER")?;
    node.set("REG_SENSOR", "EO")?;
    for (name, value) in [
        ("ORIGIN_LINE", 100),
        ("ORIGIN_SAMPLE", 200),
        ("AS_CELL_SIZE", 1500),
        ("CS_CELL_SIZE", 1500),
        ("CCG_MAX_LINE", 4096),
        ("CCG_MAX_SAMPLE", 4096),
    ] {
        node.set(name, value)?;
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        let formation = image_formation(3).expect("Failed to build fixture");
        assert!(formation.is_valid(), "{:?}", formation.validate());
        assert_eq!(formation.records("Processings").len(), 3);
        let remap = color_remap(300).expect("Failed to build fixture");
        assert_eq!(remap.array("RemapLUT").map(|a| a.rows()), Some(300));
        assert!(csccga().expect("Failed to build fixture").is_valid());
    }
}
