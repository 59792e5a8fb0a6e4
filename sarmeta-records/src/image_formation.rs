//! SICD image formation records.
//!
//! [`image_formation`] is the root; the other schemas are its nested
//! records. All schemas are built once and shared.

use crate::radar_collection::radar_collection;
use sarmeta_core::EnumValues;
use sarmeta_schema::{
    CollectionMode, DefaultFromSibling, DerivationInput, FieldDescriptor, Node, NodeError,
    OrderedFields, RecordSchema, ReferenceShift, SchemaError,
};
use std::sync::{Arc, LazyLock};

/// Hook filling `TxFrequencyProc` from the radar collection's `TxFrequency`.
pub const DERIVE_TX_FREQUENCY_PROC: &str = "derive_tx_frequency_proc";

/// Hook shifting processed frequencies by the reference frequency.
pub const APPLY_REFERENCE_FREQUENCY: &str = "apply_reference_frequency";

/// Combined transmit/receive polarizations.
pub const DUAL_POLARIZATION_VALUES: [&str; 18] = [
    "V:V", "V:H", "V:RHC", "V:LHC", "H:V", "H:H", "H:RHC", "H:LHC", "RHC:V", "RHC:H", "RHC:RHC",
    "RHC:LHC", "LHC:V", "LHC:H", "LHC:RHC", "LHC:LHC", "OTHER", "UNKNOWN",
];

const IMAGE_FORM_ALGO_VALUES: [&str; 4] = ["PFA", "RMA", "RGAZCOMP", "OTHER"];
const ST_BEAM_COMP_VALUES: [&str; 3] = ["NO", "GLOBAL", "SV"];
const IMAGE_BEAM_COMP_VALUES: [&str; 2] = ["NO", "SV"];

type SchemaCell = LazyLock<Result<Arc<RecordSchema>, SchemaError>>;

static RCV_CHAN_PROC: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("RcvChanProc")
        .field(
            FieldDescriptor::integer("NumChanProc")
                .required()
                .doc("Number of receive data channels processed to form the image."),
        )
        .field(
            FieldDescriptor::float("PRFScaleFactor")
                .doc("Ratio of the effective PRF to the actual PRF."),
        )
        .field(
            FieldDescriptor::integer("ChanIndices")
                .required()
                .collection(CollectionMode::RepeatedChild("ChanIndex".into()))
                .doc("Index of a data channel that was processed."),
        )
        .numeric_format("PRFScaleFactor", "0.16G")
        .build()
});

static TX_FREQUENCY_PROC: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("TxFrequencyProc")
        .field(
            FieldDescriptor::float("MinProc")
                .required()
                .frequency_relative()
                .doc("Minimum transmit frequency processed, in Hz."),
        )
        .field(
            FieldDescriptor::float("MaxProc")
                .required()
                .frequency_relative()
                .doc("Maximum transmit frequency processed, in Hz."),
        )
        .numeric_format("MinProc", "0.16G")
        .numeric_format("MaxProc", "0.16G")
        .predicate(OrderedFields::new("MinProc", "MaxProc"))
        .build()
});

static PROCESSING: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("Processing")
        .field(
            FieldDescriptor::string("Type")
                .required()
                .doc("Processing type identifier."),
        )
        .field(
            FieldDescriptor::boolean("Applied")
                .required()
                .doc("Whether the processing type has been applied."),
        )
        .field(
            FieldDescriptor::string("Parameters")
                .collection(CollectionMode::ParameterMap("Parameter".into())),
        )
        .build()
});

static DISTORTION: SchemaCell = LazyLock::new(|| {
    let mut builder = RecordSchema::builder("Distortion")
        .field(FieldDescriptor::datetime("CalibrationDate"))
        .field(FieldDescriptor::float("A").doc("Absolute amplitude scale factor."));
    // receive (F1, Q1, Q2) and transmit (F2, Q3, Q4) distortion elements
    for name in ["F1", "F2", "Q1", "Q2", "Q3", "Q4"] {
        builder = builder.field(FieldDescriptor::complex(name));
    }
    for name in [
        "GainErrorA",
        "GainErrorF1",
        "GainErrorF2",
        "PhaseErrorF1",
        "PhaseErrorF2",
    ] {
        builder = builder.field(FieldDescriptor::float(name));
    }
    for name in [
        "A",
        "F1",
        "F2",
        "Q1",
        "Q2",
        "Q3",
        "Q4",
        "GainErrorA",
        "GainErrorF1",
        "GainErrorF2",
        "PhaseErrorF1",
        "PhaseErrorF2",
    ] {
        builder = builder.numeric_format(name, "0.16G");
    }
    builder
        .required(["A", "F1", "Q1", "Q2", "F2", "Q3", "Q4"])
        .build()
});

static POLARIZATION_CALIBRATION: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("PolarizationCalibration")
        .field(
            FieldDescriptor::boolean("DistortCorrectApplied")
                .required()
                .doc("Whether polarization calibration has been applied."),
        )
        .field(FieldDescriptor::record("Distortion", distortion()?).required())
        .build()
});

static IMAGE_FORMATION: SchemaCell = LazyLock::new(|| {
    let enumeration = |name: &str, values: &[&str]| {
        FieldDescriptor::enumeration(name, EnumValues::new(values.iter().copied()))
    };
    RecordSchema::builder("ImageFormation")
        .field(FieldDescriptor::record("RcvChanProc", rcv_chan_proc()?).required())
        .field(enumeration("TxRcvPolarizationProc", &DUAL_POLARIZATION_VALUES).required())
        .field(
            FieldDescriptor::float("TStartProc")
                .required()
                .doc("Earliest slow time processed, from collection start."),
        )
        .field(
            FieldDescriptor::float("TEndProc")
                .required()
                .doc("Latest slow time processed, from collection start."),
        )
        .field(FieldDescriptor::record("TxFrequencyProc", tx_frequency_proc()?).required())
        .field(FieldDescriptor::string("SegmentIdentifier"))
        .field(enumeration("ImageFormAlgo", &IMAGE_FORM_ALGO_VALUES).required())
        .field(enumeration("STBeamComp", &ST_BEAM_COMP_VALUES).required())
        .field(enumeration("ImageBeamComp", &IMAGE_BEAM_COMP_VALUES).required())
        .field(enumeration("AzAutofocus", &ST_BEAM_COMP_VALUES).required())
        .field(enumeration("RgAutofocus", &ST_BEAM_COMP_VALUES).required())
        .field(
            FieldDescriptor::record("Processings", processing()?)
                .collection(CollectionMode::RepeatedChild("Processing".into())),
        )
        .field(FieldDescriptor::record(
            "PolarizationCalibration",
            polarization_calibration()?,
        ))
        .numeric_format("TStartProc", "0.16G")
        .numeric_format("TEndProc", "0.16G")
        .predicate(OrderedFields::new("TStartProc", "TEndProc"))
        .hook(DefaultFromSibling::new(
            DERIVE_TX_FREQUENCY_PROC,
            [
                ("TxFrequencyProc.MinProc", "TxFrequency.Min"),
                ("TxFrequencyProc.MaxProc", "TxFrequency.Max"),
            ],
        ))
        .hook(ReferenceShift::new(APPLY_REFERENCE_FREQUENCY))
        .build()
});

/// Received processed channels.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn rcv_chan_proc() -> Result<Arc<RecordSchema>, SchemaError> {
    RCV_CHAN_PROC.clone()
}

/// Processed transmit frequency band, `MinProc <= MaxProc`.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn tx_frequency_proc() -> Result<Arc<RecordSchema>, SchemaError> {
    TX_FREQUENCY_PROC.clone()
}

/// One applied processing step with free-form parameters.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn processing() -> Result<Arc<RecordSchema>, SchemaError> {
    PROCESSING.clone()
}

/// Polarization distortion matrix and calibration errors.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn distortion() -> Result<Arc<RecordSchema>, SchemaError> {
    DISTORTION.clone()
}

/// Polarization calibration.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn polarization_calibration() -> Result<Arc<RecordSchema>, SchemaError> {
    POLARIZATION_CALIBRATION.clone()
}

/// Image formation parameters, `TStartProc <= TEndProc`.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn image_formation() -> Result<Arc<RecordSchema>, SchemaError> {
    IMAGE_FORMATION.clone()
}

/// Fills an absent processed band from the radar collection's transmit band.
///
/// Both `TxFrequency.Min` and `TxFrequency.Max` must be present; existing
/// values are kept.
///
/// # Errors
/// Returns `NodeError` if `node` is not an image formation record or
/// `radar_collection` is not a radar collection record.
pub fn derive_tx_frequency_proc(node: &mut Node, radar_collection: &Node) -> Result<(), NodeError> {
    check_sibling(radar_collection)?;
    node.derive(
        DERIVE_TX_FREQUENCY_PROC,
        &DerivationInput::Sibling(radar_collection),
    )
}

/// Shifts processed frequencies by the reference frequency.
///
/// # Errors
/// Returns `NodeError` if `node` is not an image formation record.
pub fn apply_reference_frequency(node: &mut Node, reference: f64) -> Result<(), NodeError> {
    node.derive(
        APPLY_REFERENCE_FREQUENCY,
        &DerivationInput::ReferenceOffset(reference),
    )
}

fn check_sibling(sibling: &Node) -> Result<(), NodeError> {
    let expected = radar_collection().map_err(|err| {
        NodeError::unsupported("RadarCollection", format!("schema unavailable: {err}"))
    })?;
    if !sibling.schema().same_record(&expected) {
        return Err(NodeError::SchemaMismatch {
            field: "RadarCollection".to_string(),
            expected: expected.name().to_string(),
            found: sibling.name().to_string(),
        });
    }
    Ok(())
}
