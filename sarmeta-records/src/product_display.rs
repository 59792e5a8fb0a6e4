//! SIDD 1.0 product display records.

use sarmeta_core::{EnumValues, IntegerRange};
use sarmeta_schema::{CollectionMode, FieldDescriptor, RecordSchema, SchemaError};
use std::sync::{Arc, LazyLock};

/// Pixel types of a derived product.
pub const PIXEL_TYPE_VALUES: [&str; 5] = ["MONO8I", "MONO8LU", "MONO16I", "RGBL8U", "RGB24I"];

const MAGNIFICATION_VALUES: [&str; 3] = ["NEAREST_NEIGHBOR", "BILINEAR", "LAGRANGE"];
const DECIMATION_VALUES: [&str; 4] = [
    "NEAREST_NEIGHBOR",
    "BILINEAR",
    "BRIGHTEST_PIXEL",
    "LAGRANGE",
];

type SchemaCell = LazyLock<Result<Arc<RecordSchema>, SchemaError>>;

static COLOR_DISPLAY_REMAP: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("ColorDisplayRemap")
        .field(
            FieldDescriptor::integer("RemapLUT")
                .collection(CollectionMode::ArrayOfScalars { columns: 3 })
                .range(IntegerRange::U16)
                .doc("N x 3 lookup table of RGB entries."),
        )
        .build()
});

static MONOCHROME_DISPLAY_REMAP: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("MonochromeDisplayRemap")
        .field(FieldDescriptor::string("RemapType").required())
        .field(
            FieldDescriptor::string("RemapParameters")
                .collection(CollectionMode::ParameterMap("RemapParameter".into()))
                .doc("Textual remap parameters, informational only."),
        )
        .field(
            FieldDescriptor::integer("RemapLUT")
                .collection(CollectionMode::ArrayOfScalars { columns: 1 })
                .range(IntegerRange::U8)
                .doc("Lookup table to log amplitude, for 8-bit data only."),
        )
        .build()
});

static REMAP_CHOICE: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("RemapChoice")
        .field(FieldDescriptor::record(
            "ColorDisplayRemap",
            color_display_remap()?,
        ))
        .field(FieldDescriptor::record(
            "MonochromeDisplayRemap",
            monochrome_display_remap()?,
        ))
        .build()
});

static MONITOR_COMPENSATION_APPLIED: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("MonitorCompensationApplied")
        .field(FieldDescriptor::float("Gamma").required())
        .field(FieldDescriptor::float("XMin").required())
        .numeric_format("Gamma", "0.16G")
        .numeric_format("XMin", "0.16G")
        .build()
});

static DRA_HISTOGRAM_OVERRIDES: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("DRAHistogramOverrides")
        .field(
            FieldDescriptor::integer("ClipMin")
                .required()
                .doc("Lower end-point of the display histogram (Pmin)."),
        )
        .field(
            FieldDescriptor::integer("ClipMax")
                .required()
                .doc("Upper end-point of the display histogram (Pmax)."),
        )
        .build()
});

static PRODUCT_DISPLAY: SchemaCell = LazyLock::new(|| {
    RecordSchema::builder("ProductDisplay")
        .field(
            FieldDescriptor::enumeration("PixelType", EnumValues::new(PIXEL_TYPE_VALUES))
                .required(),
        )
        .field(FieldDescriptor::record("RemapInformation", remap_choice()?))
        .field(FieldDescriptor::enumeration(
            "MagnificationMethod",
            EnumValues::new(MAGNIFICATION_VALUES),
        ))
        .field(FieldDescriptor::enumeration(
            "DecimationMethod",
            EnumValues::new(DECIMATION_VALUES),
        ))
        .field(FieldDescriptor::record(
            "DRAHistogramOverrides",
            dra_histogram_overrides()?,
        ))
        .field(FieldDescriptor::record(
            "MonitorCompensationApplied",
            monitor_compensation_applied()?,
        ))
        .field(
            FieldDescriptor::string("DisplayExtensions")
                .collection(CollectionMode::ParameterMap("DisplayExtension".into())),
        )
        .build()
});

/// Index-based color remap.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn color_display_remap() -> Result<Arc<RecordSchema>, SchemaError> {
    COLOR_DISPLAY_REMAP.clone()
}

/// Monochrome remap to log amplitude.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn monochrome_display_remap() -> Result<Arc<RecordSchema>, SchemaError> {
    MONOCHROME_DISPLAY_REMAP.clone()
}

/// Color or monochrome remap.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn remap_choice() -> Result<Arc<RecordSchema>, SchemaError> {
    REMAP_CHOICE.clone()
}

/// Monitor compensation pre-applied to the product.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn monitor_compensation_applied() -> Result<Arc<RecordSchema>, SchemaError> {
    MONITOR_COMPENSATION_APPLIED.clone()
}

/// Dynamic range adjustment overrides.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn dra_histogram_overrides() -> Result<Arc<RecordSchema>, SchemaError> {
    DRA_HISTOGRAM_OVERRIDES.clone()
}

/// Product display parameters.
///
/// # Errors
/// Returns `SchemaError` if the schema declaration is inconsistent.
pub fn product_display() -> Result<Arc<RecordSchema>, SchemaError> {
    PRODUCT_DISPLAY.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarmeta_schema::{Node, NodeError, Violation};

    #[test]
    fn test_schemas_build() {
        let schema = product_display().expect("Failed to build schema");
        assert_eq!(schema.len(), 7);
        let required: Vec<&str> = schema.required().collect();
        assert_eq!(required, vec!["PixelType"]);
    }

    #[test]
    fn test_color_lut_shape() {
        let mut remap = Node::new(color_display_remap().expect("Failed to build schema"));
        remap
            .set("RemapLUT", [[0, 0, 0], [255, 128, 64]])
            .expect("Failed to set");
        let lut = remap.array("RemapLUT").expect("Failed to get array");
        assert_eq!(lut.rows(), 2);
        assert_eq!(lut.columns(), 3);

        let result = remap.set("RemapLUT", [[0, 0], [1, 1]]);
        assert!(matches!(result, Err(NodeError::ShapeMismatch { columns: 3, .. })));
    }

    #[test]
    fn test_color_lut_range() {
        let mut remap = Node::new(color_display_remap().expect("Failed to build schema"));
        assert!(remap.set("RemapLUT", [[0, 0, 65_535]]).is_ok());
        let result = remap.set("RemapLUT", [[0, 0, 70_000]]);
        assert!(matches!(result, Err(NodeError::Coercion { .. })));
    }

    #[test]
    fn test_monochrome_lut_range() {
        let mut remap = Node::new(monochrome_display_remap().expect("Failed to build schema"));
        assert!(remap.set("RemapLUT", [0, 10, 255]).is_ok());
        assert!(remap.set("RemapLUT", [0, 256]).is_err());
        assert_eq!(remap.array("RemapLUT").map(|a| a.rows()), Some(3));
    }

    #[test]
    fn test_pixel_type_enum() {
        let mut display = Node::new(product_display().expect("Failed to build schema"));
        display.set("PixelType", "RGB8").expect("Failed to set");
        let violations = display.validate();
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0],
            Violation::EnumViolation { path, .. } if path == "PixelType"
        ));
    }

    #[test]
    fn test_xml_round_trip() {
        use sarmeta_xml::{XmlCodec, XmlOptions};

        let mut color = Node::new(color_display_remap().expect("Failed to build schema"));
        color
            .set("RemapLUT", [[0, 0, 0], [255, 128, 64]])
            .expect("Failed to set");
        let mut remap = Node::new(remap_choice().expect("Failed to build schema"));
        remap
            .set_record("ColorDisplayRemap", color)
            .expect("Failed to set");

        let mut display = Node::new(product_display().expect("Failed to build schema"));
        display.set("PixelType", "RGBL8U").expect("Failed to set");
        display
            .set_record("RemapInformation", remap)
            .expect("Failed to set");
        display
            .set("DRAHistogramOverrides", [10, 240])
            .expect("Failed to set");
        display
            .insert_parameter("DisplayExtensions", "Filter", "sharpen")
            .expect("Failed to insert");

        let codec = XmlCodec::new(XmlOptions::new().namespace(crate::SIDD_NAMESPACE));
        let xml = codec.to_xml_string(&display).expect("Failed to serialize");
        assert!(xml.contains(r#"<RemapLUT size="2">0,0,0 255,128,64</RemapLUT>"#));
        assert!(xml.contains(r#"<DisplayExtension name="Filter">sharpen</DisplayExtension>"#));

        let decoded = codec
            .from_xml_str(&xml, &product_display().expect("Failed to build schema"))
            .expect("Failed to deserialize");
        assert!(decoded.diagnostics.is_empty(), "{:?}", decoded.diagnostics);
        assert_eq!(decoded.node, display);
    }

    #[test]
    fn test_monochrome_xml_bad_entry_skipped() {
        use sarmeta_xml::XmlCodec;

        let xml = r#"<MonochromeDisplayRemap>
    <RemapType>LINLOG</RemapType>
    <RemapParameter name="Scale">2</RemapParameter>
    <RemapLUT size="3">0 x 255</RemapLUT>
</MonochromeDisplayRemap>"#;
        let decoded = XmlCodec::default()
            .from_xml_str(xml, &monochrome_display_remap().expect("Failed to build schema"))
            .expect("Failed to deserialize");
        let lut = decoded.node.array("RemapLUT").expect("Failed to get array");
        assert_eq!(lut.rows(), 2);
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].path(), "RemapLUT[1]");
        let params = decoded
            .node
            .parameters("RemapParameters")
            .expect("Failed to get parameters");
        assert_eq!(params.get("Scale"), Some("2"));
    }
}
