//! `CSCCGA` cloud cover grid extension.

use sarmeta_schema::{BinaryLayout, SchemaError};
use std::sync::{Arc, LazyLock};

/// Extension tag.
pub const CSCCGA_TAG: &str = "CSCCGA";

/// Record length in bytes.
pub const CSCCGA_LENGTH: usize = 60;

static CSCCGA: LazyLock<Result<Arc<BinaryLayout>, SchemaError>> = LazyLock::new(|| {
    BinaryLayout::builder(CSCCGA_TAG)
        .text("CCG_SOURCE", 18)
        .text("REG_SENSOR", 6)
        .unsigned("ORIGIN_LINE", 7)
        .unsigned("ORIGIN_SAMPLE", 5)
        .unsigned("AS_CELL_SIZE", 7)
        .unsigned("CS_CELL_SIZE", 5)
        .unsigned("CCG_MAX_LINE", 7)
        .unsigned("CCG_MAX_SAMPLE", 5)
        .length(CSCCGA_LENGTH)
        .build()
});

/// Cloud cover grid layout.
///
/// # Errors
/// Returns `SchemaError` if the layout declaration is inconsistent.
pub fn csccga() -> Result<Arc<BinaryLayout>, SchemaError> {
    CSCCGA.clone()
}
