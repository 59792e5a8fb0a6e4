//! # sarmeta
//!
//! Schema-driven codec for geospatial sensor-imagery metadata.
//!
//! Record types are declared as data: a table of typed fields with
//! cardinality, required flags, numeric formats, enumerated value sets,
//! cross-field rules and derivation hooks. Every declared record gains
//! coercing construction, XML and fixed-width binary codecs, and validation.
//!
//! ## Features
//!
//! - **Lenient coercion** - Fields accept text, numbers, pairs, dates and lists
//! - **XML codec** - Namespaced SICD/SIDD-style elements with arrays, repeated
//!   children and parameter maps
//! - **Fixed-width codec** - NITF tagged record extensions with justified,
//!   padded fields
//! - **Validation** - Required fields, enumerations and cross-field rules,
//!   reported as values
//!
//! ## Quick Start
//!
//! ```ignore
//! use sarmeta::prelude::*;
//!
//! let schema = sarmeta::records::image_formation()?;
//! let mut node = Node::new(schema);
//! node.set("TStartProc", 0.0)?;
//! node.set("TEndProc", "2.5")?;
//!
//! let codec = XmlCodec::new(XmlOptions::new().namespace(SICD_NAMESPACE));
//! let xml = codec.to_xml_string(&node)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Primitive kinds, coercion, numeric formatting, byte cursors
//! - [`schema`] - Field descriptors, record schemas, nodes, validation
//! - [`xml`] - XML element tree, reader, writer and record codec
//! - [`tre`] - Fixed-width record codec and extension envelope
//! - [`records`] - SICD, SIDD and NITF record definitions

pub mod prelude;

/// Primitive values and coercion.
pub mod core {
    pub use sarmeta_core::*;
}

/// Record schemas, nodes and validation.
pub mod schema {
    pub use sarmeta_schema::*;
}

/// XML codec.
pub mod xml {
    pub use sarmeta_xml::*;
}

/// Fixed-width tagged record extension codec.
pub mod tre {
    pub use sarmeta_tre::*;
}

/// Record definitions.
pub mod records {
    pub use sarmeta_records::*;
}

pub use sarmeta_schema::{Node, RecordSchema, Strictness, Violation};
pub use sarmeta_tre::{TreOptions, decode_record, encode_record};
pub use sarmeta_xml::{XmlCodec, XmlOptions};
