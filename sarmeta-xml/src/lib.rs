//! # sarmeta XML
//!
//! XML codec for schema-described records.
//!
//! This crate provides:
//! - An owned [`XmlElement`] tree with namespace resolution
//! - [`read_document`] and [`write_document`] built on quick-xml
//! - [`XmlCodec`], which maps nodes to elements following their schema and
//!   back, collecting [`Diagnostic`]s for skipped malformed entries

pub mod codec;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod options;
pub mod reader;
pub mod writer;

pub use codec::{Decoded, XmlCodec};
pub use diagnostics::Diagnostic;
pub use element::XmlElement;
pub use error::XmlError;
pub use options::XmlOptions;
pub use reader::read_document;
pub use writer::write_document;
