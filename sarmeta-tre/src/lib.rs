//! # sarmeta TRE
//!
//! Fixed-width codec for NITF tagged record extensions.
//!
//! This crate provides:
//! - [`encode_record`] and [`decode_record`] driven by a
//!   [`BinaryLayout`](sarmeta_schema::BinaryLayout)
//! - The [`TreExtension`] envelope and [`parse_extensions`] for locating
//!   extensions in a header extension area
//! - [`TreRegistry`] routing extensions to layouts by tag

pub mod codec;
pub mod error;
pub mod extension;
pub mod options;
pub mod registry;

pub use codec::{EncodedRecord, Truncation, decode_record, encode_record};
pub use error::TreError;
pub use extension::{TreExtension, parse_extensions};
pub use options::{TreOptions, TruncationPolicy};
pub use registry::{DecodedExtension, TreRegistry};
