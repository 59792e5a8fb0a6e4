//! # sarmeta Records
//!
//! Record definitions built on the sarmeta schema engine.
//!
//! This crate provides:
//! - SICD image formation records and the radar collection band they derive
//!   defaults from
//! - SIDD 1.0 product display records
//! - The `CSCCGA` NITF extension layout
//!
//! Every definition is built once on first use and shared afterwards.

pub mod csccga;
pub mod image_formation;
pub mod product_display;
pub mod radar_collection;

/// Default namespace of SICD 1.2.1 documents.
pub const SICD_NAMESPACE: &str = "urn:SICD:1.2.1";

/// Default namespace of SIDD 1.0 documents.
pub const SIDD_NAMESPACE: &str = "urn:SIDD:1.0.0";

pub use csccga::{CSCCGA_LENGTH, CSCCGA_TAG, csccga};
pub use image_formation::{
    APPLY_REFERENCE_FREQUENCY, DERIVE_TX_FREQUENCY_PROC, apply_reference_frequency,
    derive_tx_frequency_proc, image_formation,
};
pub use product_display::product_display;
pub use radar_collection::radar_collection;
