//! Builds a SICD image formation record, derives defaults, validates it and
//! round-trips it through XML.
//!
//! Run with: `RUST_LOG=debug cargo run --example image_formation`

use sarmeta::prelude::*;
use sarmeta::records::{
    apply_reference_frequency, derive_tx_frequency_proc, image_formation, radar_collection,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut radar = Node::new(radar_collection()?);
    radar.set("TxFrequency", [-1.5e8, 1.5e8])?;

    let mut formation = Node::new(image_formation()?);
    formation.set("RcvChanProc", RawValue::List(vec![1.into(), 1.0.into(), vec![1].into()]))?;
    formation.set("TxRcvPolarizationProc", "V:V")?;
    formation.set("TStartProc", "0")?;
    formation.set("TEndProc", 2.25)?;
    formation.set("ImageFormAlgo", "PFA")?;
    for name in ["STBeamComp", "ImageBeamComp", "AzAutofocus", "RgAutofocus"] {
        formation.set(name, "NO")?;
    }

    derive_tx_frequency_proc(&mut formation, &radar)?;
    apply_reference_frequency(&mut formation, 9.6e9)?;

    for violation in formation.validate() {
        println!("violation: {violation}");
    }

    let codec = XmlCodec::new(
        XmlOptions::new()
            .namespace(SICD_NAMESPACE)
            .indent(2)
            .declaration(true)
            .check_validity(true),
    );
    let xml = codec.to_xml_string(&formation)?;
    println!("{xml}");

    let decoded = codec.from_xml_str(&xml, formation.schema())?;
    println!(
        "round trip {} with {} diagnostics",
        if decoded.node == formation { "matches" } else { "differs" },
        decoded.diagnostics.len()
    );
    Ok(())
}
