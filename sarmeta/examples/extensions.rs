//! Encodes a `CSCCGA` extension, frames it with an unknown extension and
//! decodes the area through a registry.
//!
//! Run with: `RUST_LOG=debug cargo run --example extensions`

use sarmeta::prelude::*;
use sarmeta::records::csccga;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let layout = csccga()?;
    let mut registry = TreRegistry::new();
    registry.register(layout.clone());

    let mut grid = Node::new(layout.schema().clone());
    grid.set("CCG_SOURCE", "CLOUD MASK")?;
    grid.set("REG_SENSOR", "EO")?;
    grid.set("ORIGIN_LINE", 0)?;
    grid.set("ORIGIN_SAMPLE", 0)?;
    grid.set("AS_CELL_SIZE", 1000)?;
    grid.set("CS_CELL_SIZE", 1000)?;
    grid.set("CCG_MAX_LINE", 512)?;
    grid.set("CCG_MAX_SAMPLE", 512)?;

    let mut area = Vec::new();
    if let Some((extension, _)) = registry.encode(&grid, &TreOptions::new())? {
        area.extend_from_slice(&extension.to_bytes()?);
    }
    area.extend_from_slice(&TreExtension::new("PIAIMC", &b"opaque"[..]).to_bytes()?);
    println!("{}", String::from_utf8_lossy(&area));

    for decoded in registry.decode_all(&area)? {
        match decoded {
            DecodedExtension::Known(node) => println!("{node:?}"),
            DecodedExtension::Unknown(ext) => {
                println!("{}: {} raw bytes", ext.tag, ext.data.len());
            }
        }
    }
    Ok(())
}
