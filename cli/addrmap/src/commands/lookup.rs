//! `addrmap lookup` — search one address space for a typed address.

use std::io::Write;

use addrmap_core::{AnnotationService, Space};
use anyhow::Result;

pub fn run(service: &AnnotationService, address: &str, space: Space, out: &mut impl Write) -> Result<()> {
    let description = service.lookup(address, space)?;
    writeln!(out, "{description}")?;
    Ok(())
}
