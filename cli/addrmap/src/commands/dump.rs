//! `addrmap dump` — summarize or list the loaded maps.

use std::io::Write;

use addrmap_core::{DescriptorRepository, MapKind, Space};
use anyhow::{bail, Result};
use serde_json::json;

/// Parse a map name as used on the provider (`ram`, `rom`, `regs`, `hijack`).
pub fn parse_map(name: &str) -> Result<MapKind> {
    match MapKind::ALL.into_iter().find(|kind| kind.name() == name) {
        Some(kind) => Ok(kind),
        None => bail!("unknown map '{name}' (expected ram, rom, regs or hijack)"),
    }
}

/// Print per-map counts, or every range of one map.
pub fn run(repository: &DescriptorRepository, map: Option<MapKind>, json: bool, out: &mut impl Write) -> Result<()> {
    match map {
        None => {
            let counts = repository.counts();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&counts)?)?;
            } else {
                writeln!(out, "ram      {}", counts.ram)?;
                writeln!(out, "rom      {}", counts.rom)?;
                writeln!(out, "regs     {}", counts.registers)?;
                writeln!(out, "hijack   {}", counts.hijacks)?;
                writeln!(out, "skipped  {}", counts.skipped)?;
            }
        }
        Some(kind) => {
            let width = match kind {
                MapKind::Registers => Space::Register.pad_width(),
                _ => Space::Ram.pad_width(),
            };
            let ranges = repository.sequence(kind);
            if json {
                let entries: Vec<_> = ranges
                    .iter()
                    .map(|range| {
                        json!({
                            "address": range.descriptor().address,
                            "begin": range.begin(),
                            "size": range.size(),
                            "description": range.descriptor().description,
                        })
                    })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
            } else {
                for range in ranges {
                    writeln!(
                        out,
                        "${:0w$X}-${:0w$X}  {}",
                        range.begin(),
                        range.last(),
                        first_line(&range.descriptor().description),
                        w = width
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
