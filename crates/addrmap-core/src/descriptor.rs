//! Descriptor records, address spaces and derived ranges.
//!
//! A [`Descriptor`] is one named fact about the memory map: a RAM
//! variable, a hardware register, a ROM routine or a hijack (a patch site
//! in ROM). Each descriptor is turned into a [`DescriptorRange`] with an
//! inclusive `begin` and exclusive `end` canonical address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::token::RAM_BANK;

/// One partition of the address domain, as seen by a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    Ram,
    Rom,
    Register,
}

impl Space {
    /// Hex digits used when printing an address in this space.
    pub fn pad_width(self) -> usize {
        match self {
            Space::Register => 4,
            Space::Ram | Space::Rom => 6,
        }
    }

    /// Region name used in detail links.
    pub fn region(self) -> &'static str {
        match self {
            Space::Rom => "rom",
            Space::Ram | Space::Register => "ram",
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Space::Ram => "ram",
            Space::Rom => "rom",
            Space::Register => "register",
        };
        f.write_str(name)
    }
}

impl FromStr for Space {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ram" => Ok(Space::Ram),
            "rom" => Ok(Space::Rom),
            "register" | "regs" | "reg" => Ok(Space::Register),
            other => Err(format!("unknown address space '{other}' (expected ram, rom or register)")),
        }
    }
}

/// The four descriptor sequences published by a map provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    Ram,
    Rom,
    Registers,
    Hijacks,
}

impl MapKind {
    /// Every map kind, in load order.
    pub const ALL: [MapKind; 4] = [
        MapKind::Ram,
        MapKind::Rom,
        MapKind::Registers,
        MapKind::Hijacks,
    ];

    /// Provider-side name of this map.
    pub fn name(self) -> &'static str {
        match self {
            MapKind::Ram => "ram",
            MapKind::Rom => "rom",
            MapKind::Registers => "regs",
            MapKind::Hijacks => "hijack",
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named region or fact about the address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Address literal with a one-character prefix, e.g. `$7E0019`.
    pub address: String,
    /// Byte count, always at least 1.
    pub size: u32,
    /// Free-text classification.
    pub context: Option<String>,
    /// Type tag.
    pub kind: String,
    /// Annotation text. Holds forum markup until the repository
    /// normalizes it.
    pub description: String,
    /// Detail id to label, for enumerated values and bitfields.
    pub details: Option<Vec<(String, String)>>,
}

impl Descriptor {
    /// Create a descriptor with no context, type or details.
    ///
    /// A `size` of zero is raised to one.
    pub fn new(address: impl Into<String>, size: u32, description: impl Into<String>) -> Self {
        Descriptor {
            address: address.into(),
            size: size.max(1),
            context: None,
            kind: String::new(),
            description: description.into(),
            details: None,
        }
    }

    /// Attach detail links.
    pub fn with_details<I, K, V>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let details: Vec<(String, String)> = details
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.details = if details.is_empty() { None } else { Some(details) };
        self
    }

    /// Parse the canonical start address.
    pub fn begin(&self) -> Result<u32> {
        parse_prefixed_hex(&self.address)
    }
}

/// Parse a hex literal after dropping its one-character lifetime prefix.
pub fn parse_prefixed_hex(address: &str) -> Result<u32> {
    let mut chars = address.chars();
    if chars.next().is_none() {
        return Err(CoreError::InvalidDescriptor {
            address: address.to_string(),
            detail: "empty address".into(),
        });
    }
    let digits = chars.as_str();
    u32::from_str_radix(digits, 16).map_err(|e| CoreError::InvalidDescriptor {
        address: address.to_string(),
        detail: e.to_string(),
    })
}

/// Digits after the one-character prefix.
fn hex_digits(address: &str) -> usize {
    address.chars().skip(1).count()
}

/// A descriptor together with its `[begin, end)` address range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRange {
    begin: u32,
    end: u32,
    descriptor: Descriptor,
}

impl DescriptorRange {
    /// Derive the range of a descriptor.
    pub fn new(descriptor: Descriptor) -> Result<Self> {
        let begin = descriptor.begin()?;
        let size = descriptor.size.max(1);
        let end = begin
            .checked_add(size)
            .ok_or_else(|| CoreError::InvalidDescriptor {
                address: descriptor.address.clone(),
                detail: format!("size {size} overflows the address space"),
            })?;
        Ok(DescriptorRange {
            begin,
            end,
            descriptor,
        })
    }

    /// Derive the range of a descriptor published in `kind`'s map.
    ///
    /// RAM maps may list short (up to four digit) addresses; those live
    /// in bank `7E`, the same inference the token parser applies.
    pub fn in_map(kind: MapKind, descriptor: Descriptor) -> Result<Self> {
        let mut range = DescriptorRange::new(descriptor)?;
        if kind == MapKind::Ram && hex_digits(&range.descriptor.address) <= 4 {
            let size = range.end - range.begin;
            range.begin |= RAM_BANK;
            range.end = range.begin.checked_add(size).ok_or_else(|| CoreError::InvalidDescriptor {
                address: range.descriptor.address.clone(),
                detail: format!("size {size} overflows the address space"),
            })?;
        }
        Ok(range)
    }

    /// Inclusive start address.
    pub fn begin(&self) -> u32 {
        self.begin
    }

    /// Exclusive end address.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Inclusive last address.
    pub fn last(&self) -> u32 {
        self.end - 1
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn size(&self) -> u32 {
        self.descriptor.size
    }

    /// Whether `address` falls inside `[begin, end)`.
    pub fn contains(&self, address: u32) -> bool {
        address >= self.begin && address < self.end
    }

    pub(crate) fn descriptor_mut(&mut self) -> &mut Descriptor {
        &mut self.descriptor
    }
}
