//! Canonical address to descriptor resolution.

use crate::descriptor::{DescriptorRange, MapKind};
use crate::repository::DescriptorRepository;
use crate::token::CanonicalAddress;

/// Descriptors that own one canonical address.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub address: CanonicalAddress,
    /// Most specific descriptor, if any.
    pub primary: Option<&'a DescriptorRange>,
    /// The primary is a hijack promoted because no ROM descriptor matched.
    pub primary_is_hijack: bool,
    /// Other hijacks touching the address, in scan order.
    pub hijacks: Vec<&'a DescriptorRange>,
}

impl Resolution<'_> {
    /// Nothing owns the address.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.hijacks.is_empty()
    }
}

/// First range in `sequence` containing `address`.
pub fn first_match(sequence: &[DescriptorRange], address: u32) -> Option<&DescriptorRange> {
    sequence.iter().find(|range| range.contains(address))
}

/// Every range in `sequence` containing `address`, in sequence order.
pub fn all_matches(sequence: &[DescriptorRange], address: u32) -> Vec<&DescriptorRange> {
    sequence
        .iter()
        .filter(|range| range.contains(address))
        .collect()
}

/// Resolve a canonical address against the repository.
///
/// RAM and register addresses take the first (smallest) enclosing
/// descriptor. ROM addresses additionally collect every overlapping
/// hijack; when no ROM descriptor matches, the last of those hijacks is
/// promoted to primary.
pub fn resolve(repo: &DescriptorRepository, address: CanonicalAddress) -> Resolution<'_> {
    let value = address.value();
    match address {
        CanonicalAddress::Ram(_) => Resolution {
            address,
            primary: first_match(repo.sequence(MapKind::Ram), value),
            primary_is_hijack: false,
            hijacks: Vec::new(),
        },
        CanonicalAddress::Register(_) => Resolution {
            address,
            primary: first_match(repo.sequence(MapKind::Registers), value),
            primary_is_hijack: false,
            hijacks: Vec::new(),
        },
        CanonicalAddress::Rom(_) => {
            let mut hijacks = all_matches(repo.sequence(MapKind::Hijacks), value);
            match first_match(repo.sequence(MapKind::Rom), value) {
                Some(primary) => Resolution {
                    address,
                    primary: Some(primary),
                    primary_is_hijack: false,
                    hijacks,
                },
                None => {
                    let promoted = hijacks.pop();
                    Resolution {
                        address,
                        primary: promoted,
                        primary_is_hijack: promoted.is_some(),
                        hijacks,
                    }
                }
            }
        }
    }
}
