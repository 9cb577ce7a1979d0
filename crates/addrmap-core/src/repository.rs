//! In-memory descriptor repository.
//!
//! Holds one ordered sequence of [`DescriptorRange`] per [`MapKind`].
//! Sequences are sorted by descriptor size ascending (ties by earliest
//! `begin`), so a first-match scan finds the most specific region.
//! Descriptions are normalized while the repository is built, and the
//! repository is read-only afterwards.

use serde::Serialize;
use tracing::{debug, warn};

use crate::descriptor::{Descriptor, DescriptorRange, MapKind};
use crate::markup::Normalizer;

/// Per-kind descriptor counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryCounts {
    pub ram: usize,
    pub rom: usize,
    pub registers: usize,
    pub hijacks: usize,
    /// Records dropped because their address did not parse.
    pub skipped: usize,
}

/// The four descriptor sequences of one memory map.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRepository {
    ram: Vec<DescriptorRange>,
    rom: Vec<DescriptorRange>,
    registers: Vec<DescriptorRange>,
    hijacks: Vec<DescriptorRange>,
    skipped: usize,
}

impl DescriptorRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from raw descriptor lists.
    ///
    /// Descriptors whose address does not parse are skipped with a
    /// warning. Every description is normalized with `normalizer`.
    pub fn build<I>(maps: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = (MapKind, Vec<Descriptor>)>,
    {
        let mut repo = DescriptorRepository::new();
        for (kind, descriptors) in maps {
            let total = descriptors.len();
            let mut ranges = Vec::with_capacity(total);
            for descriptor in descriptors {
                match DescriptorRange::in_map(kind, descriptor) {
                    Ok(mut range) => {
                        let desc = range.descriptor_mut();
                        desc.description = normalizer.normalize(&desc.description);
                        ranges.push(range);
                    }
                    Err(e) => {
                        warn!(map = %kind, "skipping descriptor: {e}");
                        repo.skipped += 1;
                    }
                }
            }
            debug!(map = %kind, loaded = ranges.len(), total, "indexed descriptors");
            repo.sequence_mut(kind).extend(ranges);
        }
        for kind in MapKind::ALL {
            repo.sequence_mut(kind)
                .sort_by_key(|range| (range.size(), range.begin()));
        }
        repo
    }

    /// Count records that were dropped before they reached [`build`](Self::build).
    pub fn record_skipped(&mut self, count: usize) {
        self.skipped += count;
    }

    /// The ordered sequence for one map kind.
    pub fn sequence(&self, kind: MapKind) -> &[DescriptorRange] {
        match kind {
            MapKind::Ram => &self.ram,
            MapKind::Rom => &self.rom,
            MapKind::Registers => &self.registers,
            MapKind::Hijacks => &self.hijacks,
        }
    }

    fn sequence_mut(&mut self, kind: MapKind) -> &mut Vec<DescriptorRange> {
        match kind {
            MapKind::Ram => &mut self.ram,
            MapKind::Rom => &mut self.rom,
            MapKind::Registers => &mut self.registers,
            MapKind::Hijacks => &mut self.hijacks,
        }
    }

    pub fn counts(&self) -> RepositoryCounts {
        RepositoryCounts {
            ram: self.ram.len(),
            rom: self.rom.len(),
            registers: self.registers.len(),
            hijacks: self.hijacks.len(),
            skipped: self.skipped,
        }
    }

    /// Total number of indexed descriptors.
    pub fn len(&self) -> usize {
        self.ram.len() + self.rom.len() + self.registers.len() + self.hijacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(maps: Vec<(MapKind, Vec<Descriptor>)>) -> DescriptorRepository {
        DescriptorRepository::build(maps, &Normalizer::default())
    }

    #[test]
    fn sequences_sorted_by_size_then_begin() {
        let repo = build(vec![(
            MapKind::Ram,
            vec![
                Descriptor::new("$7E0000", 8192, "Low RAM"),
                Descriptor::new("$7E0019", 1, "Powerup"),
                Descriptor::new("$7E0010", 1, "Lag flag"),
                Descriptor::new("$7E0100", 16, "Mode"),
            ],
        )]);
        let order: Vec<&str> = repo
            .sequence(MapKind::Ram)
            .iter()
            .map(|r| r.descriptor().description.as_str())
            .collect();
        assert_eq!(order, vec!["Lag flag", "Powerup", "Mode", "Low RAM"]);
    }

    #[test]
    fn descriptions_are_normalized_at_build() {
        let repo = build(vec![(
            MapKind::Rom,
            vec![Descriptor::new("$008000", 4, "[url=https://x.test]Reset[/url]\nvector")],
        )]);
        let range = &repo.sequence(MapKind::Rom)[0];
        assert_eq!(range.descriptor().description, "[Reset](https://x.test)\n\nvector");
    }

    #[test]
    fn invalid_descriptors_are_skipped() {
        let repo = build(vec![(
            MapKind::Registers,
            vec![
                Descriptor::new("$2100", 1, "INIDISP"),
                Descriptor::new("$ZZZZ", 1, "broken"),
            ],
        )]);
        let counts = repo.counts();
        assert_eq!(counts.registers, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn empty_repository() {
        let repo = DescriptorRepository::new();
        assert!(repo.is_empty());
        for kind in MapKind::ALL {
            assert!(repo.sequence(kind).is_empty());
        }
    }
}
