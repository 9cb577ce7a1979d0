//! Map provider trait and repository population.
//!
//! The `MapProvider` trait abstracts over where descriptor listings come
//! from (the remote map service, a local directory, or memory).
//! [`load_repository`] performs the one-time population step: any failure
//! other than a missing hijack map is fatal.

use std::collections::HashMap;

use addrmap_core::{Descriptor, DescriptorRepository, MapKind, Normalizer};
use tracing::{info, warn};

use crate::error::{ProviderError, Result};
use crate::record::{parse_listing, Listing, RawDescriptor};

/// Source of descriptor listings.
pub trait MapProvider {
    /// Fetch the raw listing for one map.
    fn fetch_map(&self, kind: MapKind) -> Result<Listing>;

    /// Short human-readable name of the source, for logs.
    fn describe(&self) -> String;
}

/// Fetch all four maps and build an immutable repository.
pub fn load_repository(
    provider: &dyn MapProvider,
    normalizer: &Normalizer,
) -> Result<DescriptorRepository> {
    let mut maps = Vec::with_capacity(MapKind::ALL.len());
    let mut rejected = 0;
    for kind in MapKind::ALL {
        let listing = match provider.fetch_map(kind) {
            Ok(listing) => listing,
            Err(ProviderError::MissingMap { path }) if kind == MapKind::Hijacks => {
                warn!("no hijack map at {}, continuing without hijacks", path.display());
                Listing::default()
            }
            Err(e) => return Err(e),
        };
        info!(
            map = %kind,
            records = listing.records.len(),
            rejected = listing.rejected,
            source = %provider.describe(),
            "fetched map"
        );
        rejected += listing.rejected;
        let descriptors: Vec<Descriptor> = listing.records.into_iter().map(Descriptor::from).collect();
        maps.push((kind, descriptors));
    }
    let mut repository = DescriptorRepository::build(maps, normalizer);
    repository.record_skipped(rejected);
    Ok(repository)
}

/// An in-memory provider.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    maps: HashMap<MapKind, Listing>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listing for one map.
    pub fn with_map(mut self, kind: MapKind, records: Vec<RawDescriptor>) -> Self {
        self.maps.insert(kind, Listing::from(records));
        self
    }

    /// Set the listing for one map from its JSON text.
    pub fn with_json(mut self, kind: MapKind, json: &str) -> Result<Self> {
        let listing = parse_listing(json).map_err(|e| ProviderError::Decode {
            map: kind.name().to_string(),
            detail: e.to_string(),
        })?;
        self.maps.insert(kind, listing);
        Ok(self)
    }
}

impl MapProvider for StaticProvider {
    fn fetch_map(&self, kind: MapKind) -> Result<Listing> {
        Ok(self.maps.get(&kind).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
