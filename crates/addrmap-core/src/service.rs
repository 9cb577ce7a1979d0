//! The annotation service: hover resolution over a loaded map.
//!
//! One [`AnnotationService`] lives for a whole session. It owns the
//! immutable repository and a render cache behind a mutex, so lookups can
//! run from several threads.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use tracing::{debug, trace};

use crate::cache::{CacheStats, RenderCache};
use crate::descriptor::{MapKind, Space};
use crate::error::{CoreError, Result};
use crate::render::{Annotation, Renderer, NOTHING_FOUND};
use crate::repository::DescriptorRepository;
use crate::resolve::{first_match, resolve};
use crate::token::{self, CanonicalAddress};

static SEARCH_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?([0-9A-Fa-f]{1,6})$").expect("valid search input regex")
});

/// Resolves address tokens to rendered annotations.
#[derive(Debug)]
pub struct AnnotationService {
    repository: DescriptorRepository,
    renderer: Renderer,
    cache: Mutex<RenderCache>,
}

impl AnnotationService {
    pub fn new(repository: DescriptorRepository, renderer: Renderer, cache_capacity: usize) -> Self {
        AnnotationService {
            repository,
            renderer,
            cache: Mutex::new(RenderCache::new(cache_capacity)),
        }
    }

    pub fn repository(&self) -> &DescriptorRepository {
        &self.repository
    }

    /// Annotate the address token under `cursor` in `text`.
    ///
    /// Returns `None` when no address token is recognized. A recognized
    /// address that nothing owns renders as `Nothing found`.
    pub fn resolve_hover(&self, text: &str, cursor: usize) -> Option<String> {
        let parsed = match token::parse_token(text, cursor) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return None,
            Err(e) => {
                debug!("ignoring hover token: {e}");
                return None;
            }
        };

        if let Some(hit) = self.cache.lock().lookup(&parsed.raw) {
            trace!(token = %parsed.raw, "render cache hit");
            return Some(hit);
        }

        let rendered = self.annotate(parsed.address).render();
        debug!(token = %parsed.raw, address = %parsed.address.to_literal(), "rendered annotation");
        self.cache.lock().store(parsed.raw, rendered.clone());
        Some(rendered)
    }

    /// Resolve and describe a canonical address, bypassing the cache.
    pub fn annotate(&self, address: CanonicalAddress) -> Annotation {
        self.renderer.annotate(&resolve(&self.repository, address))
    }

    /// Search one space for a typed address.
    ///
    /// Input is hex with an optional `$`. Up to four digits are read as a
    /// bank-local address (`7E` for RAM, `00` for ROM). Returns the owning
    /// description, `Nothing found`, or an empty string for empty input.
    pub fn lookup(&self, input: &str, space: Space) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(String::new());
        }
        let caps = SEARCH_INPUT
            .captures(input)
            .ok_or_else(|| CoreError::InvalidAddress {
                input: input.to_string(),
            })?;

        let mut digits = format!("{:0>4}", &caps[1]);
        if digits.len() == 4 {
            match space {
                Space::Ram => digits.insert_str(0, "7E"),
                Space::Rom => digits.insert_str(0, "00"),
                Space::Register => {}
            }
        }
        let address = u32::from_str_radix(&digits, 16).map_err(|_| CoreError::InvalidAddress {
            input: input.to_string(),
        })?;

        let kind = match space {
            Space::Ram => MapKind::Ram,
            Space::Rom => MapKind::Rom,
            Space::Register => MapKind::Registers,
        };
        Ok(first_match(self.repository.sequence(kind), address)
            .map(|range| range.descriptor().description.clone())
            .unwrap_or_else(|| NOTHING_FOUND.to_string()))
    }

    /// Empty the render cache.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
        debug!("render cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().statistics()
    }
}
