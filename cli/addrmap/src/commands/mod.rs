//! CLI command implementations.

pub mod dump;
pub mod hover;
pub mod lookup;
pub mod serve;

use std::time::Duration;

use addrmap_core::{AnnotationService, Normalizer, Renderer};
use addrmap_provider::{load_repository, HttpProvider, LocalProvider, MapProvider};
use anyhow::{Context, Result};
use tracing::info;

use crate::config::{AddrmapConfig, ProviderSource};

/// Construct the provider named by the configuration.
pub fn build_provider(config: &AddrmapConfig) -> Result<Box<dyn MapProvider>> {
    let provider = &config.provider;
    match provider.source {
        ProviderSource::Http => {
            let http = HttpProvider::new(
                provider.base_url.clone(),
                provider.game.clone(),
                Duration::from_secs(provider.timeout_secs),
            )
            .context("creating HTTP client")?;
            Ok(Box::new(http))
        }
        ProviderSource::Local => {
            let dir = provider
                .dir
                .clone()
                .context("provider.source is \"local\" but provider.dir is not set")?;
            Ok(Box::new(LocalProvider::new(dir, provider.game.clone())))
        }
    }
}

/// Load all maps and build a ready-to-query service.
pub fn build_service(config: &AddrmapConfig, provider: &dyn MapProvider) -> Result<AnnotationService> {
    let normalizer = Normalizer::new(config.links.profile_url.clone());
    let repository = load_repository(provider, &normalizer)
        .with_context(|| format!("loading memory maps from {}", provider.describe()))?;
    let counts = repository.counts();
    info!(
        ram = counts.ram,
        rom = counts.rom,
        regs = counts.registers,
        hijacks = counts.hijacks,
        skipped = counts.skipped,
        "repository ready"
    );
    let renderer = Renderer::new(config.provider.game.clone(), config.links.detail_url.clone());
    Ok(AnnotationService::new(repository, renderer, config.cache.capacity))
}
