//! Address annotation core for retro game memory maps.
//!
//! Given an address token found in assembly source, resolves it to the
//! RAM variable, hardware register or ROM location (plus any hijacks) that
//! owns it, and renders a readable description.
//!
//! # Pipeline
//!
//! - **Token parsing** ([`token`]) — window the hovered word, strip
//!   indexing suffixes, canonicalize to a 24-bit address and space
//! - **Repository** ([`repository`]) — size-ordered descriptor sequences
//!   for RAM, ROM, registers and hijacks
//! - **Resolution** ([`resolve`]) — smallest enclosing region, with
//!   overlapping hijacks for ROM
//! - **Markup** ([`markup`]) — forum markup and HTML to display text
//! - **Rendering and caching** ([`render`], [`cache`]) — formatted text,
//!   memoized per raw token
//!
//! [`AnnotationService`] ties the pipeline together.

pub mod cache;
pub mod descriptor;
pub mod error;
pub mod markup;
pub mod render;
pub mod repository;
pub mod resolve;
pub mod service;
pub mod token;

// Re-exports for convenience.
pub use cache::{CacheStats, RenderCache};
pub use descriptor::{Descriptor, DescriptorRange, MapKind, Space};
pub use error::{CoreError, Result};
pub use markup::{normalize, Normalizer};
pub use render::{Annotation, Renderer, NOTHING_FOUND};
pub use repository::{DescriptorRepository, RepositoryCounts};
pub use resolve::{resolve, Resolution};
pub use service::AnnotationService;
pub use token::{parse_token, CanonicalAddress, ParsedToken};
