//! Memory map data providers.
//!
//! Fetches the four descriptor listings (`ram`, `rom`, `regs`, `hijack`)
//! that populate an [`addrmap_core::DescriptorRepository`]. Supports the
//! remote map service over HTTP, a local directory of JSON files, and an
//! in-memory source for embedding and tests.

pub mod error;
pub mod http;
pub mod local;
pub mod provider;
pub mod record;

// Re-exports for convenience.
pub use error::{ProviderError, Result};
pub use http::{HttpProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use local::LocalProvider;
pub use provider::{load_repository, MapProvider, StaticProvider};
pub use record::{parse_listing, Listing, RawDescriptor};
