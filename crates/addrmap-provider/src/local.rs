//! Local directory map provider.
//!
//! Layout mirrors the remote map names:
//! ```text
//! <dir>/
//!   smwram.json
//!   smwrom.json
//!   smwregs.json
//!   smwhijack.json   — optional
//! ```

use std::path::PathBuf;

use addrmap_core::MapKind;

use crate::error::{ProviderError, Result};
use crate::provider::MapProvider;
use crate::record::{parse_listing, Listing};

/// Map provider reading JSON listings from a directory.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    dir: PathBuf,
    game: String,
}

impl LocalProvider {
    pub fn new(dir: impl Into<PathBuf>, game: impl Into<String>) -> Self {
        LocalProvider {
            dir: dir.into(),
            game: game.into(),
        }
    }

    /// Path of one map listing.
    pub fn map_path(&self, kind: MapKind) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.game, kind.name()))
    }
}

impl MapProvider for LocalProvider {
    fn fetch_map(&self, kind: MapKind) -> Result<Listing> {
        let path = self.map_path(kind);
        if !path.is_file() {
            return Err(ProviderError::MissingMap { path });
        }
        let content = std::fs::read_to_string(&path)?;
        parse_listing(&content).map_err(|e| ProviderError::Decode {
            map: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::provider::load_repository;
    use addrmap_core::Normalizer;

    fn write_maps(dir: &Path, with_hijacks: bool) {
        std::fs::write(
            dir.join("smwram.json"),
            r#"[{"address": "$7E0019", "size": 1, "description": "Powerup"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("smwrom.json"),
            r#"[{"address": "$008000", "size": 16, "description": "Reset"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("smwregs.json"),
            r#"[{"address": "$2100", "size": 1, "description": "INIDISP"}]"#,
        )
        .unwrap();
        if with_hijacks {
            std::fs::write(
                dir.join("smwhijack.json"),
                r#"[{"address": "$008004", "size": 4, "description": "Patch"}]"#,
            )
            .unwrap();
        }
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_maps(dir.path(), true);
        let provider = LocalProvider::new(dir.path(), "smw");
        let repo = load_repository(&provider, &Normalizer::default()).unwrap();
        let counts = repo.counts();
        assert_eq!((counts.ram, counts.rom, counts.registers, counts.hijacks), (1, 1, 1, 1));
    }

    #[test]
    fn hijack_map_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        write_maps(dir.path(), false);
        let provider = LocalProvider::new(dir.path(), "smw");
        let repo = load_repository(&provider, &Normalizer::default()).unwrap();
        assert_eq!(repo.counts().hijacks, 0);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn missing_ram_map_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalProvider::new(dir.path(), "smw");
        let err = load_repository(&provider, &Normalizer::default()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingMap { .. }));
    }

    #[test]
    fn malformed_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("smwram.json"), "not json").unwrap();
        let provider = LocalProvider::new(dir.path(), "smw");
        assert!(matches!(
            provider.fetch_map(MapKind::Ram),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[test]
    fn unreadable_record_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_maps(dir.path(), false);
        std::fs::write(
            dir.path().join("smwregs.json"),
            r#"[{"address": "$2100", "size": 1, "description": "INIDISP"}, {"address": null}]"#,
        )
        .unwrap();
        let provider = LocalProvider::new(dir.path(), "smw");
        let repo = load_repository(&provider, &Normalizer::default()).unwrap();
        assert_eq!(repo.counts().registers, 1);
        assert_eq!(repo.counts().skipped, 1);
    }

    #[test]
    fn map_paths_use_game_prefix() {
        let provider = LocalProvider::new("/maps", "yi");
        assert_eq!(provider.map_path(MapKind::Registers), PathBuf::from("/maps/yiregs.json"));
    }
}
