use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Audio cues the locations ask for by name.
pub const REQUIRED_AUDIO_CUES: &[&str] = &[
    "cafe-music",
    "cafe-chatter",
    "birthday-music",
    "coffee-brewing",
    "menu-click",
    "confetti-pop",
];

/// Actor textures the movement controller can select.
pub const REQUIRED_ACTOR_SPRITES: &[&str] = &[
    "idle-up",
    "idle-down",
    "idle-left",
    "idle-right",
    "walk-up-1",
    "walk-up-2",
    "walk-down-1",
    "walk-down-2",
    "walk-left-1",
    "walk-left-2",
    "walk-right-1",
    "walk-right-2",
];

const BUILTIN_PHOTO_COUNT: usize = 52;

/// Keys of everything the presentation layer preloads. The core never reads
/// the assets themselves; it only needs the names and the photo count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub sprites: Vec<String>,
    pub audio: Vec<String>,
    pub photos: Vec<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AssetManifest {
    pub fn builtin() -> Self {
        let mut sprites: Vec<String> = REQUIRED_ACTOR_SPRITES
            .iter()
            .map(|key| key.to_string())
            .collect();
        sprites.extend(
            [
                "barista",
                "cafe-floor",
                "cafe-wall",
                "cafe-counter-register",
                "cafe-back-counter",
                "cafe-pastry-stand",
                "cafe-plant",
                "cafe-plant2",
                "cafe-table-chairs",
                "sitting-table",
            ]
            .iter()
            .map(|key| key.to_string()),
        );
        Self {
            sprites,
            audio: REQUIRED_AUDIO_CUES
                .iter()
                .map(|cue| cue.to_string())
                .collect(),
            photos: (0..BUILTIN_PHOTO_COUNT)
                .map(|index| format!("photo-{index}"))
                .collect(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read asset manifest: {}", path.display()))?;
        let manifest: AssetManifest = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse asset manifest json: {}", path.display()))?;
        manifest.check_unique(path)?;
        Ok(manifest)
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Required keys the manifest does not provide. Missing entries only
    /// degrade presentation, so callers log them rather than fail.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let sprites: BTreeSet<&str> = self.sprites.iter().map(String::as_str).collect();
        let audio: BTreeSet<&str> = self.audio.iter().map(String::as_str).collect();
        REQUIRED_ACTOR_SPRITES
            .iter()
            .filter(|key| !sprites.contains(*key))
            .chain(REQUIRED_AUDIO_CUES.iter().filter(|cue| !audio.contains(*cue)))
            .copied()
            .collect()
    }

    fn check_unique(&self, path: &Path) -> Result<(), SessionError> {
        for (label, keys) in [
            ("sprite", &self.sprites),
            ("audio", &self.audio),
            ("photo", &self.photos),
        ] {
            let mut seen = BTreeSet::new();
            if let Some(duplicate) = keys.iter().find(|key| !seen.insert(key.as_str())) {
                return Err(SessionError::InvalidManifest {
                    path: path.to_path_buf(),
                    reason: format!("duplicate {label} key {duplicate}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_manifest_is_complete() {
        let manifest = AssetManifest::builtin();
        assert!(manifest.missing_required().is_empty());
        assert_eq!(manifest.photo_count(), BUILTIN_PHOTO_COUNT);
    }

    #[test]
    fn manifest_loads_from_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("manifest.json");
        fs::write(
            &path,
            r#"{"sprites": ["idle-down"], "audio": ["cafe-music"], "photos": ["a", "b", "c"]}"#,
        )?;
        let manifest = AssetManifest::from_json_file(&path)?;
        assert_eq!(manifest.photo_count(), 3);
        let missing = manifest.missing_required();
        assert!(missing.contains(&"walk-left-1"));
        assert!(missing.contains(&"confetti-pop"));
        assert!(!missing.contains(&"cafe-music"));
        Ok(())
    }

    #[test]
    fn duplicate_keys_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("manifest.json");
        fs::write(
            &path,
            r#"{"sprites": [], "audio": ["cafe-music", "cafe-music"], "photos": []}"#,
        )?;
        let err = AssetManifest::from_json_file(&path).expect_err("duplicate audio cue");
        assert!(err.to_string().contains("duplicate audio key cafe-music"));
        Ok(())
    }
}
