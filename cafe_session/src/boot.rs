use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::manifest::AssetManifest;
use crate::registry::{SessionRegistry, CONTROL_SCHEME_KEY, PHOTO_COUNT_KEY};

/// Location the story starts in once the loading beat finishes.
pub const FIRST_INTERACTIVE_LOCATION: &str = "street";

/// Which input sources are live for the session. Resolved once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    #[default]
    Keyboard,
    Touch,
    Both,
}

impl ControlScheme {
    pub fn keyboard_enabled(&self) -> bool {
        matches!(self, ControlScheme::Keyboard | ControlScheme::Both)
    }

    pub fn touch_enabled(&self) -> bool {
        matches!(self, ControlScheme::Touch | ControlScheme::Both)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlScheme::Keyboard => "keyboard",
            ControlScheme::Touch => "touch",
            ControlScheme::Both => "both",
        }
    }

    /// Name of the action button as shown in prompts.
    pub fn action_label(&self) -> &'static str {
        match self {
            ControlScheme::Touch => "A",
            ControlScheme::Keyboard | ControlScheme::Both => "SPACE",
        }
    }

    pub fn movement_hint(&self) -> &'static str {
        match self {
            ControlScheme::Touch => "Use on-screen controls to move",
            ControlScheme::Keyboard | ControlScheme::Both => "Use ARROW KEYS or WASD to move",
        }
    }
}

impl fmt::Display for ControlScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ControlScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keyboard" => Ok(ControlScheme::Keyboard),
            "touch" => Ok(ControlScheme::Touch),
            "both" => Ok(ControlScheme::Both),
            other => Err(format!("unknown control scheme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BootRequest {
    pub control_scheme: ControlScheme,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootSummary {
    pub session: u32,
    pub control_scheme: ControlScheme,
    pub first_location: String,
    pub stages: Vec<BootStage>,
    pub resource_counts: ResourceCounts,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResourceCounts {
    pub sprites: usize,
    pub audio_cues: usize,
    pub photos: usize,
}

#[derive(Debug, Clone, Serialize)]
pub enum BootStage {
    VerifyManifest { missing: Vec<String> },
    CountResources,
    InitializeRegistry { session: u32 },
    ResolveControls { scheme: ControlScheme },
    LoadingBeat,
    StartLocation { location: String },
}

impl BootStage {
    pub fn describe(&self) -> String {
        match self {
            BootStage::VerifyManifest { missing } => {
                if missing.is_empty() {
                    "Verify asset manifest".into()
                } else {
                    format!(
                        "Verify asset manifest ({} missing: {})",
                        missing.len(),
                        missing.join(", ")
                    )
                }
            }
            BootStage::CountResources => "Count sprites, audio cues, and photos".into(),
            BootStage::InitializeRegistry { session } => {
                format!("Initialize session registry (session {session})")
            }
            BootStage::ResolveControls { scheme } => format!("Resolve {scheme} controls"),
            BootStage::LoadingBeat => "Hold the loading screen".into(),
            BootStage::StartLocation { location } => format!("Start {location}"),
        }
    }
}

pub fn run_boot_pipeline(
    registry: &mut SessionRegistry,
    request: BootRequest,
    manifest: &AssetManifest,
) -> BootSummary {
    let mut stages = Vec::new();

    let missing: Vec<String> = manifest
        .missing_required()
        .into_iter()
        .map(str::to_string)
        .collect();
    for key in &missing {
        log::warn!("asset manifest is missing {key}; presentation will degrade");
    }
    stages.push(BootStage::VerifyManifest { missing });

    let resource_counts = ResourceCounts {
        sprites: manifest.sprites.len(),
        audio_cues: manifest.audio.len(),
        photos: manifest.photo_count(),
    };
    stages.push(BootStage::CountResources);

    registry.initialize_session();
    registry.write_int(PHOTO_COUNT_KEY, resource_counts.photos as i64);
    stages.push(BootStage::InitializeRegistry {
        session: registry.generation(),
    });

    registry.write_string(CONTROL_SCHEME_KEY, request.control_scheme.label());
    stages.push(BootStage::ResolveControls {
        scheme: request.control_scheme,
    });

    stages.push(BootStage::LoadingBeat);
    stages.push(BootStage::StartLocation {
        location: FIRST_INTERACTIVE_LOCATION.to_string(),
    });

    for stage in &stages {
        log::info!("boot: {}", stage.describe());
    }

    BootSummary {
        session: registry.generation(),
        control_scheme: request.control_scheme,
        first_location: FIRST_INTERACTIVE_LOCATION.to_string(),
        stages,
        resource_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CuriosityId, DrinkId};

    #[test]
    fn boot_initializes_registry_and_records_facts() {
        let mut registry = SessionRegistry::new();
        registry.record_choice(DrinkId::SeoulMatcha);
        registry.record_curiosity_found(CuriosityId::Piano);

        let summary = run_boot_pipeline(
            &mut registry,
            BootRequest {
                control_scheme: ControlScheme::Touch,
            },
            &AssetManifest::builtin(),
        );

        assert_eq!(registry.selected_drink(), None);
        assert!(registry.found_curiosities().is_empty());
        assert!(!registry.is_session_complete());
        assert_eq!(registry.read_int(PHOTO_COUNT_KEY), Some(52));
        assert_eq!(registry.read_string(CONTROL_SCHEME_KEY), Some("touch"));
        assert_eq!(summary.first_location, "street");
        assert_eq!(summary.resource_counts.photos, 52);
        assert!(matches!(
            summary.stages.first(),
            Some(BootStage::VerifyManifest { missing }) if missing.is_empty()
        ));
        assert!(matches!(
            summary.stages.last(),
            Some(BootStage::StartLocation { location }) if location == "street"
        ));
    }

    #[test]
    fn missing_assets_are_reported_not_fatal() {
        let mut registry = SessionRegistry::new();
        let manifest = AssetManifest {
            sprites: Vec::new(),
            audio: Vec::new(),
            photos: Vec::new(),
        };
        let summary = run_boot_pipeline(
            &mut registry,
            BootRequest {
                control_scheme: ControlScheme::Keyboard,
            },
            &manifest,
        );
        match &summary.stages[0] {
            BootStage::VerifyManifest { missing } => assert!(missing.contains(&"cafe-music".to_string())),
            other => panic!("unexpected first stage {other:?}"),
        }
        assert_eq!(summary.resource_counts.photos, 0);
    }

    #[test]
    fn control_scheme_parses_and_labels() {
        assert_eq!("Touch".parse::<ControlScheme>(), Ok(ControlScheme::Touch));
        assert!("gamepad".parse::<ControlScheme>().is_err());
        assert_eq!(ControlScheme::Touch.action_label(), "A");
        assert!(ControlScheme::Both.keyboard_enabled());
        assert!(ControlScheme::Both.touch_enabled());
        assert!(!ControlScheme::Keyboard.touch_enabled());
    }
}
