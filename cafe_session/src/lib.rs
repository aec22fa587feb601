pub mod boot;
pub mod content;
pub mod error;
pub mod manifest;
pub mod registry;

pub use boot::{run_boot_pipeline, BootRequest, BootStage, BootSummary, ControlScheme};
pub use content::{CuriosityId, DrinkId, CURIOSITY_COUNT};
pub use error::SessionError;
pub use manifest::AssetManifest;
pub use registry::{CuriosityRecord, RegistrySnapshot, SessionRegistry};
