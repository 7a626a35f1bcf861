// Publishing Desk Library - projects, print spines and the publish wizard
// This exposes the core components for testing and integration

pub mod assets;
pub mod channels;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod events;
pub mod isbn;
pub mod persistence;
pub mod project;
pub mod spine;
pub mod telemetry;
pub mod wizard;

// Re-export key types for easy access
pub use assets::{AssetKind, CoverAsset, CoverAssetStore, InMemoryCoverAssetStore};
pub use channels::{channel_rule, Channel, ChannelFormat, ChannelRule};
pub use config::PublishingDeskConfig;
pub use delivery::{DeliveryManifest, DeliveryPhase, DeliverySimulator, DeliveryTimer};
pub use events::ProjectEvent;
pub use isbn::{is_valid_isbn13, isbn_state, Isbn13, IsbnError, IsbnState};
pub use persistence::{InMemoryProjectStore, JsonFileProjectStore, PersistenceError, ProjectStore};
pub use project::{Chapter, Project};
pub use spine::{
    spine_width, NodeStatus, PaperStock, SpineDimensions, SpineNode, SpineNodeId, SpineProgress,
};
pub use telemetry::{create_command_span, generate_correlation_id, init_telemetry};
pub use wizard::{PublicationSettings, WizardEvent, WizardSession, WizardStep};
