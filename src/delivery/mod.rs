//! Simulated delivery: six cosmetic phases advanced by a cancelable timer,
//! plus the manifest of deliverables shown before it starts.

pub mod manifest;
pub mod phases;
pub mod timer;

pub use manifest::{required_assets, DeliveryManifest};
pub use phases::{DeliveryPhase, DeliveryProgress, DeliverySimulator};
pub use timer::DeliveryTimer;
