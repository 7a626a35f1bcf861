//! Publish wizard: typed steps and events, the transition table as a
//! state machine, and the session that owns it together with the delivery
//! timer.

pub mod session;
pub mod state_machine;
pub mod types;

pub use session::WizardSession;
pub use state_machine::{DeliveryOrigin, IsbnAssist, PublishingWizard};
pub use types::{PublicationSettings, TrimSize, WizardEvent, WizardStep};
