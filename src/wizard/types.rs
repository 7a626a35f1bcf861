use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channels::Channel;
use crate::spine::PaperStock;

/// Screens of the publish wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SpineOverview,
    TemplateGallery,
    Config,
    DistributionGallery,
    Finalization,
    TraditionalSubmissionPrep,
    DeliverySequence,
    Success,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WizardStep::SpineOverview => "spine overview",
            WizardStep::TemplateGallery => "template gallery",
            WizardStep::Config => "configuration",
            WizardStep::DistributionGallery => "distribution gallery",
            WizardStep::Finalization => "finalization",
            WizardStep::TraditionalSubmissionPrep => "traditional submission prep",
            WizardStep::DeliverySequence => "delivery sequence",
            WizardStep::Success => "success",
        };
        f.write_str(label)
    }
}

/// Print and layout choices made on the config screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationSettings {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub trim_size: TrimSize,
    pub paper: PaperStock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimSize {
    /// 5 x 8 in
    Digest,
    /// 5.5 x 8.5 in
    #[default]
    Trade,
    /// 6 x 9 in
    UsTrade,
}

/// User actions plus the delivery timer tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Next,
    Back,
    SelectTemplate(String),
    Configure(PublicationSettings),
    SelectChannel(Channel),
    SetIsbn(String),
    OpenIsbnAssist,
    SubmitIsbnDraft(String),
    CloseIsbnAssist,
    DeliveryTick,
}
