use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channels::Channel;
use crate::spine::SpineNode;

/// Changes the wizard reports to its host for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectEvent {
    TemplateSelected {
        project_id: Uuid,
        template: String,
    },
    ChannelSelected {
        project_id: Uuid,
        channel: Channel,
    },
    IsbnUpdated {
        project_id: Uuid,
        isbn: String,
    },
    SpineNodeUpdated {
        project_id: Uuid,
        node: SpineNode,
    },
    /// Terminal signal, sent once when the wizard reaches success
    Published {
        project_id: Uuid,
        channel: Option<Channel>,
        published_at: DateTime<Utc>,
    },
}

impl ProjectEvent {
    pub fn project_id(&self) -> Uuid {
        match self {
            ProjectEvent::TemplateSelected { project_id, .. }
            | ProjectEvent::ChannelSelected { project_id, .. }
            | ProjectEvent::IsbnUpdated { project_id, .. }
            | ProjectEvent::SpineNodeUpdated { project_id, .. }
            | ProjectEvent::Published { project_id, .. } => *project_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectEvent::Published { .. })
    }
}
