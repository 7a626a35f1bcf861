use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::channels::Channel;
use crate::events::ProjectEvent;
use crate::spine::{estimate_page_count, SpineError, SpineProgress};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub word_count: u32,
}

/// A writing project and everything the publishing wizard records about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw user input; validity is derived when read
    #[serde(default)]
    pub isbn: String,
    pub channel: Option<Channel>,
    pub template: Option<String>,
    #[serde(default)]
    pub spine: SpineProgress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            chapters: Vec::new(),
            tags: Vec::new(),
            isbn: String::new(),
            channel: None,
            template: None,
            spine: SpineProgress::new(),
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn with_chapter(mut self, title: impl Into<String>, word_count: u32) -> Self {
        self.chapters.push(Chapter {
            title: title.into(),
            word_count,
        });
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn total_word_count(&self) -> u64 {
        self.chapters.iter().map(|c| u64::from(c.word_count)).sum()
    }

    pub fn estimated_page_count(&self, words_per_page: u32) -> Result<u32, SpineError> {
        estimate_page_count(self.total_word_count(), words_per_page)
    }

    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Fold a wizard event into the record. Events for other projects are
    /// ignored and reported as not applied.
    pub fn apply(&mut self, event: &ProjectEvent) -> bool {
        if event.project_id() != self.id {
            debug!(
                project_id = %self.id,
                event_project = %event.project_id(),
                "Ignoring event for another project"
            );
            return false;
        }

        match event {
            ProjectEvent::TemplateSelected { template, .. } => {
                self.template = Some(template.clone());
            }
            ProjectEvent::ChannelSelected { channel, .. } => {
                self.channel = Some(*channel);
            }
            ProjectEvent::IsbnUpdated { isbn, .. } => {
                self.isbn = isbn.clone();
            }
            ProjectEvent::SpineNodeUpdated { node, .. } => {
                let at = node.timestamp.unwrap_or_else(Utc::now);
                self.spine = self.spine.set_at(node.id, node.status, at);
            }
            ProjectEvent::Published { published_at, .. } => {
                self.published_at = Some(*published_at);
            }
        }
        self.updated_at = Utc::now();
        true
    }
}
