// Publish wizard as an explicit state machine.
//
// Every (step, event) pair either transitions, mutates the wizard context in
// place, or is ignored. Nothing here renders or sleeps; the delivery timer
// lives in the session and feeds `DeliveryTick` events in.

use chrono::Utc;
use statig::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{PublicationSettings, WizardEvent, WizardStep};
use crate::channels::{Channel, ChannelRule};
use crate::delivery::{DeliveryPhase, DeliveryProgress, DeliverySimulator};
use crate::events::ProjectEvent;
use crate::isbn::{is_valid_isbn13, isbn_state, IsbnState};
use crate::project::Project;
use crate::spine::{NodeStatus, SpineNodeId, SpineProgress};

/// Which screen led into the delivery sequence; Back returns there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOrigin {
    Finalization,
    TraditionalSubmission,
}

/// ISBN-assistance sub-flow opened over the finalization screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsbnAssist {
    pub rejected_draft: Option<String>,
    pub platform_isbn_offered: bool,
}

pub struct PublishingWizard {
    project_id: Uuid,
    template: Option<String>,
    settings: Option<PublicationSettings>,
    channel: Option<Channel>,
    isbn: String,
    isbn_assist: Option<IsbnAssist>,
    spine: SpineProgress,
    delivery: DeliverySimulator,
    delivery_origin: DeliveryOrigin,
    events: mpsc::UnboundedSender<ProjectEvent>,
}

impl PublishingWizard {
    pub fn new(project: &Project, events: mpsc::UnboundedSender<ProjectEvent>) -> Self {
        Self {
            project_id: project.id,
            template: project.template.clone(),
            settings: None,
            channel: project.channel,
            isbn: project.isbn.clone(),
            isbn_assist: None,
            spine: project.spine.clone(),
            delivery: DeliverySimulator::new(),
            delivery_origin: DeliveryOrigin::Finalization,
            events,
        }
    }
}

#[state_machine(initial = "State::spine_overview()", state(derive(Debug)))]
impl PublishingWizard {
    #[state]
    fn spine_overview(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Next => {
                self.log_step(WizardStep::SpineOverview, WizardStep::TemplateGallery);
                Transition(State::template_gallery())
            }
            _ => self.ignore(WizardStep::SpineOverview, event),
        }
    }

    #[state]
    fn template_gallery(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SelectTemplate(template) => {
                self.template = Some(template.clone());
                info!(project_id = %self.project_id, template = %template, "Template selected");
                self.emit(ProjectEvent::TemplateSelected {
                    project_id: self.project_id,
                    template: template.clone(),
                });
                self.mark(SpineNodeId::CoverDesign, NodeStatus::PendingReview);
                Handled
            }
            WizardEvent::Next => {
                self.log_step(WizardStep::TemplateGallery, WizardStep::Config);
                Transition(State::config())
            }
            WizardEvent::Back => {
                self.log_step(WizardStep::TemplateGallery, WizardStep::SpineOverview);
                Transition(State::spine_overview())
            }
            _ => self.ignore(WizardStep::TemplateGallery, event),
        }
    }

    #[state]
    fn config(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Configure(settings) => {
                info!(
                    project_id = %self.project_id,
                    title = %settings.title,
                    paper = %settings.paper,
                    "Publication settings updated"
                );
                self.settings = Some(settings.clone());
                self.mark(SpineNodeId::Formatting, NodeStatus::PendingReview);
                Handled
            }
            WizardEvent::Next => {
                self.log_step(WizardStep::Config, WizardStep::DistributionGallery);
                Transition(State::distribution_gallery())
            }
            WizardEvent::Back => {
                self.log_step(WizardStep::Config, WizardStep::TemplateGallery);
                Transition(State::template_gallery())
            }
            _ => self.ignore(WizardStep::Config, event),
        }
    }

    #[state]
    fn distribution_gallery(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SelectChannel(channel) => {
                self.channel = Some(*channel);
                let rule = channel.rule();
                if rule.exclusive_risk {
                    warn!(
                        project_id = %self.project_id,
                        channel = %channel,
                        "Channel enrollment is exclusive; other distribution may be restricted"
                    );
                }
                info!(project_id = %self.project_id, channel = %channel, "Channel selected");
                self.emit(ProjectEvent::ChannelSelected {
                    project_id: self.project_id,
                    channel: *channel,
                });
                self.mark(SpineNodeId::Distribution, NodeStatus::PendingReview);
                Handled
            }
            WizardEvent::Next => match self.channel {
                None => {
                    warn!(project_id = %self.project_id, "No channel selected, staying on distribution gallery");
                    Handled
                }
                Some(channel) if channel.rule().is_non_publishing => {
                    self.log_step(
                        WizardStep::DistributionGallery,
                        WizardStep::TraditionalSubmissionPrep,
                    );
                    Transition(State::traditional_submission_prep())
                }
                Some(_) => {
                    self.log_step(WizardStep::DistributionGallery, WizardStep::Finalization);
                    Transition(State::finalization())
                }
            },
            WizardEvent::Back => {
                self.log_step(WizardStep::DistributionGallery, WizardStep::Config);
                Transition(State::config())
            }
            _ => self.ignore(WizardStep::DistributionGallery, event),
        }
    }

    #[state]
    fn finalization(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SetIsbn(raw) => {
                self.commit_isbn(raw);
                Handled
            }
            WizardEvent::OpenIsbnAssist => {
                self.open_isbn_assist();
                Handled
            }
            WizardEvent::CloseIsbnAssist => {
                if self.isbn_assist.take().is_some() {
                    debug!(project_id = %self.project_id, "ISBN assistance closed");
                }
                Handled
            }
            WizardEvent::SubmitIsbnDraft(draft) => {
                let Some(assist) = self.isbn_assist.as_mut() else {
                    debug!(project_id = %self.project_id, "ISBN draft submitted with assistance closed, ignoring");
                    return Handled;
                };
                if is_valid_isbn13(draft) {
                    self.isbn_assist = None;
                    self.commit_isbn(draft);
                } else {
                    warn!(project_id = %self.project_id, draft = %draft, "Rejected invalid ISBN draft");
                    assist.rejected_draft = Some(draft.clone());
                }
                Handled
            }
            WizardEvent::Next => match self.isbn_state() {
                IsbnState::RequiredUnset => {
                    warn!(
                        project_id = %self.project_id,
                        channel = ?self.channel,
                        "Channel requires a valid ISBN, delivery blocked"
                    );
                    self.open_isbn_assist();
                    Handled
                }
                IsbnState::NotRequired | IsbnState::Provided => {
                    self.begin_delivery(DeliveryOrigin::Finalization);
                    self.log_step(WizardStep::Finalization, WizardStep::DeliverySequence);
                    Transition(State::delivery_sequence())
                }
            },
            WizardEvent::Back => {
                if self.isbn_assist.take().is_some() {
                    // in-progress assistance is discarded without a prompt
                    debug!(project_id = %self.project_id, "ISBN assistance discarded by back navigation");
                }
                self.log_step(WizardStep::Finalization, WizardStep::DistributionGallery);
                Transition(State::distribution_gallery())
            }
            _ => self.ignore(WizardStep::Finalization, event),
        }
    }

    #[state]
    fn traditional_submission_prep(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Next => {
                self.begin_delivery(DeliveryOrigin::TraditionalSubmission);
                self.log_step(
                    WizardStep::TraditionalSubmissionPrep,
                    WizardStep::DeliverySequence,
                );
                Transition(State::delivery_sequence())
            }
            WizardEvent::Back => {
                self.log_step(
                    WizardStep::TraditionalSubmissionPrep,
                    WizardStep::DistributionGallery,
                );
                Transition(State::distribution_gallery())
            }
            _ => self.ignore(WizardStep::TraditionalSubmissionPrep, event),
        }
    }

    #[state]
    fn delivery_sequence(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::DeliveryTick => match self.delivery.tick() {
                DeliveryProgress::Advanced(phase) => {
                    info!(
                        project_id = %self.project_id,
                        phase = %phase,
                        position = self.delivery.position(),
                        "Delivery phase advanced"
                    );
                    Handled
                }
                DeliveryProgress::Complete => {
                    self.publish();
                    self.log_step(WizardStep::DeliverySequence, WizardStep::Success);
                    Transition(State::success())
                }
            },
            WizardEvent::Back => match self.delivery_origin {
                DeliveryOrigin::Finalization => {
                    self.log_step(WizardStep::DeliverySequence, WizardStep::Finalization);
                    Transition(State::finalization())
                }
                DeliveryOrigin::TraditionalSubmission => {
                    self.log_step(
                        WizardStep::DeliverySequence,
                        WizardStep::TraditionalSubmissionPrep,
                    );
                    Transition(State::traditional_submission_prep())
                }
            },
            _ => self.ignore(WizardStep::DeliverySequence, event),
        }
    }

    #[state]
    fn success(&mut self, event: &WizardEvent) -> Outcome<State> {
        self.ignore(WizardStep::Success, event)
    }
}

impl PublishingWizard {
    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn settings(&self) -> Option<&PublicationSettings> {
        self.settings.as_ref()
    }

    pub fn channel(&self) -> Option<Channel> {
        self.channel
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn channel_rule(&self) -> ChannelRule {
        self.channel.map(Channel::rule).unwrap_or_default()
    }

    /// Recomputed on every call from the channel rule and ISBN text.
    pub fn isbn_state(&self) -> IsbnState {
        isbn_state(&self.channel_rule(), &self.isbn)
    }

    pub fn isbn_assist(&self) -> Option<&IsbnAssist> {
        self.isbn_assist.as_ref()
    }

    pub fn spine(&self) -> &SpineProgress {
        &self.spine
    }

    pub fn delivery_phase(&self) -> DeliveryPhase {
        self.delivery.current()
    }

    pub fn delivery_origin(&self) -> DeliveryOrigin {
        self.delivery_origin
    }

    fn ignore(&self, step: WizardStep, event: &WizardEvent) -> Outcome<State> {
        debug!(project_id = %self.project_id, step = %step, event = ?event, "Event ignored");
        Handled
    }

    fn log_step(&self, from: WizardStep, to: WizardStep) {
        info!(project_id = %self.project_id, from = %from, to = %to, "Wizard step changed");
    }

    fn emit(&self, event: ProjectEvent) {
        if self.events.send(event).is_err() {
            debug!(project_id = %self.project_id, "No listener for project events");
        }
    }

    fn mark(&mut self, id: SpineNodeId, status: NodeStatus) {
        if self.spine.get(id).status == status {
            return;
        }
        self.spine = self.spine.set(id, status);
        self.emit(ProjectEvent::SpineNodeUpdated {
            project_id: self.project_id,
            node: self.spine.get(id),
        });
    }

    fn commit_isbn(&mut self, raw: &str) {
        self.isbn = raw.trim().to_string();
        let valid = is_valid_isbn13(&self.isbn);
        info!(project_id = %self.project_id, isbn = %self.isbn, valid, "ISBN updated");
        self.emit(ProjectEvent::IsbnUpdated {
            project_id: self.project_id,
            isbn: self.isbn.clone(),
        });
        let status = if valid {
            NodeStatus::Completed
        } else {
            NodeStatus::NotStarted
        };
        self.mark(SpineNodeId::IsbnAssigned, status);
    }

    fn open_isbn_assist(&mut self) {
        if self.isbn_assist.is_some() {
            return;
        }
        let offered = self.channel_rule().allows_platform_isbn;
        self.isbn_assist = Some(IsbnAssist {
            rejected_draft: None,
            platform_isbn_offered: offered,
        });
        info!(project_id = %self.project_id, platform_isbn_offered = offered, "ISBN assistance opened");
    }

    fn begin_delivery(&mut self, origin: DeliveryOrigin) {
        self.delivery_origin = origin;
        self.delivery.restart();
        info!(
            project_id = %self.project_id,
            channel = ?self.channel,
            phase = %self.delivery.current(),
            "Delivery sequence started"
        );
    }

    fn publish(&mut self) {
        self.mark(SpineNodeId::Distribution, NodeStatus::Completed);
        self.mark(SpineNodeId::Published, NodeStatus::Completed);
        let published_at = Utc::now();
        info!(project_id = %self.project_id, channel = ?self.channel, "Project published");
        self.emit(ProjectEvent::Published {
            project_id: self.project_id,
            channel: self.channel,
            published_at,
        });
    }
}

/// Maps the generated state to the public step enum.
pub(crate) fn step_of(state: &State) -> WizardStep {
    match state {
        State::SpineOverview { .. } => WizardStep::SpineOverview,
        State::TemplateGallery { .. } => WizardStep::TemplateGallery,
        State::Config { .. } => WizardStep::Config,
        State::DistributionGallery { .. } => WizardStep::DistributionGallery,
        State::Finalization { .. } => WizardStep::Finalization,
        State::TraditionalSubmissionPrep { .. } => WizardStep::TraditionalSubmissionPrep,
        State::DeliverySequence { .. } => WizardStep::DeliverySequence,
        State::Success { .. } => WizardStep::Success,
    }
}
