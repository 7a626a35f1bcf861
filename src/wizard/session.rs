use statig::prelude::*;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Span};

use super::state_machine::{step_of, IsbnAssist, PublishingWizard};
use super::types::{WizardEvent, WizardStep};
use crate::channels::Channel;
use crate::delivery::{DeliveryPhase, DeliveryTimer};
use crate::events::ProjectEvent;
use crate::isbn::IsbnState;
use crate::project::Project;
use crate::spine::SpineProgress;
use crate::telemetry::generate_correlation_id;

/// One user's pass through the publish wizard for one project.
///
/// Owns the state machine and the delivery timer. The timer exists only
/// while the wizard is in the delivery sequence; leaving that step, calling
/// `teardown`, or dropping the session cancels it.
pub struct WizardSession {
    machine: StateMachine<PublishingWizard>,
    timer: Option<DeliveryTimer>,
    phase_interval: Duration,
    correlation_id: String,
    span: Span,
    torn_down: bool,
}

impl WizardSession {
    /// Returns the session and the receiving end of its project events.
    pub fn new(
        project: &Project,
        phase_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ProjectEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let correlation_id = generate_correlation_id();
        let span = info_span!(
            "wizard_session",
            project.id = %project.id,
            correlation.id = %correlation_id
        );
        let machine = PublishingWizard::new(project, tx).state_machine();
        span.in_scope(|| info!(project = %project.name, "Wizard session opened"));

        let session = Self {
            machine,
            timer: None,
            phase_interval,
            correlation_id,
            span,
            torn_down: false,
        };
        (session, rx)
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn step(&self) -> WizardStep {
        step_of(self.machine.state())
    }

    fn wizard(&self) -> &PublishingWizard {
        &self.machine
    }

    pub fn channel(&self) -> Option<Channel> {
        self.wizard().channel()
    }

    pub fn isbn(&self) -> &str {
        self.wizard().isbn()
    }

    pub fn isbn_state(&self) -> IsbnState {
        self.wizard().isbn_state()
    }

    pub fn isbn_assist(&self) -> Option<&IsbnAssist> {
        self.wizard().isbn_assist()
    }

    pub fn is_isbn_assist_open(&self) -> bool {
        self.isbn_assist().is_some()
    }

    pub fn spine(&self) -> &SpineProgress {
        self.wizard().spine()
    }

    /// Current phase, only while the delivery sequence is showing.
    pub fn delivery_phase(&self) -> Option<DeliveryPhase> {
        (self.step() == WizardStep::DeliverySequence).then(|| self.wizard().delivery_phase())
    }

    pub fn delivery_timer_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Feed one event and return the resulting step.
    pub fn dispatch(&mut self, event: WizardEvent) -> WizardStep {
        if self.torn_down {
            warn!(correlation.id = %self.correlation_id, event = ?event, "Session torn down, event dropped");
            return self.step();
        }

        let entered = self.span.enter();
        self.machine.handle(&event);
        drop(entered);

        self.sync_timer();
        self.step()
    }

    /// Wait for the next delivery interval and apply it.
    ///
    /// Returns `None` when the wizard is not in the delivery sequence, so a
    /// caller looping on this stops as soon as the user navigates away.
    pub async fn next_delivery_tick(&mut self) -> Option<WizardStep> {
        if self.torn_down || self.step() != WizardStep::DeliverySequence {
            return None;
        }
        if self.timer.is_none() {
            self.start_timer();
        }

        let tick = self.timer.as_mut()?.tick().await?;
        debug!(correlation.id = %self.correlation_id, tick, "Delivery tick");
        Some(self.dispatch(WizardEvent::DeliveryTick))
    }

    /// Drive delivery ticks until the wizard leaves the delivery sequence.
    pub async fn run_delivery(&mut self) -> WizardStep {
        while self.next_delivery_tick().await.is_some() {}
        self.step()
    }

    /// Cancel background work. Further events are dropped.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel_timer();
        self.torn_down = true;
        self.span
            .in_scope(|| info!(step = %self.step(), "Wizard session torn down"));
    }

    fn sync_timer(&mut self) {
        let in_delivery = self.step() == WizardStep::DeliverySequence;
        match (in_delivery, self.timer.is_some()) {
            (true, false) => {
                // no runtime here means the first next_delivery_tick starts it
                if Handle::try_current().is_ok() {
                    self.start_timer();
                }
            }
            (false, true) => self.cancel_timer(),
            _ => {}
        }
    }

    fn start_timer(&mut self) {
        self.cancel_timer();
        self.timer = Some(DeliveryTimer::start(self.phase_interval));
        info!(
            correlation.id = %self.correlation_id,
            interval_ms = self.phase_interval.as_millis() as u64,
            "Delivery timer armed"
        );
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
            info!(correlation.id = %self.correlation_id, "Delivery timer canceled");
        }
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_without_runtime_does_not_arm_timer() {
        let project = Project::new("Quiet Rooms");
        let (mut session, _rx) = WizardSession::new(&project, Duration::from_millis(10));
        session.dispatch(WizardEvent::Next);
        session.dispatch(WizardEvent::Next);
        session.dispatch(WizardEvent::Next);
        session.dispatch(WizardEvent::SelectChannel(Channel::AppleBooks));
        session.dispatch(WizardEvent::Next);
        assert_eq!(session.dispatch(WizardEvent::Next), WizardStep::DeliverySequence);
        assert!(!session.delivery_timer_active());
        assert_eq!(session.delivery_phase(), Some(DeliveryPhase::ValidatingManuscript));
    }

    #[test]
    fn test_teardown_drops_later_events() {
        let project = Project::new("Quiet Rooms");
        let (mut session, _rx) = WizardSession::new(&project, Duration::from_millis(10));
        session.teardown();
        assert!(session.is_torn_down());
        assert_eq!(session.dispatch(WizardEvent::Next), WizardStep::SpineOverview);
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        let project = Project::new("Quiet Rooms");
        let (a, _rx_a) = WizardSession::new(&project, Duration::from_millis(10));
        let (b, _rx_b) = WizardSession::new(&project, Duration::from_millis(10));
        assert_ne!(a.correlation_id(), b.correlation_id());
    }
}
