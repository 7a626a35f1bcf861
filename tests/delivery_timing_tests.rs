//! Delivery sequence timing tests
//!
//! These tests pause the tokio clock so every delivery interval is exact and
//! no test waits in real time.

use publishing_desk::channels::Channel;
use publishing_desk::delivery::{DeliveryPhase, DeliveryTimer};
use publishing_desk::project::Project;
use publishing_desk::wizard::{WizardEvent, WizardSession, WizardStep};
use std::time::Duration;
use tokio::time::{advance, timeout, Instant};
use tokio_test::{assert_pending, task};

const INTERVAL: Duration = Duration::from_millis(1500);

fn session_in_delivery(channel: Channel) -> WizardSession {
    let project = Project::new("Ninefold Hills").with_chapter("Whole draft", 62_000);
    let (mut session, _rx) = WizardSession::new(&project, INTERVAL);
    session.dispatch(WizardEvent::Next);
    session.dispatch(WizardEvent::Next);
    session.dispatch(WizardEvent::Next);
    session.dispatch(WizardEvent::SelectChannel(channel));
    session.dispatch(WizardEvent::Next);
    if session.step() == WizardStep::Finalization {
        session.dispatch(WizardEvent::SetIsbn("9780306406157".into()));
    }
    assert_eq!(
        session.dispatch(WizardEvent::Next),
        WizardStep::DeliverySequence
    );
    session
}

#[tokio::test(start_paused = true)]
async fn test_one_phase_per_interval_then_success() {
    let mut session = session_in_delivery(Channel::Kobo);
    let started = Instant::now();
    assert!(session.delivery_timer_active());
    assert_eq!(
        session.delivery_phase(),
        Some(DeliveryPhase::ValidatingManuscript)
    );

    let mut seen = vec![DeliveryPhase::ValidatingManuscript];
    for n in 1..DeliveryPhase::ALL.len() as u32 {
        let step = session.next_delivery_tick().await;
        assert_eq!(step, Some(WizardStep::DeliverySequence));
        assert_eq!(started.elapsed(), INTERVAL * n);
        seen.extend(session.delivery_phase());
    }
    assert_eq!(seen, DeliveryPhase::ALL.to_vec());

    let last_phase_at = started.elapsed();
    assert_eq!(session.next_delivery_tick().await, Some(WizardStep::Success));
    assert_eq!(started.elapsed() - last_phase_at, INTERVAL);
    assert!(!session.delivery_timer_active());
    assert_eq!(session.delivery_phase(), None);

    assert_eq!(session.next_delivery_tick().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_no_advance_before_interval_elapses() {
    let mut session = session_in_delivery(Channel::AppleBooks);

    let early = timeout(
        INTERVAL - Duration::from_millis(1),
        session.next_delivery_tick(),
    )
    .await;
    assert!(early.is_err());
    assert_eq!(
        session.delivery_phase(),
        Some(DeliveryPhase::ValidatingManuscript)
    );

    assert_eq!(
        session.next_delivery_tick().await,
        Some(WizardStep::DeliverySequence)
    );
    assert_eq!(session.delivery_phase(), Some(DeliveryPhase::RenderingCover));
}

#[tokio::test(start_paused = true)]
async fn test_run_delivery_completes_after_six_intervals() {
    let mut session = session_in_delivery(Channel::TraditionalPublisher);
    let started = Instant::now();
    assert_eq!(session.run_delivery().await, WizardStep::Success);
    assert_eq!(started.elapsed(), INTERVAL * 6);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_delivery() {
    let mut session = session_in_delivery(Channel::IngramSpark);
    session.next_delivery_tick().await;
    assert_eq!(session.delivery_phase(), Some(DeliveryPhase::RenderingCover));

    session.teardown();
    assert!(!session.delivery_timer_active());

    advance(INTERVAL * 10).await;
    assert_eq!(session.next_delivery_tick().await, None);
    assert_eq!(session.step(), WizardStep::DeliverySequence);
    assert_eq!(session.delivery_phase(), Some(DeliveryPhase::RenderingCover));

    session.dispatch(WizardEvent::DeliveryTick);
    assert_eq!(session.delivery_phase(), Some(DeliveryPhase::RenderingCover));
}

#[tokio::test(start_paused = true)]
async fn test_back_cancels_timer_and_restart_begins_at_first_phase() {
    let mut session = session_in_delivery(Channel::IngramSpark);
    session.next_delivery_tick().await;
    session.next_delivery_tick().await;
    assert_eq!(session.delivery_phase(), Some(DeliveryPhase::PackagingFiles));

    assert_eq!(session.dispatch(WizardEvent::Back), WizardStep::Finalization);
    assert!(!session.delivery_timer_active());
    advance(INTERVAL * 4).await;
    assert_eq!(session.next_delivery_tick().await, None);
    assert_eq!(session.step(), WizardStep::Finalization);

    assert_eq!(
        session.dispatch(WizardEvent::Next),
        WizardStep::DeliverySequence
    );
    assert_eq!(
        session.delivery_phase(),
        Some(DeliveryPhase::ValidatingManuscript)
    );
    let restarted = Instant::now();
    session.next_delivery_tick().await;
    assert_eq!(restarted.elapsed(), INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_mid_delivery_is_clean() {
    let session = session_in_delivery(Channel::Kobo);
    drop(session);
    advance(INTERVAL * 10).await;
}

#[tokio::test(start_paused = true)]
async fn test_canceled_timer_never_ticks() {
    let mut timer = DeliveryTimer::start(INTERVAL);
    {
        let mut pending = task::spawn(timer.tick());
        assert_pending!(pending.poll());
    }

    timer.cancel();
    advance(INTERVAL * 3).await;
    assert_eq!(timer.tick().await, None);
}
