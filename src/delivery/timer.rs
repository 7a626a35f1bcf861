use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Cancelable periodic ticker for the delivery sequence.
///
/// The first tick arrives one full period after `start`. Ticks are numbered
/// from 1 and are never dropped: if the consumer falls behind, the ticker
/// waits. Dropping the timer aborts the task.
pub struct DeliveryTimer {
    period: Duration,
    ticks: mpsc::Receiver<u64>,
    handle: JoinHandle<()>,
}

impl DeliveryTimer {
    /// Must be called from within a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                interval.tick().await;
                seq += 1;
                if tx.send(seq).await.is_err() {
                    break;
                }
            }
        });
        debug!(period_ms = period.as_millis() as u64, "Delivery timer started");
        Self {
            period,
            ticks,
            handle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Next tick sequence number, or `None` once canceled.
    pub async fn tick(&mut self) -> Option<u64> {
        self.ticks.recv().await
    }

    pub fn cancel(&mut self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            debug!("Delivery timer canceled");
        }
        self.ticks.close();
    }

    pub fn is_canceled(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DeliveryTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let period = Duration::from_millis(500);
        let mut timer = DeliveryTimer::start(period);
        let started = Instant::now();

        for expected in 1..=3u64 {
            assert_eq!(timer.tick().await, Some(expected));
            assert_eq!(started.elapsed(), period * expected as u32);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let mut timer = DeliveryTimer::start(Duration::from_millis(100));
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(timer.is_canceled());
        assert_eq!(timer.tick().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_arrives_before_first_period() {
        let mut timer = DeliveryTimer::start(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(99)).await;

        let mut next = tokio_test::task::spawn(timer.tick());
        tokio_test::assert_pending!(next.poll());
    }
}
