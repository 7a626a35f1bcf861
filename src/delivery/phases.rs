use serde::{Deserialize, Serialize};
use std::fmt;

/// Named steps of the simulated packaging and submission sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPhase {
    ValidatingManuscript,
    RenderingCover,
    PackagingFiles,
    GeneratingMetadata,
    SubmittingToChannel,
    ConfirmingReceipt,
}

impl DeliveryPhase {
    pub const ALL: [DeliveryPhase; 6] = [
        DeliveryPhase::ValidatingManuscript,
        DeliveryPhase::RenderingCover,
        DeliveryPhase::PackagingFiles,
        DeliveryPhase::GeneratingMetadata,
        DeliveryPhase::SubmittingToChannel,
        DeliveryPhase::ConfirmingReceipt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeliveryPhase::ValidatingManuscript => "Validating manuscript",
            DeliveryPhase::RenderingCover => "Rendering cover",
            DeliveryPhase::PackagingFiles => "Packaging files",
            DeliveryPhase::GeneratingMetadata => "Generating metadata",
            DeliveryPhase::SubmittingToChannel => "Submitting to channel",
            DeliveryPhase::ConfirmingReceipt => "Confirming receipt",
        }
    }
}

impl fmt::Display for DeliveryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryProgress {
    Advanced(DeliveryPhase),
    Complete,
}

/// Position within the fixed phase list. Cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliverySimulator {
    index: usize,
    complete: bool,
}

impl DeliverySimulator {
    /// Starts at the first phase.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart(&mut self) {
        *self = Self::new();
    }

    pub fn current(&self) -> DeliveryPhase {
        DeliveryPhase::ALL[self.index]
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// One interval elapsed. Ticking at the last phase completes the sequence;
    /// further ticks keep reporting `Complete`.
    pub fn tick(&mut self) -> DeliveryProgress {
        if self.complete || self.index + 1 == DeliveryPhase::ALL.len() {
            self.complete = true;
            return DeliveryProgress::Complete;
        }
        self.index += 1;
        DeliveryProgress::Advanced(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_all_phases_in_order_then_completes() {
        let mut sim = DeliverySimulator::new();
        let mut seen = vec![sim.current()];
        loop {
            match sim.tick() {
                DeliveryProgress::Advanced(phase) => seen.push(phase),
                DeliveryProgress::Complete => break,
            }
        }
        assert_eq!(seen, DeliveryPhase::ALL.to_vec());
        assert!(sim.is_complete());
        assert_eq!(sim.tick(), DeliveryProgress::Complete);
    }

    #[test]
    fn test_restart_returns_to_first_phase() {
        let mut sim = DeliverySimulator::new();
        sim.tick();
        sim.tick();
        assert_eq!(sim.current(), DeliveryPhase::PackagingFiles);
        sim.restart();
        assert_eq!(sim.current(), DeliveryPhase::ValidatingManuscript);
        assert!(!sim.is_complete());
    }
}
