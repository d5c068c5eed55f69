use crate::core::{CommitDecision, CommitReport};

/// Byte and decision totals of one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleTotals {
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub reduced: usize,
    pub fallbacks: usize,
    pub passthroughs: usize,
}

impl CycleTotals {
    pub fn record(&mut self, report: &CommitReport) {
        self.bytes_before += report.original_size;
        self.bytes_after += report.optimized_size;
        match report.decision {
            CommitDecision::Reduced => self.reduced += 1,
            CommitDecision::Fallback => self.fallbacks += 1,
            CommitDecision::Passthrough => self.passthroughs += 1,
        }
    }

    pub fn saved_bytes(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }

    pub fn savings_percent(&self) -> f64 {
        if self.bytes_before == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.bytes_before as f64 * 100.0
    }
}
