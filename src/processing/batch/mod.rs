mod metrics;
mod runner;

pub use metrics::CycleTotals;
pub use runner::{next_baseline, BatchRunner, CycleReport};
