//! Resolution of the "since" instant of a cycle.

use chrono::{DateTime, Utc};
use crate::core::{BaselineOverride, Clock};

/// An explicit override always wins over the recorded instant.
pub fn resolve(recorded_at: DateTime<Utc>, override_at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    override_at.unwrap_or(recorded_at)
}

/// The command-line baseline, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupBaseline {
    pub since: Option<DateTime<Utc>>,
    /// `--from-now` persists its instant even if nothing gets processed
    pub force_write: bool,
}

pub fn resolve_startup(baseline: BaselineOverride, clock: &dyn Clock) -> StartupBaseline {
    match baseline {
        BaselineOverride::Persisted => StartupBaseline { since: None, force_write: false },
        BaselineOverride::Since(at) => StartupBaseline { since: Some(at), force_write: false },
        BaselineOverride::FromNow => StartupBaseline {
            since: Some(clock.now()),
            force_write: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::TimeZone;

    #[test]
    fn override_wins() {
        let recorded = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let explicit = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(resolve(recorded, Some(explicit)), explicit);
        assert_eq!(resolve(recorded, None), recorded);
    }

    #[test]
    fn from_now_reads_the_clock_and_forces_a_write() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(now);

        let resolved = resolve_startup(BaselineOverride::FromNow, &clock);
        assert_eq!(resolved, StartupBaseline { since: Some(now), force_write: true });

        let resolved = resolve_startup(BaselineOverride::Persisted, &clock);
        assert_eq!(resolved, StartupBaseline { since: None, force_write: false });
    }
}
