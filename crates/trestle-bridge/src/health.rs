//! Bridge health reporting.
//!
//! [`HealthStatus`] condenses the coordinator's lifecycle phase and its
//! failure counter into one value a function host can poll. Record
//! failures degrade a running bridge but never stop it: redelivery is
//! the host's call, so the bridge keeps accepting records and reports
//! how many failed so far.

use std::fmt;

/// Health of a bridge, as reported to the function host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthStatus {
    /// Not yet running: the route may still be loading or the engine
    /// starting.
    #[default]
    Starting,

    /// Running, with every record so far processed successfully.
    Healthy,

    /// Running, but some records have failed pipeline execution.
    Degraded {
        /// Records that failed so far.
        records_failed: u64,
    },

    /// Shut down; no further records are accepted.
    Closed,
}

impl HealthStatus {
    /// Returns `true` when the bridge is running and has seen no
    /// failures.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Returns `true` while the bridge still accepts records.
    ///
    /// Failures are per-record: a degraded bridge keeps processing.
    #[must_use]
    pub fn accepts_records(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded { .. })
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Starting => f.write_str("starting"),
            HealthStatus::Healthy => f.write_str("healthy"),
            HealthStatus::Degraded { records_failed } => {
                write!(f, "degraded ({records_failed} records failed)")
            }
            HealthStatus::Closed => f.write_str("closed"),
        }
    }
}
