//! Daily snapshot gating.
//!
//! Snapshots are keyed by calendar day in one fixed zone so that the
//! same run produces the same day regardless of where the process is
//! deployed. The write mode is explicit caller configuration rather
//! than something inferred from a deployment-mode flag; the store's
//! unique constraint on `(video_id, snapshot_date)` remains the actual
//! invariant, with the policy check as the fast path.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::RankerError;
use crate::persistence::VideoStore;

/// Fixed zone used to compute snapshot calendar days.
pub const SNAPSHOT_TZ: Tz = chrono_tz::Asia::Seoul;

/// Returns the snapshot calendar day for the given instant.
#[must_use]
pub fn snapshot_day(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&SNAPSHOT_TZ).date_naive()
}

/// How snapshot writes behave when rows for the day already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotWriteMode {
    /// Re-runs replace the day's rows. Intended for iterative local
    /// testing.
    Overwrite,
    /// The first run of the day wins; later runs write nothing. This
    /// preserves the morning baseline from same-day refreshes.
    FirstWriterWins,
}

impl std::str::FromStr for SnapshotWriteMode {
    type Err = RankerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(Self::Overwrite),
            "first_writer_wins" => Ok(Self::FirstWriterWins),
            other => Err(RankerError::InvalidRequest(format!(
                "unknown snapshot write mode: {other}"
            ))),
        }
    }
}

/// Outcome of the per-run snapshot gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotDecision {
    /// Write the day's snapshots; `overwrite` selects the conflict
    /// behavior on `(video_id, snapshot_date)`.
    Write {
        /// Replace existing rows instead of leaving them untouched.
        overwrite: bool,
    },
    /// The day is already captured; the run reports zero snapshots
    /// written without erroring.
    Skip,
}

/// Decides whether a run may write the day's snapshots.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotPolicy {
    mode: SnapshotWriteMode,
}

impl SnapshotPolicy {
    /// Creates a policy with the given write mode.
    #[must_use]
    pub const fn new(mode: SnapshotWriteMode) -> Self {
        Self { mode }
    }

    /// Returns the configured write mode.
    #[must_use]
    pub const fn mode(&self) -> SnapshotWriteMode {
        self.mode
    }

    /// Gates the snapshot write for `day`.
    ///
    /// Under [`SnapshotWriteMode::FirstWriterWins`] this consults the
    /// store for existing rows. The check-then-insert pair is not
    /// atomic against a concurrent run; the unique constraint behind
    /// [`VideoStore::upsert_snapshots`] closes that race.
    ///
    /// # Errors
    ///
    /// Returns [`RankerError::PersistenceError`] when the existence
    /// check fails.
    pub async fn decide(
        &self,
        store: &dyn VideoStore,
        day: NaiveDate,
    ) -> Result<SnapshotDecision, RankerError> {
        match self.mode {
            SnapshotWriteMode::Overwrite => Ok(SnapshotDecision::Write { overwrite: true }),
            SnapshotWriteMode::FirstWriterWins => {
                if store.has_snapshots_for(day).await? {
                    Ok(SnapshotDecision::Skip)
                } else {
                    Ok(SnapshotDecision::Write { overwrite: false })
                }
            }
        }
    }
}
