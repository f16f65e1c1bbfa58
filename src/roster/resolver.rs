//! Weekday assignment resolution.
//!
//! Pure function from a roster and a weekday to the day's assignments. Missing
//! data never errors — any slot past the end of a category's list resolves to
//! the [`UNASSIGNED`] placeholder.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::roster::model::{DailyAssignment, WeeklyRoster, UNASSIGNED};

/// How the 残り番 (residual) list maps weekdays to its primary/secondary pair.
///
/// Both layouts appear in the wild and are NOT equivalent, so the convention is
/// an explicit configuration choice, never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualIndexing {
    /// Pairs listed together per weekday: primary at `2d`, secondary at `2d+1`.
    /// This is the canonical default.
    #[default]
    Paired,
    /// All primaries first, then all secondaries: primary at `d`, secondary at `d+7`.
    SplitHalves,
}

/// Resolve the roster for a weekday.
///
/// `weekday` is a `chrono::Weekday`, so out-of-range values are unrepresentable;
/// computing the weekday from the calendar is the scheduler's job, not ours.
pub fn resolve(roster: &WeeklyRoster, weekday: Weekday, indexing: ResidualIndexing) -> DailyAssignment {
    let d = weekday.num_days_from_monday() as usize;

    DailyAssignment {
        emergency: slot(&roster.emergency, d),
        morning_in_house: slot(&roster.morning_in_house, d),
        afternoon_in_house: slot(&roster.afternoon_in_house, d),
        residual: residual_pair(&roster.residual, d, indexing),
    }
}

fn slot(entries: &[String], index: usize) -> String {
    entries
        .get(index)
        .cloned()
        .unwrap_or_else(|| UNASSIGNED.to_string())
}

/// Resolve the residual pair for weekday index `d`. The pair resolves as a
/// unit: if the secondary slot is out of range, both fall back to the
/// placeholder.
fn residual_pair(entries: &[String], d: usize, indexing: ResidualIndexing) -> (String, String) {
    let (first, second) = match indexing {
        ResidualIndexing::Paired => (2 * d, 2 * d + 1),
        ResidualIndexing::SplitHalves => (d, d + 7),
    };
    if second < entries.len() {
        (entries[first].clone(), entries[second].clone())
    } else {
        (UNASSIGNED.to_string(), UNASSIGNED.to_string())
    }
}
