// Per-day assignment classification.
use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;

use crate::config::ReportConfig;
use crate::types::{DailyClassification, RosterEntry, ShiftRecord};

/// Normalized lookup key for a calendar date. The format comes from the
/// deployment config so all stages key dates identically.
pub fn date_key(date: NaiveDate, config: &ReportConfig) -> String {
    date.format(&config.date_key_format).to_string()
}

/// Partition the roster for one date.
///
/// The day's shift population is every ingested record whose planned start
/// date keys to the target date. It is kept as-is: an employee with two
/// shifts that day appears twice in `assigned` but still counts once as
/// assigned. The unassigned set is the complement of the distinct assigned
/// ids, taken against the full roster.
///
/// Each call is independent -- nothing is shared or accumulated across
/// dates, so classifications for different days can be computed in any
/// order.
pub fn classify_day(
    date: NaiveDate,
    records: &[ShiftRecord],
    roster: &[RosterEntry],
    config: &ReportConfig,
) -> DailyClassification {
    let key = date_key(date, config);

    let assigned: Vec<ShiftRecord> = records
        .iter()
        .filter(|r| date_key(r.planned_start_date, config) == key)
        .cloned()
        .collect();

    let assigned_ids: HashSet<&str> = assigned.iter().map(|r| r.employee_id.as_str()).collect();

    let unassigned_ids: BTreeSet<String> = roster
        .iter()
        .filter(|e| !assigned_ids.contains(e.id.as_str()))
        .map(|e| e.id.clone())
        .collect();

    DailyClassification {
        date,
        assigned,
        unassigned_ids,
    }
}

/// Resolve a classification's unassigned ids back to roster entries, sorted
/// by employee id. Used by the presentation layer for the unassigned list.
pub fn unassigned_entries<'a>(
    classification: &DailyClassification,
    roster: &'a [RosterEntry],
) -> Vec<&'a RosterEntry> {
    let by_id: HashMap<&str, &RosterEntry> =
        roster.iter().map(|e| (e.id.as_str(), e)).collect();
    classification
        .unassigned_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()).copied())
        .collect()
}
