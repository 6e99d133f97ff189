use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel stored in place of a planned start/end time that could not be
/// parsed. Unparsable times never abort ingestion.
pub const INVALID_TIME: &str = "Invalid Time";

/// One raw row from a per-city shift export, as it appears in the file.
/// Every field is optional; validation happens in the ingestor, not here.
/// Columns the export leaves out entirely deserialize as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawShiftRow {
    #[serde(rename = "employee id")]
    pub employee_id: Option<String>,
    #[serde(rename = "shift status")]
    pub shift_status: Option<String>,
    #[serde(rename = "planned start date")]
    pub planned_start_date: Option<String>,
    #[serde(rename = "planned start time")]
    pub planned_start_time: Option<String>,
    #[serde(rename = "planned end time")]
    pub planned_end_time: Option<String>,
}

/// One raw row from the roster export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRosterRow {
    #[serde(rename = "employee id")]
    pub employee_id: Option<String>,
    #[serde(rename = "employee name")]
    pub employee_name: Option<String>,
    #[serde(rename = "contract name")]
    pub contract: Option<String>,
    #[serde(rename = "city")]
    pub city: Option<String>,
}

/// A validated planned shift occurrence. Only rows with a non-empty employee
/// id, a non-excluded status and a parsable planned start date make it here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRecord {
    pub employee_id: String,
    pub shift_status: String,
    pub planned_start_date: NaiveDate,
    /// `HH:MM`, or [`INVALID_TIME`] when the cell could not be parsed.
    pub planned_start_time: String,
    pub planned_end_time: String,
    /// City label of the file this row came from.
    pub city: String,
}

/// One employee from the roster. The roster is the universe against which
/// assignment is measured; `id` is the join key for shift records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub contract: String,
    pub city: String,
}

/// Per-date split of the roster into assigned and unassigned employees.
///
/// `assigned` keeps every shift record for the date, including multiple
/// shifts for the same employee; `unassigned_ids` is the complement of the
/// distinct assigned ids, taken against the full roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClassification {
    pub date: NaiveDate,
    pub assigned: Vec<ShiftRecord>,
    pub unassigned_ids: BTreeSet<String>,
}

/// Assignment counts for one (contract, city) pair on one date. Only built
/// when the pair's roster total is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCell {
    pub date: NaiveDate,
    pub assigned: usize,
    pub unassigned: usize,
    /// assigned / total * 100, rounded to 2 decimals.
    pub percentage: f64,
}

/// One cross-tab row of the master report: a (contract, city) pair with its
/// roster headcount and one cell per date, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterReportRow {
    pub contract: String,
    pub city: String,
    pub total: usize,
    pub cells: Vec<SummaryCell>,
}

/// Ingestion diagnostics for one city file. The skip counters partition
/// `total_rows - kept`; `invalid_times` counts kept records that carry the
/// time sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub total_rows: usize,
    pub kept: usize,
    pub skipped_status: usize,
    pub skipped_missing_id: usize,
    pub skipped_bad_date: usize,
    pub invalid_times: usize,
}

/// Whole-run statistics written alongside the master report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub roster_size: usize,
    pub shift_records: usize,
    pub days: usize,
    pub contracts_reported: usize,
    pub city_pairs_reported: usize,
    pub overall_assigned_pct: f64,
}
