use chrono::NaiveDate;

/// Run-aborting precondition failures. Every variant is raised synchronously
/// at the point of violation; no partial report is produced after one fires.
/// Presentation (alerts, console output) belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("empty roster -- load the employee file before generating reports")]
    EmptyRoster,
    #[error("no shift records were ingested from any city file")]
    NoShiftRecords,
}
