// Ingestion boundary: raw spreadsheet rows in, validated records out.
//
// File reading lives here too, but the core entry points
// (`ingest_raw_records`, `load_roster`) are pure functions over
// already-materialized rows so they can be driven from any source.
use std::error::Error;

use csv::ReaderBuilder;

use crate::error::ValidationError;
use crate::types::{IngestReport, RawRosterRow, RawShiftRow, RosterEntry, ShiftRecord, INVALID_TIME};
use crate::util::{parse_date_safe, parse_time_safe};

/// A shift status is excluded when it marks the shift as not worked.
/// Matching is case-insensitive and substring-based so the raw variants
/// (`NO_SHOW(UNEXCUSED)`, `NO_SHOW_EXCUSED(EXCUSED)`, ...) are all caught.
fn is_excluded_status(status: &str) -> bool {
    let upper = status.to_uppercase();
    upper.contains("NO_SHOW") || upper.contains("EXCUSED")
}

/// Validate and normalize one city's raw shift rows.
///
/// Rows with an empty employee id, an excluded status, or an unparsable
/// planned start date are skipped and counted in the report; unparsable
/// times degrade to the [`INVALID_TIME`] sentinel instead of dropping the
/// row. Never fails: a city file full of bad rows just yields zero records.
pub fn ingest_raw_records(city: &str, rows: &[RawShiftRow]) -> (Vec<ShiftRecord>, IngestReport) {
    let mut report = IngestReport {
        total_rows: rows.len(),
        ..IngestReport::default()
    };
    let mut records = Vec::new();

    for row in rows {
        let employee_id = match row.employee_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                report.skipped_missing_id += 1;
                continue;
            }
        };

        let shift_status = row
            .shift_status
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string();
        if is_excluded_status(&shift_status) {
            report.skipped_status += 1;
            continue;
        }

        // A record without a calendar date cannot be classified to any day.
        let planned_start_date = match parse_date_safe(row.planned_start_date.as_deref()) {
            Some(d) => d,
            None => {
                report.skipped_bad_date += 1;
                continue;
            }
        };

        let planned_start_time = parse_time_safe(row.planned_start_time.as_deref());
        let planned_end_time = parse_time_safe(row.planned_end_time.as_deref());
        if planned_start_time.is_none() || planned_end_time.is_none() {
            report.invalid_times += 1;
        }

        records.push(ShiftRecord {
            employee_id,
            shift_status,
            planned_start_date,
            planned_start_time: planned_start_time.unwrap_or_else(|| INVALID_TIME.to_string()),
            planned_end_time: planned_end_time.unwrap_or_else(|| INVALID_TIME.to_string()),
            city: city.to_string(),
        });
        report.kept += 1;
    }

    (records, report)
}

/// Normalize raw roster rows into the employee universe.
///
/// Rows with a blank employee id are unusable and dropped; an entirely
/// unusable roster aborts the run, since assignment reporting against an
/// empty universe is meaningless.
pub fn load_roster(rows: &[RawRosterRow]) -> Result<Vec<RosterEntry>, ValidationError> {
    let mut roster = Vec::new();
    for row in rows {
        let id = match row.employee_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => continue,
        };
        roster.push(RosterEntry {
            id,
            name: row
                .employee_name
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .to_string(),
            contract: row
                .contract
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .to_string(),
            city: row.city.as_deref().map(str::trim).unwrap_or("").to_string(),
        });
    }
    if roster.is_empty() {
        return Err(ValidationError::EmptyRoster);
    }
    Ok(roster)
}

// Exports disagree on header casing and stray spaces; fold them to the
// lowercase names the raw row types expect.
fn normalize_headers(rdr: &mut csv::Reader<std::fs::File>) -> Result<(), Box<dyn Error>> {
    let normalized: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    rdr.set_headers(normalized);
    Ok(())
}

pub fn read_shift_rows(path: &str) -> Result<Vec<RawShiftRow>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    normalize_headers(&mut rdr)?;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawShiftRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn read_roster_rows(path: &str) -> Result<Vec<RawRosterRow>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    normalize_headers(&mut rdr)?;
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRosterRow>() {
        rows.push(result?);
    }
    Ok(rows)
}
