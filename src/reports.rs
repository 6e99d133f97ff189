// Contract x city cross-tab aggregation over a date range.
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::classify::classify_day;
use crate::config::ReportConfig;
use crate::dates::DateRange;
use crate::error::ValidationError;
use crate::types::{
    DailyClassification, MasterReportRow, RosterEntry, RunSummary, ShiftRecord, SummaryCell,
};
use crate::util::round2;

/// Build the master cross-tab.
///
/// Keys are every (contract, city) pair from the configured enumerations, in
/// enumeration order, which fixes the output row order across runs. Totals
/// come from roster membership alone; a roster entry whose pair is not part
/// of the configured product contributes nothing. Assigned counts are joined
/// through the roster by employee id -- shift records carry no contract, and
/// an id with no roster match is excluded rather than treated as an error.
/// Pairs that end with a zero total are omitted from the output.
pub fn aggregate(
    roster: &[RosterEntry],
    classifications: &[DailyClassification],
    config: &ReportConfig,
) -> Vec<MasterReportRow> {
    // Cells are emitted in ascending date order no matter how the
    // classifications were handed in.
    let mut dates: Vec<NaiveDate> = classifications.iter().map(|c| c.date).collect();
    dates.sort();
    dates.dedup();
    let date_index: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut pair_index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for contract in &config.contracts {
        for city in &config.cities {
            pair_index.insert((contract.as_str(), city.as_str()), pairs.len());
            pairs.push((contract.as_str(), city.as_str()));
        }
    }

    let mut totals = vec![0usize; pairs.len()];
    for entry in roster {
        if let Some(&i) = pair_index.get(&(entry.contract.as_str(), entry.city.as_str())) {
            totals[i] += 1;
        }
    }

    let roster_by_id: HashMap<&str, &RosterEntry> =
        roster.iter().map(|e| (e.id.as_str(), e)).collect();

    // assigned[pair][date] counts distinct employees: a double shift keeps
    // both records in the classification but moves this counter only once.
    let mut assigned = vec![vec![0usize; dates.len()]; pairs.len()];
    for classification in classifications {
        let di = date_index[&classification.date];
        let day_ids: HashSet<&str> = classification
            .assigned
            .iter()
            .map(|r: &ShiftRecord| r.employee_id.as_str())
            .collect();
        for id in day_ids {
            let Some(entry) = roster_by_id.get(id) else {
                continue;
            };
            if let Some(&pi) = pair_index.get(&(entry.contract.as_str(), entry.city.as_str())) {
                assigned[pi][di] += 1;
            }
        }
    }

    let mut rows = Vec::new();
    for (pi, (contract, city)) in pairs.iter().enumerate() {
        let total = totals[pi];
        if total == 0 {
            continue;
        }
        let cells = dates
            .iter()
            .enumerate()
            .map(|(di, date)| {
                let assigned_count = assigned[pi][di];
                SummaryCell {
                    date: *date,
                    assigned: assigned_count,
                    unassigned: total - assigned_count,
                    percentage: round2(assigned_count as f64 / total as f64 * 100.0),
                }
            })
            .collect();
        rows.push(MasterReportRow {
            contract: contract.to_string(),
            city: city.to_string(),
            total,
            cells,
        });
    }
    rows
}

/// Run the whole pipeline for one date range: classify every day, then
/// aggregate. Aborts before classifying anything when no shift records were
/// ingested at all.
pub fn build_master_report(
    roster: &[RosterEntry],
    records: &[ShiftRecord],
    range: &DateRange,
    config: &ReportConfig,
) -> Result<(Vec<DailyClassification>, Vec<MasterReportRow>), ValidationError> {
    if roster.is_empty() {
        return Err(ValidationError::EmptyRoster);
    }
    if records.is_empty() {
        return Err(ValidationError::NoShiftRecords);
    }
    let classifications: Vec<DailyClassification> = range
        .iter()
        .map(|date| classify_day(date, records, roster, config))
        .collect();
    let rows = aggregate(roster, &classifications, config);
    Ok((classifications, rows))
}

/// Whole-run statistics for the summary file. The overall percentage is the
/// assigned share of all (employee, day) slots covered by the report rows.
pub fn run_summary(
    roster: &[RosterEntry],
    records: &[ShiftRecord],
    rows: &[MasterReportRow],
) -> RunSummary {
    let days = rows.first().map(|r| r.cells.len()).unwrap_or(0);
    let contracts: HashSet<&str> = rows.iter().map(|r| r.contract.as_str()).collect();
    let assigned_slots: usize = rows
        .iter()
        .flat_map(|r| r.cells.iter().map(|c| c.assigned))
        .sum();
    let total_slots: usize = rows.iter().map(|r| r.total * days).sum();
    let overall_assigned_pct = if total_slots > 0 {
        round2(assigned_slots as f64 / total_slots as f64 * 100.0)
    } else {
        0.0
    };
    RunSummary {
        roster_size: roster.len(),
        shift_records: records.len(),
        days,
        contracts_reported: contracts.len(),
        city_pairs_reported: rows.len(),
        overall_assigned_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateRange;
    use crate::types::INVALID_TIME;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(id: &str, date: NaiveDate, city: &str) -> ShiftRecord {
        ShiftRecord {
            employee_id: id.to_string(),
            shift_status: "Completed".to_string(),
            planned_start_date: date,
            planned_start_time: "09:00".to_string(),
            planned_end_time: INVALID_TIME.to_string(),
            city: city.to_string(),
        }
    }

    fn entry(id: &str, contract: &str, city: &str) -> RosterEntry {
        RosterEntry {
            id: id.to_string(),
            name: format!("name-{}", id),
            contract: contract.to_string(),
            city: city.to_string(),
        }
    }

    fn config(contracts: &[&str], cities: &[&str]) -> ReportConfig {
        ReportConfig {
            contracts: contracts.iter().map(|s| s.to_string()).collect(),
            cities: cities.iter().map(|s| s.to_string()).collect(),
            ..ReportConfig::default()
        }
    }

    fn run(
        roster: &[RosterEntry],
        records: &[ShiftRecord],
        start: NaiveDate,
        end: NaiveDate,
        cfg: &ReportConfig,
    ) -> Vec<MasterReportRow> {
        let range = DateRange::new(start, end).unwrap();
        let (_, rows) = build_master_report(roster, records, &range, cfg).unwrap();
        rows
    }

    #[test]
    fn test_single_day_scenario() {
        // Three employees on one contract/city, one of them works one shift.
        let cfg = config(&["A"], &["X"]);
        let roster = vec![entry("e1", "A", "X"), entry("e2", "A", "X"), entry("e3", "A", "X")];
        let records = vec![record("e1", d(2024, 1, 5), "X")];
        let rows = run(&roster, &records, d(2024, 1, 5), d(2024, 1, 5), &cfg);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!((row.contract.as_str(), row.city.as_str()), ("A", "X"));
        assert_eq!(row.total, 3);
        assert_eq!(row.cells.len(), 1);
        let cell = &row.cells[0];
        assert_eq!(cell.assigned, 1);
        assert_eq!(cell.unassigned, 2);
        assert_eq!(cell.percentage, 33.33);
    }

    #[test]
    fn test_counts_partition_total_on_every_cell() {
        let cfg = config(&["A", "B"], &["X", "Y"]);
        let roster = vec![
            entry("e1", "A", "X"),
            entry("e2", "A", "X"),
            entry("e3", "B", "X"),
            entry("e4", "B", "Y"),
        ];
        let records = vec![
            record("e1", d(2024, 2, 1), "X"),
            record("e3", d(2024, 2, 2), "X"),
            record("e4", d(2024, 2, 3), "Y"),
        ];
        let rows = run(&roster, &records, d(2024, 2, 1), d(2024, 2, 3), &cfg);
        for row in &rows {
            let expected_total = roster
                .iter()
                .filter(|e| e.contract == row.contract && e.city == row.city)
                .count();
            assert_eq!(row.total, expected_total);
            assert_eq!(row.cells.len(), 3);
            for cell in &row.cells {
                assert_eq!(cell.assigned + cell.unassigned, row.total);
            }
        }
    }

    #[test]
    fn test_zero_total_pairs_are_omitted() {
        let cfg = config(&["A", "B"], &["X"]);
        let roster = vec![entry("e1", "A", "X")];
        // A shift by someone outside the roster must not resurrect pair (B, X).
        let records = vec![record("ghost", d(2024, 1, 5), "X")];
        let rows = run(&roster, &records, d(2024, 1, 5), d(2024, 1, 5), &cfg);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contract, "A");
        assert_eq!(rows[0].cells[0].assigned, 0);
    }

    #[test]
    fn test_join_goes_through_roster_not_shift_city() {
        // e1 is rostered in (A, X) but the shift row was exported by city Y.
        // The roster drives the bucket.
        let cfg = config(&["A"], &["X", "Y"]);
        let roster = vec![entry("e1", "A", "X")];
        let records = vec![record("e1", d(2024, 1, 5), "Y")];
        let rows = run(&roster, &records, d(2024, 1, 5), d(2024, 1, 5), &cfg);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "X");
        assert_eq!(rows[0].cells[0].assigned, 1);
    }

    #[test]
    fn test_undeclared_pair_is_dropped_from_crosstab() {
        let cfg = config(&["A"], &["X"]);
        let roster = vec![entry("e1", "A", "X"), entry("e2", "A", "Elsewhere")];
        let records = vec![record("e2", d(2024, 1, 5), "Elsewhere")];
        let rows = run(&roster, &records, d(2024, 1, 5), d(2024, 1, 5), &cfg);
        // e2's pair is not part of the configured product: no row, no count.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 1);
        assert_eq!(rows[0].cells[0].assigned, 0);
    }

    #[test]
    fn test_double_shift_counts_one_assignment() {
        let cfg = config(&["A"], &["X"]);
        let roster = vec![entry("e1", "A", "X"), entry("e2", "A", "X")];
        let records = vec![
            record("e1", d(2024, 1, 5), "X"),
            record("e1", d(2024, 1, 5), "X"),
        ];
        let rows = run(&roster, &records, d(2024, 1, 5), d(2024, 1, 5), &cfg);
        let cell = &rows[0].cells[0];
        assert_eq!(cell.assigned, 1);
        assert_eq!(cell.unassigned, 1);
        assert_eq!(cell.percentage, 50.0);
    }

    #[test]
    fn test_aggregate_is_deterministic_and_idempotent() {
        let cfg = config(&["B", "A"], &["Y", "X"]);
        let roster = vec![
            entry("e1", "A", "X"),
            entry("e2", "B", "Y"),
            entry("e3", "B", "X"),
        ];
        let records = vec![
            record("e2", d(2024, 3, 1), "Y"),
            record("e1", d(2024, 3, 2), "X"),
        ];
        let first = run(&roster, &records, d(2024, 3, 1), d(2024, 3, 2), &cfg);
        let second = run(&roster, &records, d(2024, 3, 1), d(2024, 3, 2), &cfg);
        assert_eq!(first, second);
        // Enumeration order, not alphabetical order.
        let order: Vec<(&str, &str)> = first
            .iter()
            .map(|r| (r.contract.as_str(), r.city.as_str()))
            .collect();
        assert_eq!(order, vec![("B", "Y"), ("B", "X"), ("A", "X")]);
    }

    #[test]
    fn test_cells_sorted_by_date_regardless_of_input_order() {
        let cfg = config(&["A"], &["X"]);
        let roster = vec![entry("e1", "A", "X")];
        let c1 = classify_day(d(2024, 1, 6), &[record("e1", d(2024, 1, 6), "X")], &roster, &cfg);
        let c2 = classify_day(d(2024, 1, 5), &[], &roster, &cfg);
        let rows = aggregate(&roster, &[c1, c2], &cfg);
        let cell_dates: Vec<NaiveDate> = rows[0].cells.iter().map(|c| c.date).collect();
        assert_eq!(cell_dates, vec![d(2024, 1, 5), d(2024, 1, 6)]);
    }

    #[test]
    fn test_pipeline_preconditions() {
        let cfg = config(&["A"], &["X"]);
        let roster = vec![entry("e1", "A", "X")];
        let range = DateRange::new(d(2024, 1, 5), d(2024, 1, 5)).unwrap();

        let err = build_master_report(&roster, &[], &range, &cfg).unwrap_err();
        assert_eq!(err, ValidationError::NoShiftRecords);

        let records = vec![record("e1", d(2024, 1, 5), "X")];
        let err = build_master_report(&[], &records, &range, &cfg).unwrap_err();
        assert_eq!(err, ValidationError::EmptyRoster);
    }

    #[test]
    fn test_run_summary_overall_percentage() {
        let cfg = config(&["A"], &["X"]);
        let roster = vec![entry("e1", "A", "X"), entry("e2", "A", "X")];
        let records = vec![
            record("e1", d(2024, 1, 5), "X"),
            record("e1", d(2024, 1, 6), "X"),
            record("e2", d(2024, 1, 6), "X"),
        ];
        let rows = run(&roster, &records, d(2024, 1, 5), d(2024, 1, 6), &cfg);
        let summary = run_summary(&roster, &records, &rows);
        assert_eq!(summary.roster_size, 2);
        assert_eq!(summary.shift_records, 3);
        assert_eq!(summary.days, 2);
        assert_eq!(summary.contracts_reported, 1);
        // 3 assignments over 2 employees x 2 days.
        assert_eq!(summary.overall_assigned_pct, 75.0);
    }
}
