// Rendering of the master report: CSV export, JSON summary, console previews.
//
// Everything in this module is presentation. The aggregation output is the
// source of truth; grand-total lines are recomputed here from the rows they
// summarize and never flow back into the core.
use std::error::Error;

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::config::ReportConfig;
use crate::types::MasterReportRow;
use crate::util::{format_pct, round2};

/// Per-date column labels, taken from the first row's cells. Every row of one
/// report covers the same date series.
fn date_labels(rows: &[MasterReportRow], config: &ReportConfig) -> Vec<String> {
    rows.first()
        .map(|row| {
            row.cells
                .iter()
                .map(|c| c.date.format(&config.column_date_format).to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn header_cells(labels: &[String], with_contract: bool) -> Vec<String> {
    let mut header = Vec::new();
    if with_contract {
        header.push("Contract".to_string());
    }
    header.push("City".to_string());
    header.push("HQ".to_string());
    for label in labels {
        header.push(format!("Assigned {}", label));
        header.push(format!("Unassigned {}", label));
        header.push(format!("% of Assigned {}", label));
    }
    header
}

fn body_cells(row: &MasterReportRow) -> Vec<String> {
    let mut cells = vec![row.city.clone(), row.total.to_string()];
    for cell in &row.cells {
        cells.push(cell.assigned.to_string());
        cells.push(cell.unassigned.to_string());
        cells.push(format_pct(cell.percentage));
    }
    cells
}

/// Grand-total line for one contract's rows: headcount and per-date counts
/// summed, percentage recomputed from the sums.
fn grand_total_cells(group: &[&MasterReportRow]) -> Vec<String> {
    let total: usize = group.iter().map(|r| r.total).sum();
    let mut cells = vec!["Grand Total".to_string(), total.to_string()];
    let days = group.first().map(|r| r.cells.len()).unwrap_or(0);
    for di in 0..days {
        let assigned: usize = group.iter().map(|r| r.cells[di].assigned).sum();
        let unassigned: usize = group.iter().map(|r| r.cells[di].unassigned).sum();
        let pct = if total > 0 {
            round2(assigned as f64 / total as f64 * 100.0)
        } else {
            0.0
        };
        cells.push(assigned.to_string());
        cells.push(unassigned.to_string());
        cells.push(format_pct(pct));
    }
    cells
}

/// Export the full cross-tab as one flat CSV, one line per (contract, city)
/// row. Column count depends on the date range, so records are written by
/// hand rather than through serde.
pub fn write_master_csv(
    path: &str,
    rows: &[MasterReportRow],
    config: &ReportConfig,
) -> Result<(), Box<dyn Error>> {
    let labels = date_labels(rows, config);
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header_cells(&labels, true))?;
    for row in rows {
        let mut record = vec![row.contract.clone()];
        record.extend(body_cells(row));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print one markdown table per contract, each closed by a Grand Total line.
/// Row grouping relies on the aggregator's contract-major ordering.
pub fn preview_contract_tables(rows: &[MasterReportRow], config: &ReportConfig) {
    let labels = date_labels(rows, config);
    let mut start = 0;
    while start < rows.len() {
        let contract = rows[start].contract.as_str();
        let mut end = start;
        while end < rows.len() && rows[end].contract == contract {
            end += 1;
        }
        let group: Vec<&MasterReportRow> = rows[start..end].iter().collect();

        println!("{}", contract);
        let mut builder = Builder::default();
        builder.push_record(header_cells(&labels, false));
        for row in &group {
            builder.push_record(body_cells(row));
        }
        builder.push_record(grand_total_cells(&group));
        let table = builder.build().with(Style::markdown()).to_string();
        println!("{}\n", table);

        start = end;
    }
}

/// Small generic listing table, used for the per-date assigned-shift and
/// unassigned-employee previews.
pub fn preview_listing(header: &[&str], rows: &[Vec<String>], max_rows: usize) {
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());
    for row in rows.iter().take(max_rows) {
        builder.push_record(row.clone());
    }
    let table = builder.build().with(Style::markdown()).to_string();
    println!("{}", table);
    if rows.len() > max_rows {
        println!("... and {} more", rows.len() - max_rows);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryCell;
    use chrono::NaiveDate;

    fn row(contract: &str, city: &str, total: usize, assigned: &[usize]) -> MasterReportRow {
        let cells = assigned
            .iter()
            .enumerate()
            .map(|(i, a)| SummaryCell {
                date: NaiveDate::from_ymd_opt(2024, 1, 5 + i as u32).unwrap(),
                assigned: *a,
                unassigned: total - a,
                percentage: round2(*a as f64 / total as f64 * 100.0),
            })
            .collect();
        MasterReportRow {
            contract: contract.to_string(),
            city: city.to_string(),
            total,
            cells,
        }
    }

    #[test]
    fn test_header_tracks_date_columns() {
        let cfg = ReportConfig::default();
        let rows = vec![row("A", "X", 3, &[1, 2])];
        let labels = date_labels(&rows, &cfg);
        assert_eq!(labels, vec!["05", "06"]);
        let header = header_cells(&labels, true);
        assert_eq!(header.len(), 3 + 2 * 3);
        assert_eq!(header[3], "Assigned 05");
        assert_eq!(header[8], "% of Assigned 06");
    }

    #[test]
    fn test_grand_total_sums_counts_and_recomputes_pct() {
        let rows = vec![row("A", "X", 3, &[1]), row("A", "Y", 1, &[1])];
        let group: Vec<&MasterReportRow> = rows.iter().collect();
        let cells = grand_total_cells(&group);
        assert_eq!(cells[0], "Grand Total");
        assert_eq!(cells[1], "4");
        assert_eq!(cells[2], "2");
        assert_eq!(cells[3], "2");
        assert_eq!(cells[4], "50.00%");
    }
}
