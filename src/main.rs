// Entry point and high-level CLI flow.
//
// The binary is thin glue around the reporting engine:
// - Option [1] loads the roster and the per-city shift files, printing
//   ingestion diagnostics.
// - Option [2] asks for a date range, runs the pipeline and writes the
//   master report CSV plus a JSON run summary.
// - An optional follow-up lists unassigned employees for a chosen date.
//
// All validation failures surface here as printed messages; the engine
// modules never print.
mod classify;
mod config;
mod dates;
mod error;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use config::ReportConfig;
use dates::DateRange;
use types::{RosterEntry, ShiftRecord};

const CONFIG_PATH: &str = "report_config.json";
const ROSTER_PATH: &str = "roster.csv";
const MASTER_REPORT_PATH: &str = "master_report.csv";
const SUMMARY_PATH: &str = "summary.json";

// Simple in-memory app state so we only load the files once but can generate
// reports for several date ranges in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        roster: None,
        records: None,
    })
});

struct AppState {
    roster: Option<Vec<RosterEntry>>,
    records: Option<Vec<ShiftRecord>>,
}

/// Read a single line of input after printing a prompt.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Keep prompting until the user types a parsable date.
fn prompt_date(label: &str) -> NaiveDate {
    loop {
        let raw = read_line(&format!("{} (YYYY-MM-DD): ", label));
        match util::parse_date_safe(Some(&raw)) {
            Some(d) => return d,
            None => println!("Could not parse '{}' as a date.", raw),
        }
    }
}

/// Handle option [1]: load the roster and every configured city file.
///
/// City files are expected as `<City>.csv` next to the binary; missing ones
/// are noted and skipped so a deployment can report on a subset of cities.
fn handle_load(config: &ReportConfig) {
    let roster = match loader::read_roster_rows(ROSTER_PATH) {
        Ok(rows) => match loader::load_roster(&rows) {
            Ok(roster) => roster,
            Err(e) => {
                eprintln!("Roster validation failed: {}\n", e);
                return;
            }
        },
        Err(e) => {
            eprintln!("Failed to read {}: {}\n", ROSTER_PATH, e);
            return;
        }
    };
    println!(
        "Roster loaded: {} employees.",
        util::format_int(roster.len() as i64)
    );

    let mut records: Vec<ShiftRecord> = Vec::new();
    for city in &config.cities {
        let path = format!("{}.csv", city);
        if !Path::new(&path).exists() {
            println!("Note: {} not found, skipping.", path);
            continue;
        }
        match loader::read_shift_rows(&path) {
            Ok(rows) => {
                let (city_records, report) = loader::ingest_raw_records(city, &rows);
                println!(
                    "{}: {} rows read, {} kept ({} excluded status, {} missing id, {} bad date).",
                    city,
                    util::format_int(report.total_rows as i64),
                    util::format_int(report.kept as i64),
                    report.skipped_status,
                    report.skipped_missing_id,
                    report.skipped_bad_date
                );
                if report.invalid_times > 0 {
                    println!(
                        "Note: {} records in {} carry an unparsable planned time.",
                        report.invalid_times, city
                    );
                }
                records.extend(city_records);
            }
            Err(e) => {
                eprintln!("Failed to read {}: {}", path, e);
            }
        }
    }
    println!(
        "Total shift records ingested: {}.\n",
        util::format_int(records.len() as i64)
    );

    let mut state = APP_STATE.lock().unwrap();
    state.roster = Some(roster);
    state.records = Some(records);
}

/// Handle option [2]: run the pipeline for a date range and write outputs.
fn handle_generate_reports(config: &ReportConfig) {
    let (roster, records) = {
        let state = APP_STATE.lock().unwrap();
        (state.roster.clone(), state.records.clone())
    };
    let (Some(roster), Some(records)) = (roster, records) else {
        println!("Error: No data loaded. Please load the files first (option 1).\n");
        return;
    };

    let start = prompt_date("Start date");
    let end = prompt_date("End date");
    let range = match DateRange::new(start, end) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid range: {}\n", e);
            return;
        }
    };

    println!(
        "\nGenerating master report for {} day(s), {} to {}...\n",
        range.len(),
        range.start(),
        range.end()
    );
    let (classifications, rows) =
        match reports::build_master_report(&roster, &records, &range, config) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Report generation failed: {}\n", e);
                return;
            }
        };

    output::preview_contract_tables(&rows, config);

    if let Err(e) = output::write_master_csv(MASTER_REPORT_PATH, &rows, config) {
        eprintln!("Write error: {}", e);
    } else {
        println!("(Full cross-tab exported to {})", MASTER_REPORT_PATH);
    }

    let summary = reports::run_summary(&roster, &records, &rows);
    if let Err(e) = output::write_json(SUMMARY_PATH, &summary) {
        eprintln!("Write error: {}", e);
    } else {
        println!(
            "Run summary written to {} (overall assigned: {}).\n",
            SUMMARY_PATH,
            util::format_pct(summary.overall_assigned_pct)
        );
    }

    if read_line("Show shift details for a date? (Y/N): ").to_uppercase() == "Y" {
        let date = prompt_date("Date");
        match classifications.iter().find(|c| c.date == date) {
            Some(classification) => {
                let shifts: Vec<Vec<String>> = classification
                    .assigned
                    .iter()
                    .map(|r| {
                        vec![
                            r.employee_id.clone(),
                            r.planned_start_time.clone(),
                            r.planned_end_time.clone(),
                            r.shift_status.clone(),
                            r.city.clone(),
                        ]
                    })
                    .collect();
                println!("\nAssigned shifts on {} ({} records):", date, shifts.len());
                output::preview_listing(
                    &["Employee ID", "Planned Start", "Planned End", "Status", "City"],
                    &shifts,
                    20,
                );

                let listing: Vec<Vec<String>> = classify::unassigned_entries(classification, &roster)
                    .iter()
                    .map(|e| vec![e.id.clone(), e.name.clone(), e.city.clone()])
                    .collect();
                println!("Unassigned on {} ({} employees):", date, listing.len());
                output::preview_listing(&["Employee ID", "Employee Name", "City"], &listing, 20);
            }
            None => println!("{} is outside the generated range.\n", date),
        }
    }
}

fn main() {
    let config = match config::load_or_default(CONFIG_PATH) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {}", CONFIG_PATH, e);
            std::process::exit(1);
        }
    };
    println!(
        "Shift assignment reporting ({} contracts, {} cities, {}).\n",
        config.contracts.len(),
        config.cities.len(),
        config.timezone
    );

    loop {
        println!("[1] Load roster and city files");
        println!("[2] Generate master report\n");
        match read_line("Enter choice: ").as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                handle_generate_reports(&config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
