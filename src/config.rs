// Deployment configuration for the reporting engine.
//
// The contract and city enumerations, the timezone and the date display
// formats are opaque inputs to the core: they are loaded once here and passed
// into every ingest/classify/aggregate call site, never read from inside the
// engine modules.
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Fixed contract enumeration; drives cross-tab row order.
    pub contracts: Vec<String>,
    /// Fixed city enumeration; drives cross-tab column order within a contract.
    pub cities: Vec<String>,
    /// IANA timezone identifier of the deployment. Opaque pass-through: shift
    /// rows already carry calendar dates when they reach the core.
    pub timezone: String,
    /// Format used to key shift records to a calendar date.
    #[serde(default = "default_date_key_format")]
    pub date_key_format: String,
    /// Format for per-date column labels in rendered reports (day-of-month).
    #[serde(default = "default_column_date_format")]
    pub column_date_format: String,
}

fn default_date_key_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_column_date_format() -> String {
    "%d".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        let contracts = [
            "Al Abtal",
            "Al Alamia",
            "Ebad El rahman",
            "El Tohami",
            "MTA",
            "Stop Car",
            "Tanta Car",
            "Tantawy",
            "Team mh for Delivery",
            "Wasaly",
            "Zero Zero Seven",
        ];
        let cities = [
            "Assiut",
            "Beni Suef",
            "Hurghada",
            "Ismalia",
            "Minya",
            "Port said",
            "Suez",
        ];
        ReportConfig {
            contracts: contracts.iter().map(|s| s.to_string()).collect(),
            cities: cities.iter().map(|s| s.to_string()).collect(),
            timezone: "Africa/Cairo".to_string(),
            date_key_format: default_date_key_format(),
            column_date_format: default_column_date_format(),
        }
    }
}

pub fn load_config(path: &str) -> Result<ReportConfig, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let config: ReportConfig = serde_json::from_str(&raw)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to the built-in deployment
/// defaults. A malformed file is an error rather than a silent fallback.
pub fn load_or_default(path: &str) -> Result<ReportConfig, Box<dyn Error>> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        Ok(ReportConfig::default())
    }
}
