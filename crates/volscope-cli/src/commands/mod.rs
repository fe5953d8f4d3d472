//! CLI command implementations.

pub mod analyze;
pub mod batch;
pub mod hv;
pub mod range;

// Re-export submodules for convenience
pub use analyze::AnalyzeArgs;
pub use batch::BatchArgs;
pub use hv::HvArgs;
pub use range::RangeArgs;

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use volscope_analytics::AnalysisConfig;
use volscope_core::Date;

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// The reference date: `--as-of` when given, else today.
pub fn reference_date(as_of: Option<&str>) -> CliResult<Date> {
    as_of.map_or_else(|| Ok(Date::today()), parse_date)
}

/// Reads a whole input file, or stdin for `-`.
pub fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Reads a CSV file with a header row into records.
///
/// Columns the record does not name are ignored.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> CliResult<Vec<T>> {
    let content = read_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let records = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(records)
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    analysis: AnalysisConfig,
}

/// Loads analysis parameters from the `[analysis]` table of a TOML file.
///
/// The server's config file works as is. Without a file the defaults apply.
pub fn load_analysis_config(path: Option<&Path>) -> CliResult<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    file.analysis
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(file.analysis)
}
