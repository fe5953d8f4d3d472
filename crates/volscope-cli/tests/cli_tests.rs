//! End-to-end tests for the volscope binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn volscope() -> Command {
    Command::cargo_bin("volscope").unwrap()
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn atm_pair_request(ticker: &str) -> Value {
    json!({
        "ticker": ticker,
        "stock_price": 100.0,
        "historical_volatility": 25.0,
        "as_of": "2025-06-02",
        "options_chain": [
            {"expiration_date": "2025-07-02", "strike_price": 100.0, "contract_type": "call",
             "implied_volatility": 0.30, "delta": 0.50},
            {"expiration_date": "2025-07-02", "strike_price": 100.0, "contract_type": "put",
             "implied_volatility": 0.35, "delta": -0.50}
        ]
    })
}

// =============================================================================
// ANALYZE
// =============================================================================

#[test]
fn test_analyze_json() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "aapl.json", &atm_pair_request("AAPL").to_string());

    let output = volscope()
        .args(["--format", "json", "analyze", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ticker"], "AAPL");
    assert_eq!(json["atm_iv_percent"], 30.0);
    assert_eq!(json["iv_hv_spread_percent"], 5.0);
    assert_eq!(json["skew_25_delta"], 5.0);
}

#[test]
fn test_analyze_table() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "aapl.json", &atm_pair_request("AAPL").to_string());

    volscope()
        .args(["analyze", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("ATM IV"))
        .stdout(predicate::str::contains("30.00%"))
        .stdout(predicate::str::contains("30 DTE"))
        .stdout(predicate::str::contains("put skew"));
}

#[test]
fn test_analyze_minimal() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "aapl.json", &atm_pair_request("AAPL").to_string());

    volscope()
        .args(["--format", "minimal", "analyze", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout("30 5 5\n");
}

#[test]
fn test_analyze_as_of_flag_overrides_request() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "aapl.json", &atm_pair_request("AAPL").to_string());

    volscope()
        .args(["analyze", "--as-of", "2025-06-20", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient options data"))
        .stderr(predicate::str::contains("no_qualifying_expiration"));
}

#[test]
fn test_analyze_one_sided_chain_fails() {
    let dir = TempDir::new().unwrap();
    let mut request = atm_pair_request("TSLA");
    request["options_chain"].as_array_mut().unwrap().pop();
    let input = write(&dir, "tsla.json", &request.to_string());

    volscope()
        .args(["analyze", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_calls_or_puts"));
}

#[test]
fn test_analyze_missing_keys() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bad.json", r#"{"ticker": "AAPL"}"#);

    volscope()
        .args(["analyze", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required keys"));
}

#[test]
fn test_analyze_with_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "aapl.json", &atm_pair_request("AAPL").to_string());
    let config = write(&dir, "volscope.toml", "[analysis]\nmin_dte = 45\n");

    volscope()
        .arg("--config")
        .arg(&config)
        .args(["analyze", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("45 DTE"));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "aapl.json", &atm_pair_request("AAPL").to_string());
    let config = write(&dir, "volscope.toml", "[analysis]\ncall_target_delta = 2.0\n");

    volscope()
        .arg("--config")
        .arg(&config)
        .args(["analyze", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

// =============================================================================
// BATCH
// =============================================================================

#[test]
fn test_batch_csv_lists_unavailable_tickers() {
    let dir = TempDir::new().unwrap();
    let mut empty = atm_pair_request("EMPTY");
    empty["options_chain"] = json!([]);
    let requests = json!([atm_pair_request("AAPL"), empty]);
    let input = write(&dir, "batch.json", &requests.to_string());

    volscope()
        .args(["--format", "csv", "batch", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("AAPL,ok,30.00,5.00,5.00"))
        .stdout(predicate::str::contains("EMPTY,unavailable,,,,no_qualifying_expiration"));
}

#[test]
fn test_batch_json_report() {
    let dir = TempDir::new().unwrap();
    let requests = json!({"requests": [atm_pair_request("AAPL"), {"ticker": "BROKEN"}]});
    let input = write(&dir, "batch.json", &requests.to_string());

    let output = volscope()
        .args(["--format", "json", "batch", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["total"], 2);
    assert_eq!(json["stats"]["succeeded"], 1);
    assert_eq!(json["results"][1]["status"], "unavailable");
    assert_eq!(json["results"][1]["error"], "invalid_input");
}

// =============================================================================
// PRICE HISTORY
// =============================================================================

#[test]
fn test_hv_flat_prices() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("date,close\n");
    for day in 1..=31 {
        csv.push_str(&format!("2025-01-{day:02},100.0\n"));
    }
    let input = write(&dir, "prices.csv", &csv);

    volscope()
        .args(["--format", "minimal", "hv", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_hv_short_history_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prices.csv", "close\n100\n101\n");

    volscope()
        .args(["hv", "--input"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient history"));
}

#[test]
fn test_range_rank() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bars.csv", "high,low,close\n12,8,10\n11,9,9\n");

    let output = volscope()
        .args(["--format", "json", "range", "--lookback", "2", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["52_week_high"], 12.0);
    assert_eq!(json["52_week_low"], 8.0);
    assert_eq!(json["52_week_rank_percent"], 25.0);
}

#[test]
fn test_range_rank_with_dated_bars() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "bars.csv",
        "date,high,low,close\n2025-06-02,12,8,10\n2025-06-03,11,9,9\n",
    );

    let output = volscope()
        .args(["--format", "json", "range", "--lookback", "2", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["as_of"], "2025-06-03");
    assert_eq!(json["52_week_rank_percent"], 25.0);
}

#[test]
fn test_range_rank_bad_bar_date() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "bars.csv", "date,high,low,close\n06/02/2025,12,8,10\n");

    volscope()
        .args(["range", "--lookback", "1", "--input"])
        .arg(&input)
        .assert()
        .failure();
}
