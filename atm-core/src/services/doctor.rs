//! Doctor service - health checks on the raw account data file
//!
//! Works on the file as plain JSON, so it can describe problems that would
//! make the store refuse to load.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{Pin, DEPOSIT_PREFIX, WITHDRAW_PREFIX};

pub struct DoctorService {
    data_path: PathBuf,
}

impl DoctorService {
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path }
    }

    /// Run all health checks
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let mut checks = BTreeMap::new();

        if !self.data_path.exists() {
            checks.insert(
                "data_file".to_string(),
                CheckResult::pass("No data file yet; it is created with the first account"),
            );
            return Ok(DoctorResult::from_checks(checks));
        }

        let content = std::fs::read_to_string(&self.data_path)?;
        let root = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                checks.insert(
                    "data_file".to_string(),
                    CheckResult::error("Data file is not a JSON object", None),
                );
                return Ok(DoctorResult::from_checks(checks));
            }
            Err(e) => {
                checks.insert(
                    "data_file".to_string(),
                    CheckResult::error(format!("Data file is not valid JSON: {}", e), None),
                );
                return Ok(DoctorResult::from_checks(checks));
            }
        };
        checks.insert(
            "data_file".to_string(),
            CheckResult::pass(format!("{} account(s) readable", root.len())),
        );

        // PIN keys
        let bad_pins: Vec<Value> = root
            .keys()
            .filter(|k| !Pin::is_valid(k))
            .map(|k| json!({ "key": k }))
            .collect();
        checks.insert(
            "pin_format".to_string(),
            if bad_pins.is_empty() {
                CheckResult::pass("All PINs are 4 digits")
            } else {
                CheckResult::error(
                    format!("{} key(s) are not 4-digit PINs", bad_pins.len()),
                    Some(bad_pins),
                )
            },
        );

        // Balances
        let mut bad_balances = Vec::new();
        for (key, record) in &root {
            match record.get("balance").and_then(Value::as_f64) {
                Some(b) if b >= 0.0 => {}
                Some(_) => bad_balances.push(json!({ "key": key, "problem": "negative" })),
                None => bad_balances.push(json!({ "key": key, "problem": "missing or not a number" })),
            }
        }
        checks.insert(
            "balances".to_string(),
            if bad_balances.is_empty() {
                CheckResult::pass("All balances are non-negative numbers")
            } else {
                CheckResult::error(
                    format!("{} account(s) have an invalid balance", bad_balances.len()),
                    Some(bad_balances),
                )
            },
        );

        // History entries
        let mut malformed = Vec::new();
        let mut unrecognised = Vec::new();
        for (key, record) in &root {
            match record.get("history") {
                None => {}
                Some(Value::Array(entries)) => {
                    let non_strings = entries.iter().filter(|e| !e.is_string()).count();
                    if non_strings > 0 {
                        malformed.push(json!({ "key": key, "non_string_entries": non_strings }));
                    }
                    let unknown = entries
                        .iter()
                        .filter_map(Value::as_str)
                        .filter(|e| !e.starts_with(DEPOSIT_PREFIX) && !e.starts_with(WITHDRAW_PREFIX))
                        .count();
                    if unknown > 0 {
                        unrecognised.push(json!({ "key": key, "unrecognised_entries": unknown }));
                    }
                }
                Some(_) => malformed.push(json!({ "key": key, "problem": "history is not a list" })),
            }
        }
        checks.insert(
            "history_entries".to_string(),
            if !malformed.is_empty() {
                CheckResult::error(
                    format!("{} account(s) have a malformed history", malformed.len()),
                    Some(malformed),
                )
            } else if !unrecognised.is_empty() {
                CheckResult::warning(
                    format!("{} account(s) have unrecognised history entries", unrecognised.len()),
                    Some(unrecognised),
                )
            } else {
                CheckResult::pass("All history entries are deposits or withdrawals")
            },
        );

        Ok(DoctorResult::from_checks(checks))
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: BTreeMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

impl DoctorResult {
    fn from_checks(checks: BTreeMap<String, CheckResult>) -> Self {
        let count = |status: &str| checks.values().filter(|c| c.status == status).count();
        let summary = DoctorSummary {
            passed: count("pass"),
            warnings: count("warning"),
            errors: count("error"),
        };
        Self { checks, summary }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Value>>,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            status: "pass".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warning(message: impl Into<String>, details: Option<Vec<Value>>) -> Self {
        Self {
            status: "warning".to_string(),
            message: message.into(),
            details,
        }
    }

    fn error(message: impl Into<String>, details: Option<Vec<Value>>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}
