//! Dataset model and loading
//!
//! The input file carries a registry snapshot (customers and their phone
//! lines) followed by the event log. Events are expected in chronological
//! order; that ordering is trusted, not validated.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use tarifa_core::{AppError, AppResult};

use crate::event::TelecomEvent;

/// A phone line as registered in the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Phone number
    pub number: String,

    /// Contract kind name (`prepaid`, `mtm`, `term`); kept raw so unknown
    /// kinds degrade at registry construction instead of failing the parse
    pub contract: String,
}

/// A customer and their registered lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer identifier
    pub id: u32,

    /// Registered phone lines
    pub lines: Vec<LineRecord>,
}

/// The full input dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Customer/line registry snapshot
    pub customers: Vec<CustomerRecord>,

    /// Chronologically-ordered event log
    pub events: Vec<TelecomEvent>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let file = File::open(path.as_ref())?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        debug!(
            customers = dataset.customers.len(),
            events = dataset.events.len(),
            "dataset loaded from {}",
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Load a dataset from any reader of JSON text
    pub fn from_reader(reader: impl Read) -> AppResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Structural validation of the parsed dataset
    ///
    /// Checks the invariants the billing core relies on: non-negative call
    /// durations and non-empty identifiers. Event ordering is not checked.
    pub fn validate(&self) -> AppResult<()> {
        for customer in &self.customers {
            if customer.lines.is_empty() {
                return Err(AppError::Dataset(format!(
                    "customer {} has no phone lines",
                    customer.id
                )));
            }
            for line in &customer.lines {
                if line.number.trim().is_empty() {
                    return Err(AppError::Dataset(format!(
                        "customer {} has a line with an empty number",
                        customer.id
                    )));
                }
                if line.contract.trim().is_empty() {
                    return Err(AppError::Dataset(format!(
                        "line {} has an empty contract kind",
                        line.number
                    )));
                }
            }
        }

        for event in &self.events {
            match event {
                TelecomEvent::Call(call) => {
                    if call.duration < 0 {
                        return Err(AppError::Dataset(format!(
                            "call from {} at {} has negative duration {}",
                            call.src_number, call.time, call.duration
                        )));
                    }
                    if call.src_number.trim().is_empty() || call.dst_number.trim().is_empty() {
                        return Err(AppError::Dataset(format!(
                            "call at {} is missing an endpoint number",
                            call.time
                        )));
                    }
                }
                TelecomEvent::Sms(sms) => {
                    if sms.src_number.trim().is_empty() || sms.dst_number.trim().is_empty() {
                        return Err(AppError::Dataset(format!(
                            "sms at {} is missing an endpoint number",
                            sms.time
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl FromStr for Dataset {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "customers": [
            {"id": 7123, "lines": [
                {"number": "422-4785", "contract": "mtm"},
                {"number": "934-0592", "contract": "term"}
            ]},
            {"id": 3895, "lines": [
                {"number": "731-0105", "contract": "prepaid"}
            ]}
        ],
        "events": [
            {"type": "call", "src_number": "422-4785", "dst_number": "731-0105",
             "time": "2018-01-03 02:14:31", "duration": 117,
             "src_loc": [-79.42, 43.64], "dst_loc": [-79.52, 43.75]},
            {"type": "sms", "src_number": "731-0105", "dst_number": "422-4785",
             "time": "2018-01-03 02:20:00",
             "src_loc": [-79.52, 43.75], "dst_loc": [-79.42, 43.64]}
        ]
    }"#;

    #[test]
    fn test_parse_and_validate_sample() {
        let dataset: Dataset = SAMPLE.parse().unwrap();
        assert_eq!(dataset.customers.len(), 2);
        assert_eq!(dataset.customers[0].lines.len(), 2);
        assert_eq!(dataset.events.len(), 2);
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn test_negative_duration_fails_validation() {
        let raw = SAMPLE.replace("\"duration\": 117", "\"duration\": -5");
        let dataset: Dataset = raw.parse().unwrap();
        let err = dataset.validate().unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
        assert!(err.to_string().contains("negative duration"));
    }

    #[test]
    fn test_empty_line_number_fails_validation() {
        let raw = SAMPLE.replace("\"number\": \"934-0592\"", "\"number\": \"  \"");
        let dataset: Dataset = raw.parse().unwrap();
        assert!(dataset.validate().is_err());
    }

    #[test]
    fn test_customer_without_lines_fails_validation() {
        let raw = r#"{"customers": [{"id": 1, "lines": []}], "events": []}"#;
        let dataset: Dataset = raw.parse().unwrap();
        assert!(dataset.validate().is_err());
    }

    #[test]
    fn test_unknown_contract_kind_passes_structural_validation() {
        // Unknown kinds are an operator warning at registry construction,
        // not a parse failure.
        let raw = SAMPLE.replace("\"contract\": \"term\"", "\"contract\": \"gold\"");
        let dataset: Dataset = raw.parse().unwrap();
        assert!(dataset.validate().is_ok());
    }
}
