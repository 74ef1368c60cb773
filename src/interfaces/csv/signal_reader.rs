use crate::domain::flow::{FlowOutcome, FlowResult};
use crate::error::{Result, SessionError};
use serde::Deserialize;
use std::io::Read;

/// One row of a recorded flow signal file.
#[derive(Debug, Deserialize)]
struct SignalRecord {
    request_code: i32,
    outcome: String,
    payload: Option<String>,
}

impl TryFrom<SignalRecord> for FlowResult {
    type Error = SessionError;

    fn try_from(record: SignalRecord) -> Result<Self> {
        let outcome = parse_outcome(&record.outcome)?;
        let payload = record
            .payload
            .filter(|p| !p.is_empty())
            .map(String::into_bytes);
        Ok(FlowResult::new(record.request_code, outcome, payload))
    }
}

fn parse_outcome(raw: &str) -> Result<FlowOutcome> {
    match raw.to_ascii_lowercase().as_str() {
        "ok" => Ok(FlowOutcome::Ok),
        "canceled" | "cancelled" => Ok(FlowOutcome::Canceled),
        other => other
            .parse::<i32>()
            .map(FlowOutcome::from_result_code)
            .map_err(|_| SessionError::InvalidSignal(format!("unknown outcome '{}'", raw))),
    }
}

/// Reads recorded flow completion signals from a CSV source.
///
/// Expects the columns `request_code, outcome, payload`. The payload column
/// holds the JSON payload text and may be empty.
pub struct FlowSignalReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> FlowSignalReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one `FlowResult` per row.
    pub fn signals(self) -> impl Iterator<Item = Result<FlowResult>> {
        self.reader
            .into_deserialize::<SignalRecord>()
            .map(|record| FlowResult::try_from(record?))
    }
}
