use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// `strftime` pattern of a run id, e.g. `20250314_093012`
pub const RUN_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Identifier of one pipeline execution, derived from the start timestamp
///
/// Two runs started in different seconds get different ids; runs started in
/// the same second share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(String);

impl RunId {
    /// Run id for the current local time
    pub fn now() -> Self {
        Self::from_timestamp(&Local::now())
    }

    /// Run id for a given timestamp, truncated to the second
    pub fn from_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(timestamp.format(RUN_ID_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RunId {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveDateTime::parse_from_str(s, RUN_ID_FORMAT)?;
        Ok(Self(parsed.format(RUN_ID_FORMAT).to_string()))
    }
}

/// Paths that belong to one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: RunId,
    /// `<logs_dir>/mt_run_<run_id>.log`
    pub log_file_path: PathBuf,
    /// `<logs_dir>/mt_keys_<run_id>.csv`, handed to the engine for its status ledger
    pub keys_log_path: PathBuf,
}

impl RunContext {
    pub fn new(run_id: RunId, logs_dir: &Path) -> Self {
        let log_file_path = logs_dir.join(log_file_name(&run_id));
        let keys_log_path = logs_dir.join(keys_log_file_name(&run_id));

        Self {
            run_id,
            log_file_path,
            keys_log_path,
        }
    }
}

pub fn log_file_name(run_id: &RunId) -> String {
    format!("mt_run_{}.log", run_id)
}

pub fn keys_log_file_name(run_id: &RunId) -> String {
    format!("mt_keys_{}.csv", run_id)
}
