/*
 * Copyright © 2025, the nightplan authors. All rights reserved.
 *
 * The “nightplan” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NightplanError>;

#[derive(Error,Debug)]
pub enum NightplanError {

    /// a remote resource could not be retrieved (network error or timeout) - not retried
    #[error("failed to fetch {resource}: {reason}")]
    FetchError { resource: String, reason: String },

    /// caller referenced a schedule row outside the loaded sheet
    #[error("no schedule row {0}")]
    RowNotFound( usize ),

    /// malformed clock string in a schedule row
    #[error("malformed clock time {value:?} in row {row}")]
    TimeParse { row: String, value: String },

    /// requested satellite name is not a member of the current satellite catalog.
    /// recoverable - the expected remediation is a corrected name, without re-fetching catalogs
    #[error("satellite {0} not in catalog")]
    SatelliteNotFound( String ),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("config error {0}")]
    ConfigError( String ),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed( String )
}

impl NightplanError {
    /// satellite-name mismatches are user-recoverable, everything else aborts the operation in progress
    pub fn is_recoverable (&self)->bool {
        matches!( self, NightplanError::SatelliteNotFound(_))
    }
}

pub fn op_failed (msg: impl ToString)->NightplanError {
    NightplanError::OpFailed( msg.to_string())
}

pub fn config_error (msg: impl ToString)->NightplanError {
    NightplanError::ConfigError( msg.to_string())
}

macro_rules! fetch_error {
    ($resource:expr, $fmt:literal $(, $arg:expr )* ) => {
        NightplanError::FetchError { resource: $resource.to_string(), reason: format!( $fmt $(, $arg)* ) }
    };
}
pub (crate) use fetch_error;

macro_rules! time_parse_error {
    ($row:expr, $value:expr) => {
        NightplanError::TimeParse { row: $row.to_string(), value: $value.to_string() }
    };
}
pub (crate) use time_parse_error;
