use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("input closed before a selection was made")]
    InputClosed,
    #[error("failed to read console input: {0}")]
    Input(#[source] std::io::Error),
    #[error("failed to write console output: {0}")]
    Output(#[source] std::io::Error),
    #[error("failed to read video file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("failed to decode service response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("operation failed with code {code}: {message}")]
    Remote { code: i32, message: String },
    #[error("operation {operation} did not finish within {}s", .waited.as_secs())]
    Timeout { operation: String, waited: Duration },
    #[error("wait for operation {operation} was cancelled")]
    Cancelled { operation: String },
    #[error("response has no {0}")]
    EmptyResult(&'static str),
}

impl AnnotateError {
    /// True when the failure came from the wait budget rather than the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AnnotateError::Timeout { .. })
    }
}
