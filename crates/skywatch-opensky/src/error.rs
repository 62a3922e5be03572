use thiserror::Error;

/// Failures raised by the sample sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("historical query for hour {hour} failed")]
    QueryFailed {
        hour: i64,
        #[source]
        source: Box<SourceError>,
    },
}
