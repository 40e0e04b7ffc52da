use reqwest::StatusCode;

/// Failures of the one outbound forecast call.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Could not decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures obtaining the device position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
    #[error("Location request timed out")]
    Timeout,
}
