use super::types::ErrorBody;

pub(crate) const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";
pub(crate) const NETWORK_FAILURE: &str =
    "Unable to reach the medication service. Please try again later.";

/// Errors from backend requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Medication service is not reachable at {0}")]
    Connection(String),

    /// Milliseconds waited.
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Medication service returned error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request task failed: {0}")]
    TaskFailed(String),
}

impl ApiError {
    /// Build a `Status` error from a non-success response body.
    ///
    /// The body's `error` field wins over `message`; an empty or
    /// non-JSON body falls back to the generic text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self::Status { status, message }
    }

    /// Text shown to the user in the feedback line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Connection(_) | Self::Timeout(_) | Self::HttpClient(_) => {
                NETWORK_FAILURE.to_string()
            }
            Self::ResponseParsing(_) | Self::InvalidUrl(_) | Self::TaskFailed(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}
