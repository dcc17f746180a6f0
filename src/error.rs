use thiserror::Error;

/// Errors surfaced by the API client.
///
/// `Transport` means no usable response was obtained at all, `Decode` means
/// the server answered 2xx but the payload did not match the expected shape,
/// and `Api` carries a non-2xx status that survived the single auth retry.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
}

impl ApiError {
    /// Status code for `Api` errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode(_))
    }
}
