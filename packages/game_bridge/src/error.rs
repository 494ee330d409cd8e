//! Error types for the host side of the bridge.

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("host page is missing element #{id}")]
    MissingElement { id: String },

    #[error("element #{id} is not {expected}")]
    WrongElementType { id: String, expected: &'static str },

    #[error("load_data is not valid JSON: {0}")]
    InvalidLoadData(#[source] serde_json::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("host operation failed: {0}")]
    Host(String),
}

impl BridgeError {
    /// Configuration errors mean the page violates the DOM contract and the
    /// bridge should refuse to start.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingElement { .. } | Self::WrongElementType { .. }
        )
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::MissingElement { .. } => "missing_element",
            Self::WrongElementType { .. } => "wrong_element_type",
            Self::InvalidLoadData(_) => "invalid_load_data",
            Self::Encode(_) => "encode_failed",
            Self::Host(_) => "host_failed",
        }
    }
}
