use thiserror::Error;

pub type CreativeResult<T> = Result<T, CreativeError>;

#[derive(Error, Debug)]
pub enum CreativeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CreativeError {
    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidPayload(_))
    }
}

impl From<config::ConfigError> for CreativeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(CreativeError::Decode("bad bytes".into()).is_client_error());
        assert!(CreativeError::InvalidPayload("bad base64".into()).is_client_error());
        assert!(!CreativeError::Encode("codec".into()).is_client_error());
        assert!(!CreativeError::Config("missing".into()).is_client_error());
    }

    #[test]
    fn test_display_messages() {
        let err = CreativeError::Decode("unsupported format".into());
        assert_eq!(err.to_string(), "Image decode error: unsupported format");
    }
}
