// src/infra/errors.rs — Error types for collapser

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollapserError {
    // Provider errors (one attempt failed; the retry policy decides what happens next)
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    #[error("Rate limited by '{provider}'")]
    RateLimited { provider: String },

    #[error("Invalid response from image edit endpoint: {0}")]
    InvalidResponse(String),

    // User errors (fatal, never retried)
    #[error("Please set the {var} environment variable.")]
    MissingApiKey { var: String },

    // Infra
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollapserError {
    /// Errors that end the run instead of going to the retry policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CollapserError::MissingApiKey { .. })
    }
}

impl From<tokio::task::JoinError> for CollapserError {
    fn from(e: tokio::task::JoinError) -> Self {
        CollapserError::Other(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_names_variable() {
        let err = CollapserError::MissingApiKey {
            var: "OPENAI_API_KEY".into(),
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_attempt_failures_are_not_fatal() {
        let rejected = CollapserError::Provider {
            provider: "openai".into(),
            message: "HTTP 400: safety system".into(),
        };
        let limited = CollapserError::RateLimited {
            provider: "openai".into(),
        };
        assert!(!rejected.is_fatal());
        assert!(!limited.is_fatal());
        assert_eq!(limited.to_string(), "Rate limited by 'openai'");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: CollapserError = io.into();
        assert!(matches!(err, CollapserError::Io(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_panicked_task_converts() {
        let join_err = tokio::spawn(async { panic!("decoder blew up") })
            .await
            .unwrap_err();
        let err: CollapserError = join_err.into();
        assert!(matches!(err, CollapserError::Other(_)));
        assert!(!err.is_fatal());
    }
}
