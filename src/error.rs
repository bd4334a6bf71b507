use thiserror::Error;

/// Main error type for the Rusty Label extension.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub(crate) enum RustyLabelError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    GlobError(#[from] glob::GlobError),

    #[error("{0}")]
    RegexError(#[from] regex::Error),

    // Summary module errors
    #[error("{0}")]
    SummaryError(#[from] crate::summary::SummaryError),

    // Extension module errors
    #[error("{0}")]
    ExtensionError(#[from] crate::extension::ExtensionError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RustyLabelError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RustyLabelError::WithContextError(format!("{}: {}", message, e)))
    }
}
