use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The request never reached the backend (DNS, connect, timeout).
    NetworkError(String),
    /// Resource not found (backend 404).
    NotFound(String),
    /// Backend rejected the payload (400/422).
    ValidationError(String),
    /// Backend-side failure (5xx or otherwise unusable response).
    ServerError(String),
    /// Internal error in this layer.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ServerError(msg) => write!(f, "Server error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    ///
    /// Transport-level failures (connect, timeout, body read) become
    /// `NetworkError`; response status codes are mapped explicitly in the
    /// gateway client before this conversion applies.
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl AppError {
    /// Short stable label used by the console views and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NetworkError(_) => "network",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation",
            AppError::ServerError(_) => "server",
            AppError::InternalError(_) => "internal",
            AppError::WithContext { source, .. } => source.kind(),
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_and_displays_chain() {
        let err: Result<(), AppError> = Err(AppError::NotFound("lead abc".to_string()));
        let wrapped = err.context("fetching lead detail").unwrap_err();
        assert_eq!(wrapped.kind(), "not_found");
        assert_eq!(
            wrapped.to_string(),
            "fetching lead detail: Not found: lead abc"
        );
    }

    #[test]
    fn lazy_context_only_runs_on_error() {
        let ok: Result<u32, AppError> = Ok(7);
        let value = ok.with_context(|| unreachable!()).unwrap();
        assert_eq!(value, 7);
    }
}
