//! Error handling for the Allegiance navigation core
//!
//! Device protocol accessors never surface these errors to the device runtime
//! directly; they are folded into a `NavStatus` at the adapter boundary. Every
//! other fallible operation returns `NavResult`.

use std::path::Path;

use crate::navigation::protocol::NavStatus;

/// Main error type for the navigation core
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    // Protocol errors
    #[error("Operation not supported: {property}")]
    InvalidOperation { property: String },

    #[error("Navigation adapter is not enabled")]
    NotEnabled,

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Type mismatch for {property}: expected {expected}")]
    TypeMismatch { property: String, expected: String },

    // Device errors
    #[error("Navigation driver unavailable: {0}")]
    DriverUnavailable(String),

    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    // Camera errors
    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    // Configuration errors
    #[error("Invalid config: {field} ({reason})")]
    InvalidConfig { field: String, reason: String },

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error for {path}: {error}")]
    Io { path: String, error: String },
}

/// Type alias for Results in the navigation core
pub type NavResult<T> = Result<T, NavError>;

impl NavError {
    /// Rejection for a protocol accessor this viewer does not implement
    pub fn unsupported(property: impl Into<String>) -> Self {
        NavError::InvalidOperation {
            property: property.into(),
        }
    }

    /// Status code reported to the device runtime
    pub fn status(&self) -> NavStatus {
        match self {
            NavError::InvalidOperation { .. } | NavError::NotEnabled => {
                NavStatus::INVALID_OPERATION
            }
            NavError::UnknownProperty(_) => NavStatus::INVALID_FUNCTION,
            NavError::TypeMismatch { .. } => NavStatus::INVALID_ARGUMENT,
            NavError::ChannelClosed(_) => NavStatus::NOT_CONNECTED,
            NavError::DriverUnavailable(_) => NavStatus::NOT_CONNECTED,
            NavError::InvalidCamera(_)
            | NavError::InvalidConfig { .. }
            | NavError::ConfigParse(_)
            | NavError::Io { .. } => NavStatus::INTERNAL,
        }
    }
}

impl From<toml::de::Error> for NavError {
    fn from(error: toml::de::Error) -> Self {
        NavError::ConfigParse(error.to_string())
    }
}

impl<T> From<crossbeam_channel::SendError<T>> for NavError {
    fn from(_: crossbeam_channel::SendError<T>) -> Self {
        NavError::ChannelClosed("device requests".to_string())
    }
}

impl From<crossbeam_channel::RecvError> for NavError {
    fn from(_: crossbeam_channel::RecvError) -> Self {
        NavError::ChannelClosed("device replies".to_string())
    }
}

/// Extension trait for attaching a path to IO errors
pub trait PathContext<T> {
    fn with_path(self, path: &Path) -> NavResult<T>;
}

impl<T> PathContext<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> NavResult<T> {
        self.map_err(|e| NavError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NavError::unsupported("view.fov");
        assert_eq!(err.to_string(), "Operation not supported: view.fov");
    }

    #[test]
    fn test_rejections_share_invalid_operation_status() {
        assert_eq!(
            NavError::unsupported("hit.lookat").status(),
            NavStatus::INVALID_OPERATION
        );
        assert_eq!(NavError::NotEnabled.status(), NavStatus::INVALID_OPERATION);
        assert_ne!(
            NavError::ChannelClosed("test".to_string()).status(),
            NavStatus::SUCCESS
        );
    }

    #[test]
    fn test_path_context() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result
            .with_path(Path::new("allegiance.toml"))
            .expect_err("io error should propagate");
        assert!(matches!(err, NavError::Io { ref path, .. } if path == "allegiance.toml"));
    }
}
