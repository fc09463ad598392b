//! FLB-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DashError>;

/// Why the file provider could not produce a record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// Connection refused, DNS failure, timeout.
    Transport(String),
    /// The provider answered with something other than 200.
    Status(u16),
    /// The body was not a JSON array of file records.
    Body(String),
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(details) => write!(f, "transport: {details}"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::Body(details) => write!(f, "malformed body: {details}"),
        }
    }
}

/// Top-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("[FLB-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FLB-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FLB-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FLB-2001] provider unavailable at {url}: {failure}")]
    ProviderUnavailable { url: String, failure: ProviderFailure },

    #[error("[FLB-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FLB-3001] rendering backend failed to initialize: {source}")]
    RenderingBackendInit {
        #[source]
        source: std::io::Error,
    },

    #[error("[FLB-3002] render failure: {source}")]
    Render {
        #[source]
        source: std::io::Error,
    },

    #[error("[FLB-3003] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FLB-3004] channel closed in component {component}")]
    ChannelClosed { component: &'static str },
}

impl DashError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FLB-1001",
            Self::MissingConfig { .. } => "FLB-1002",
            Self::ConfigParse { .. } => "FLB-1003",
            Self::ProviderUnavailable { .. } => "FLB-2001",
            Self::Serialization { .. } => "FLB-2101",
            Self::RenderingBackendInit { .. } => "FLB-3001",
            Self::Render { .. } => "FLB-3002",
            Self::Io { .. } => "FLB-3003",
            Self::ChannelClosed { .. } => "FLB-3004",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Provider outages heal by themselves on the next poll; a missing
    /// terminal does not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. }
                | Self::Io { .. }
                | Self::Render { .. }
                | Self::ChannelClosed { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for provider failures.
    #[must_use]
    pub fn provider(url: impl Into<String>, failure: ProviderFailure) -> Self {
        Self::ProviderUnavailable {
            url: url.into(),
            failure,
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DashError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DashError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<DashError> {
        vec![
            DashError::InvalidConfig {
                details: String::new(),
            },
            DashError::MissingConfig {
                path: PathBuf::new(),
            },
            DashError::ConfigParse {
                context: "",
                details: String::new(),
            },
            DashError::provider("", ProviderFailure::Status(500)),
            DashError::Serialization {
                context: "",
                details: String::new(),
            },
            DashError::RenderingBackendInit {
                source: std::io::Error::other("test"),
            },
            DashError::Render {
                source: std::io::Error::other("test"),
            },
            DashError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            DashError::ChannelClosed { component: "" },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(DashError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_display_includes_code() {
        for err in all_variants() {
            let msg = err.to_string();
            assert!(
                msg.contains(err.code()),
                "display should contain error code: {msg}"
            );
        }
    }

    #[test]
    fn provider_error_names_url_and_reason() {
        let err = DashError::provider(
            "http://localhost:4242/files",
            ProviderFailure::Body("expected array".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.contains("localhost:4242/files"), "{msg}");
        assert!(msg.contains("malformed body: expected array"), "{msg}");
    }

    #[test]
    fn retryable_errors_are_correct() {
        assert!(DashError::provider("x", ProviderFailure::Status(503)).is_retryable());
        assert!(DashError::ChannelClosed { component: "input" }.is_retryable());

        assert!(
            !DashError::RenderingBackendInit {
                source: std::io::Error::other("no tty"),
            }
            .is_retryable()
        );
        assert!(
            !DashError::InvalidConfig {
                details: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn io_convenience_constructor() {
        let err = DashError::io(
            "/tmp/activity.jsonl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "FLB-3003");
        assert!(err.to_string().contains("/tmp/activity.jsonl"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DashError = json_err.into();
        assert_eq!(err.code(), "FLB-2101");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: DashError = toml_err.into();
        assert_eq!(err.code(), "FLB-1003");
    }
}
