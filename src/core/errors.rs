//! NAV-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, NavError>;

/// Top-level error type for NavScope.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("[NAV-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[NAV-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[NAV-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[NAV-2001] malformed snapshot payload: {details}")]
    BadPayload { details: String },

    #[error("[NAV-2002] unknown layout slot: {slot}")]
    UnknownSlot { slot: String },

    #[error("[NAV-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[NAV-3001] feed connection failure for {endpoint}: {details}")]
    FeedConnect { endpoint: String, details: String },

    #[error("[NAV-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[NAV-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[NAV-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl NavError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "NAV-1001",
            Self::MissingConfig { .. } => "NAV-1002",
            Self::ConfigParse { .. } => "NAV-1003",
            Self::BadPayload { .. } => "NAV-2001",
            Self::UnknownSlot { .. } => "NAV-2002",
            Self::Serialization { .. } => "NAV-2101",
            Self::FeedConnect { .. } => "NAV-3001",
            Self::Io { .. } => "NAV-3002",
            Self::ChannelClosed { .. } => "NAV-3003",
            Self::Runtime { .. } => "NAV-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FeedConnect { .. }
                | Self::Io { .. }
                | Self::ChannelClosed { .. }
                | Self::Runtime { .. }
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
}

impl From<serde_json::Error> for NavError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for NavError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
