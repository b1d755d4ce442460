//! Pacswitch Error Types

use thiserror::Error;

/// Main error type for profile and rule operations
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Rule document is not valid JSON: {0}")]
    RuleDocument(#[from] serde_json::Error),

    #[error("Rule document must be an object mapping rule groups to pattern lists")]
    RuleDocumentNotObject,

    #[error("Rule group '{key}' must be a list of pattern strings")]
    InvalidRuleGroup { key: String },

    #[error("Invalid proxy endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Profile '{name}' violates the field layout for kind {kind:?}")]
    ProfileShape {
        name: String,
        kind: crate::profile::ProfileKind,
    },

    #[error("A profile named '{0}' already exists")]
    DuplicateProfile(String),

    #[error("No profile named '{0}'")]
    UnknownProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pacswitch operations
pub type SwitchResult<T> = Result<T, SwitchError>;
