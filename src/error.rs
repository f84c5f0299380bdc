use std::path::PathBuf;

use thiserror::Error;

/// Why a form submission was rejected. The form stays open and no state
/// changes when one of these comes back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Name is required")]
    EmptyCategoryName,
    #[error("Color is required")]
    EmptyColor,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Due date `{0}` is not a YYYY-MM-DD date")]
    InvalidDueDate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value `{value}` for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
