//! Error types for configuration and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a persisted table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure to write a persisted table.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Report a broken host/engine protocol invariant.
///
/// Panics in debug builds. In release builds the violation is logged and the
/// enclosing function returns.
#[macro_export]
macro_rules! contract_violation {
    ($($arg:tt)+) => {{
        debug_assert!(false, $($arg)+);
        $crate::__log::error!($($arg)+);
        return;
    }};
}
