//! Error types
//!
//! Input problems in the forms are not errors: an incomplete submission is
//! simply ignored. The variants here cover the few conditions the code can
//! actually detect.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no friend is selected")]
    NoSelection,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("avatar base URL must not be empty")]
    EmptyAvatarBase,

    #[error("currency symbol must not be empty")]
    EmptyCurrency,

    #[error("invalid log level '{0}' (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),
}
