//! Error types for slot-engine operations.

use thiserror::Error;

use crate::rules::RuleViolations;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid slot duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid day of week: {0}")]
    InvalidDay(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    RuleRejected(#[from] RuleViolations),

    #[error("Schedule conflict: {0}")]
    Conflict(String),
}

/// Coarse classification of a [`SlotError`] for callers that map errors onto
/// their own transport (HTTP status codes, UI alerts, exceptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was malformed or violated an invariant.
    Validation,
    /// The input was well-formed but collides with existing schedule entries.
    Conflict,
}

impl SlotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlotError::Conflict(_) => ErrorKind::Conflict,
            _ => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
