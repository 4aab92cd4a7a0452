//! Error types for seqer

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeqerError {
    #[error("Invalid step size: {0}")]
    InvalidStepSize(String),
    #[error("Pointer released without a gesture in progress")]
    GestureNotStarted,
    #[error("Event not found: {0}")]
    EventNotFound(u64),
    #[error("View not found: {0}")]
    ViewNotFound(usize),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SeqerError>;
