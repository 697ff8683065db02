//! Error taxonomy of the invocation contract
//!
//! Decoding and registry errors are typed so callers can match on them;
//! everything an operation itself throws is classified by the executor
//! into an [`ErrorKind`] and never crosses the boundary as an error.

use serde::Serialize;
use thiserror::Error;

use super::{ArgType, InvocationResult};

/// Failure classification carried by every `InvocationResult::Failure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingArgument,
    TypeMismatch,
    UnparsableInput,
    UnknownTool,
    DuplicateTool,
    ResourceNotFound,
    PermissionDenied,
    Unexpected,
}

/// Errors from the argument decoder, surfaced before any side effect
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Missing required argument '{field}'")]
    MissingArgument { field: String },

    #[error("Argument '{field}' is not a valid {expected}")]
    TypeMismatch { field: String, expected: ArgType },

    #[error("Could not extract any arguments from the input")]
    UnparsableInput,
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::MissingArgument { .. } => ErrorKind::MissingArgument,
            DecodeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DecodeError::UnparsableInput => ErrorKind::UnparsableInput,
        }
    }
}

/// Errors from registry registration and lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("A tool named '{0}' is already registered")]
    DuplicateTool(String),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::UnknownTool(_) => ErrorKind::UnknownTool,
            RegistryError::DuplicateTool(_) => ErrorKind::DuplicateTool,
        }
    }
}

impl From<DecodeError> for InvocationResult {
    fn from(err: DecodeError) -> Self {
        InvocationResult::failure(err.kind(), err.to_string())
    }
}

impl From<RegistryError> for InvocationResult {
    fn from(err: RegistryError) -> Self {
        InvocationResult::failure(err.kind(), err.to_string())
    }
}
