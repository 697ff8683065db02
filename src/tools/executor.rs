//! Invocation Executor
//!
//! Information Hiding:
//! - Failure classification rules hidden from tools and callers
//! - Operations see only their decoded arguments
//!
//! The executor is the uniform failure boundary: no error an operation
//! raises crosses it. There is no automatic retry, since most operations
//! here (process kills, file deletes, sends) are not idempotent; retrying
//! is a caller decision. The executor holds no state, so concurrent
//! invocations do not serialize through it.

use super::error::ErrorKind;
use super::{DecodedArgs, InvocationResult, ToolDescriptor};

/// Runs operations inside the uniform failure boundary
#[derive(Debug, Default)]
pub struct InvocationExecutor;

impl InvocationExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run the descriptor's operation with already-decoded arguments.
    pub async fn invoke(
        &self,
        descriptor: &ToolDescriptor,
        args: DecodedArgs,
    ) -> InvocationResult {
        tracing::debug!(tool = %descriptor.name(), "invoking tool operation");

        match (descriptor.operation())(args).await {
            Ok(output) => {
                tracing::debug!(tool = %descriptor.name(), "tool operation succeeded");
                InvocationResult::Success {
                    text: output.text,
                    side_effects: output.side_effects,
                }
            }
            Err(err) => {
                let kind = classify(&err);
                tracing::warn!(
                    tool = %descriptor.name(),
                    kind = ?kind,
                    "tool operation failed: {err:#}"
                );
                InvocationResult::Failure {
                    kind,
                    message: format!("{err:#}"),
                }
            }
        }
    }
}

/// Map an operation error chain onto the failure taxonomy.
fn classify(err: &anyhow::Error) -> ErrorKind {
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            return match io_err.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::ResourceNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                _ => ErrorKind::Unexpected,
            };
        }
    }
    ErrorKind::Unexpected
}
