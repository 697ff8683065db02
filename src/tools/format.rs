//! Result Formatter
//!
//! Deterministic rendering of an [`InvocationResult`] into the string
//! returned to the conversation layer. Success text passes through
//! verbatim; failures carry a stable `"Error: "` prefix so humans and
//! LLMs alike can detect them without parsing error types.

use super::InvocationResult;

/// Prefix every failure rendering starts with.
pub const ERROR_PREFIX: &str = "Error: ";

pub fn render(result: &InvocationResult) -> String {
    match result {
        InvocationResult::Success { text, .. } => text.clone(),
        InvocationResult::Failure { message, .. } => format!("{}{}", ERROR_PREFIX, message),
    }
}
