//! Tool Invocation Contract
//!
//! Information Hiding:
//! - Operation bodies hidden behind a stored function reference
//! - Argument decoding and coercion rules centralized in `decode`
//! - Failure classification internalized in the executor
//!
//! A tool is a plain data record (name, usage text, ordered argument
//! schema) plus an async operation. There is no tool trait to implement:
//! registering a descriptor is all it takes to expose a capability.

pub mod decode;
pub mod error;
pub mod executor;
pub mod filesystem;
pub mod format;
pub mod http;
pub mod integrity;
pub mod macros;
pub mod registry;
pub mod search;
pub mod shell;
pub mod store;
pub mod utility;

use anyhow::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use error::ErrorKind;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    String,
    Int,
    Float,
    Bool,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgType::String => "string",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}

/// A decoded argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(n) => Some(*n),
            ArgValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => write!(f, "{}", s),
            ArgValue::Int(n) => write!(f, "{}", n),
            ArgValue::Float(n) => write!(f, "{}", n),
            ArgValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        ArgValue::Float(n)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

/// One field of a tool's argument schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ArgType,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<ArgValue>,
}

/// Arguments validated against a schema, ready for an operation
///
/// The decoder guarantees a value for every required field before an
/// operation ever sees this.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedArgs {
    values: BTreeMap<String, ArgValue>,
}

impl DecodedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_float)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    /// Fetch a string field the schema marks required.
    ///
    /// Failing here means the descriptor's operation disagrees with its own
    /// schema, not that the caller sent bad input.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.str(name)
            .ok_or_else(|| anyhow::anyhow!("schema field '{}' absent after decoding", name))
    }
}

impl FromIterator<(String, ArgValue)> for DecodedArgs {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Raw payload of an invocation request, before decoding
#[derive(Debug, Clone)]
pub enum Payload {
    Structured(serde_json::Value),
    Text(String),
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Structured(value)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

/// What an operation hands back on success
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    pub text: String,
    pub side_effects: Vec<String>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            side_effects: Vec::new(),
        }
    }

    pub fn with_side_effect(mut self, description: impl Into<String>) -> Self {
        self.side_effects.push(description.into());
        self
    }
}

/// The stored operation of a descriptor
pub type Operation =
    Arc<dyn Fn(DecodedArgs) -> BoxFuture<'static, Result<ToolOutput>> + Send + Sync>;

/// A registered tool: data record plus operation
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    usage_text: String,
    schema: Vec<FieldSpec>,
    operation: Operation,
}

impl ToolDescriptor {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        usage_text: impl Into<String>,
        schema: Vec<FieldSpec>,
        operation: F,
    ) -> Self
    where
        F: Fn(DecodedArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput>> + Send + 'static,
    {
        Self {
            name: name.into(),
            usage_text: usage_text.into(),
            schema,
            operation: Arc::new(move |args| Box::pin(operation(args))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage_text(&self) -> &str {
        &self.usage_text
    }

    pub fn schema(&self) -> &[FieldSpec] {
        &self.schema
    }

    pub(crate) fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Serializable form for the capability list handed to the
    /// orchestration collaborator
    pub fn manifest(&self) -> ToolManifest {
        ToolManifest {
            name: self.name.clone(),
            usage_text: self.usage_text.clone(),
            schema: self.schema.clone(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.usage_text)
    }
}

/// Descriptor metadata without the operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolManifest {
    pub name: String,
    pub usage_text: String,
    pub schema: Vec<FieldSpec>,
}

/// Outcome of one invocation: exactly Success or Failure, never both
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Success {
        text: String,
        side_effects: Vec<String>,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

impl InvocationResult {
    pub fn success(text: impl Into<String>) -> Self {
        InvocationResult::Success {
            text: text.into(),
            side_effects: Vec::new(),
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        InvocationResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            InvocationResult::Success { .. } => None,
            InvocationResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_value_accessors() {
        assert_eq!(ArgValue::Int(7).as_float(), Some(7.0));
        assert_eq!(ArgValue::Str("x".into()).as_int(), None);
        assert_eq!(ArgValue::Bool(true).as_bool(), Some(true));
    }

    #[test]
    fn test_decoded_args_accessors() {
        let args: DecodedArgs = vec![
            ("path".to_string(), ArgValue::from("/tmp/a")),
            ("count".to_string(), ArgValue::from(3i64)),
        ]
        .into_iter()
        .collect();

        assert_eq!(args.str("path"), Some("/tmp/a"));
        assert_eq!(args.int("count"), Some(3));
        assert_eq!(args.bool("missing"), None);
        assert!(args.require_str("path").is_ok());
        assert!(args.require_str("absent").is_err());
    }

    #[test]
    fn test_descriptor_manifest_round_trip() {
        let descriptor = ToolDescriptor::new(
            "echo",
            "Echo the given text back.",
            crate::schema![{
                name: "text",
                type: String,
                description: "Text to echo",
                required: true
            }],
            |args: DecodedArgs| async move {
                Ok(ToolOutput::text(args.require_str("text")?.to_string()))
            },
        );

        let manifest = descriptor.manifest();
        let json = serde_json::to_string(&manifest).unwrap();
        let back: ToolManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
        assert_eq!(back.schema[0].ty, ArgType::String);
    }

    #[test]
    fn test_invocation_result_is_exactly_one_variant() {
        let ok = InvocationResult::success("done");
        assert!(ok.is_success());
        assert_eq!(ok.kind(), None);

        let failed = InvocationResult::failure(ErrorKind::Unexpected, "boom");
        assert!(!failed.is_success());
        assert_eq!(failed.kind(), Some(ErrorKind::Unexpected));
    }
}
