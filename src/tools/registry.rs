//! Tool Descriptor Registry
//!
//! Information Hiding:
//! - Storage and lookup structures hidden behind the registry API
//! - Capability-list rendering for the orchestrator kept in one place
//!
//! Registration happens once at startup, before any concurrent invocation;
//! lookups afterwards are read-only, so the registry needs no locking.

use std::collections::HashMap;

use super::error::RegistryError;
use super::{ToolDescriptor, ToolManifest};

/// Insertion-ordered collection of the available tools
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a descriptor. Names are unique for the process lifetime;
    /// a duplicate leaves the original registration untouched.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        tracing::info!(tool = %name, "registering tool");
        self.index.insert(name, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&ToolDescriptor, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All descriptors in registration order, stable across calls.
    pub fn list_all(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Serializable capability list for the orchestration collaborator.
    pub fn manifests(&self) -> Vec<ToolManifest> {
        self.descriptors.iter().map(ToolDescriptor::manifest).collect()
    }

    /// Human-readable capability list, one block per tool, for embedding in
    /// an agent prompt.
    pub fn usage_summary(&self) -> String {
        let mut blocks = Vec::with_capacity(self.descriptors.len());
        for descriptor in &self.descriptors {
            let mut lines = vec![
                format!("Tool: {}", descriptor.name()),
                format!("Usage: {}", descriptor.usage_text()),
            ];
            if descriptor.schema().is_empty() {
                lines.push("Arguments: none".to_string());
            } else {
                lines.push("Arguments:".to_string());
                for field in descriptor.schema() {
                    let requirement = if field.required {
                        "required".to_string()
                    } else if let Some(default) = &field.default {
                        format!("optional, default {}", default)
                    } else {
                        "optional".to_string()
                    };
                    lines.push(format!(
                        "  - {} ({}): {} [{}]",
                        field.name, field.ty, field.description, requirement
                    ));
                }
            }
            blocks.push(lines.join("\n"));
        }
        blocks.join("\n\n")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
