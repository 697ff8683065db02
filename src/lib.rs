//! Deskpilot - uniform tool invocation for desktop assistant agents
//!
//! This library factors the parsing/validation/error-reporting discipline
//! shared by every assistant tool into one contract: a descriptor registry,
//! an argument decoder, an invocation executor, and a result formatter.
//! The LLM orchestration that decides *which* tool to call is an external
//! collaborator; it sees `capabilities()` and calls `invoke_by_name`.

pub mod cli;
pub mod config;
pub mod storage;
pub mod tools;
pub mod utils;

pub use config::Settings;
pub use tools::error::{DecodeError, ErrorKind, RegistryError};
pub use tools::registry::ToolRegistry;
pub use tools::{
    ArgType, ArgValue, DecodedArgs, FieldSpec, InvocationResult, Payload, ToolDescriptor,
    ToolManifest, ToolOutput,
};

use anyhow::Result;
use std::sync::Arc;

use storage::{FileStore, KeyedStore, MemoryStore};
use tools::decode::decode;
use tools::executor::InvocationExecutor;
use tools::format;

/// Registry plus executor: the single entry point callers hold
pub struct ToolHost {
    registry: ToolRegistry,
    executor: InvocationExecutor,
}

impl ToolHost {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            executor: InvocationExecutor::new(),
        }
    }

    /// Build a host with the default assistant toolset, wired to the
    /// configured limits and data directory.
    pub async fn with_default_tools(settings: &Settings) -> Result<Self> {
        let data_dir = settings.storage.resolve_data_dir();
        let app_paths: Arc<dyn KeyedStore> =
            Arc::new(FileStore::open(data_dir.join("app_paths.json")).await?);
        let credentials: Arc<dyn KeyedStore> = Arc::new(MemoryStore::new());

        let max_file_bytes = settings.limits.max_file_bytes;
        let shell = &settings.shell;
        let http = &settings.http;

        let mut registry = ToolRegistry::new();

        registry.register(tools::filesystem::create_file(max_file_bytes))?;
        registry.register(tools::filesystem::read_file(max_file_bytes))?;
        registry.register(tools::filesystem::write_file(max_file_bytes))?;
        registry.register(tools::filesystem::delete_file())?;
        registry.register(tools::filesystem::move_file())?;
        registry.register(tools::filesystem::rename_file())?;
        registry.register(tools::filesystem::list_directory())?;

        registry.register(tools::shell::execute_shell(
            shell.default_timeout_seconds,
            shell.max_timeout_seconds,
            shell.allowed_commands.clone(),
        ))?;

        registry.register(tools::http::http_request(
            http.default_timeout_seconds,
            http.max_timeout_seconds,
            http.allowed_domains.clone(),
        ))?;
        registry.register(tools::http::download_file(
            http.default_timeout_seconds,
            http.max_timeout_seconds,
            http.allowed_domains.clone(),
        ))?;

        registry.register(tools::search::search_file_content(max_file_bytes))?;
        registry.register(tools::integrity::file_checksum())?;

        registry.register(tools::utility::current_datetime())?;
        registry.register(tools::utility::system_info())?;
        registry.register(tools::utility::environment_variable())?;
        registry.register(tools::utility::delay(settings.limits.max_delay_seconds))?;

        registry.register(tools::store::store_application_path(app_paths.clone()))?;
        registry.register(tools::store::get_application_path(app_paths))?;
        registry.register(tools::store::store_credential(credentials.clone()))?;
        registry.register(tools::store::get_credential(credentials))?;

        tracing::info!(tools = registry.len(), "tool host initialized");
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The capability list exposed to the orchestration collaborator.
    pub fn capabilities(&self) -> &[ToolDescriptor] {
        self.registry.list_all()
    }

    pub fn usage_summary(&self) -> String {
        self.registry.usage_summary()
    }

    /// Full pipeline without the final formatting step: lookup, decode,
    /// execute. Decoding failures surface before the operation runs.
    pub async fn dispatch(&self, name: &str, payload: Payload) -> InvocationResult {
        let descriptor = match self.registry.lookup(name) {
            Ok(descriptor) => descriptor,
            Err(err) => return err.into(),
        };

        let args = match decode(&payload, descriptor.schema()) {
            Ok(args) => args,
            Err(err) => return err.into(),
        };

        self.executor.invoke(descriptor, args).await
    }

    /// The single entry point of the contract: one tool call, one string.
    pub async fn invoke_by_name(&self, name: &str, payload: impl Into<Payload>) -> String {
        let result = self.dispatch(name, payload.into()).await;
        format::render(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_host() -> ToolHost {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::new(
                "echo",
                "Echo the given text back.",
                schema![{
                    name: "text",
                    type: String,
                    description: "Text to echo",
                    required: true
                }],
                |args: DecodedArgs| async move {
                    Ok(ToolOutput::text(args.require_str("text")?.to_string()))
                },
            ))
            .unwrap();
        ToolHost::new(registry)
    }

    #[tokio::test]
    async fn test_invoke_by_name_success() {
        let host = echo_host();
        let output = host.invoke_by_name("echo", json!({"text": "hi"})).await;
        assert_eq!(output, "hi");
    }

    #[tokio::test]
    async fn test_invoke_by_name_unknown_tool() {
        let host = echo_host();
        let output = host.invoke_by_name("nonexistent", json!({})).await;
        assert_eq!(output, "Error: Unknown tool 'nonexistent'");
    }

    #[tokio::test]
    async fn test_invoke_by_name_missing_argument() {
        let host = echo_host();
        let output = host.invoke_by_name("echo", json!({})).await;
        assert_eq!(output, "Error: Missing required argument 'text'");
    }

    #[tokio::test]
    async fn test_invoke_by_name_accepts_text_payload() {
        let host = echo_host();
        let output = host.invoke_by_name("echo", "text: hello").await;
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn test_default_toolset_registers_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.data_dir = Some(dir.path().to_path_buf());

        let host = ToolHost::with_default_tools(&settings).await.unwrap();
        assert!(host.registry().contains("read_file"));
        assert!(host.registry().contains("execute_shell"));
        assert!(host.registry().contains("get_application_path"));

        let summary = host.usage_summary();
        assert!(summary.contains("Tool: execute_shell"));
        assert!(summary.contains("timeout_seconds"));
    }
}
