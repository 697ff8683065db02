//! Remembered Paths and Credentials
//!
//! Tools over the shared [`KeyedStore`]: the assistant remembers where
//! applications live across sessions (file-backed store) and holds
//! credentials for the lifetime of the process only (memory-backed store).

use std::io;
use std::sync::Arc;

use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;
use crate::storage::KeyedStore;

pub fn store_application_path(store: Arc<dyn KeyedStore>) -> ToolDescriptor {
    ToolDescriptor::new(
        "store_application_path",
        "Remember the filesystem path of an application for later use.",
        schema![
            {
                name: "name",
                type: String,
                description: "Application name",
                required: true
            },
            {
                name: "path",
                type: String,
                description: "Path to the application",
                required: true
            },
        ],
        move |args: DecodedArgs| {
            let store = store.clone();
            async move {
                let name = args.require_str("name")?.to_string();
                let path = args.require_str("path")?.to_string();

                store.put(&name, path.clone()).await?;
                Ok(ToolOutput::text(format!("Remembered {} at {}", name, path))
                    .with_side_effect(format!("stored application path for {}", name)))
            }
        },
    )
}

pub fn get_application_path(store: Arc<dyn KeyedStore>) -> ToolDescriptor {
    ToolDescriptor::new(
        "get_application_path",
        "Look up a previously remembered application path.",
        schema![{
            name: "name",
            type: String,
            description: "Application name",
            required: true
        }],
        move |args: DecodedArgs| {
            let store = store.clone();
            async move {
                let name = args.require_str("name")?.to_string();

                match store.get(&name).await? {
                    Some(path) => Ok(ToolOutput::text(path)),
                    None => Err(not_found(format!("No stored path for '{}'", name))),
                }
            }
        },
    )
}

pub fn store_credential(store: Arc<dyn KeyedStore>) -> ToolDescriptor {
    ToolDescriptor::new(
        "store_credential",
        "Hold a credential for the rest of this session. Nothing is written to disk.",
        schema![
            {
                name: "name",
                type: String,
                description: "Credential label",
                required: true
            },
            {
                name: "value",
                type: String,
                description: "The credential itself",
                required: true
            },
        ],
        move |args: DecodedArgs| {
            let store = store.clone();
            async move {
                let name = args.require_str("name")?.to_string();
                let value = args.require_str("value")?.to_string();

                store.put(&name, value).await?;
                // Deliberately does not echo the value back.
                Ok(ToolOutput::text(format!("Stored credential '{}'", name))
                    .with_side_effect(format!("stored credential {}", name)))
            }
        },
    )
}

pub fn get_credential(store: Arc<dyn KeyedStore>) -> ToolDescriptor {
    ToolDescriptor::new(
        "get_credential",
        "Retrieve a credential stored earlier in this session.",
        schema![{
            name: "name",
            type: String,
            description: "Credential label",
            required: true
        }],
        move |args: DecodedArgs| {
            let store = store.clone();
            async move {
                let name = args.require_str("name")?.to_string();

                match store.get(&name).await? {
                    Some(value) => Ok(ToolOutput::text(value)),
                    None => Err(not_found(format!("No credential named '{}'", name))),
                }
            }
        },
    )
}

fn not_found(message: String) -> anyhow::Error {
    io::Error::new(io::ErrorKind::NotFound, message).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::tools::decode::decode;
    use crate::tools::error::ErrorKind;
    use crate::tools::executor::InvocationExecutor;
    use crate::tools::{InvocationResult, Payload};
    use serde_json::{json, Value};

    async fn run(descriptor: &ToolDescriptor, payload: Value) -> InvocationResult {
        let args = decode(&Payload::from(payload), descriptor.schema()).unwrap();
        InvocationExecutor::new().invoke(descriptor, args).await
    }

    #[tokio::test]
    async fn test_store_then_get_application_path() {
        let store: Arc<dyn KeyedStore> = Arc::new(MemoryStore::new());

        let result = run(
            &store_application_path(store.clone()),
            json!({"name": "chrome", "path": "/usr/bin/chrome"}),
        )
        .await;
        assert!(result.is_success());

        let result = run(&get_application_path(store), json!({"name": "chrome"})).await;
        match result {
            InvocationResult::Success { text, .. } => assert_eq!(text, "/usr/bin/chrome"),
            InvocationResult::Failure { message, .. } => panic!("unexpected failure: {message}"),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_path_is_resource_not_found() {
        let store: Arc<dyn KeyedStore> = Arc::new(MemoryStore::new());
        let result = run(&get_application_path(store), json!({"name": "emacs"})).await;
        assert_eq!(result.kind(), Some(ErrorKind::ResourceNotFound));
    }

    #[tokio::test]
    async fn test_store_credential_does_not_echo_value() {
        let store: Arc<dyn KeyedStore> = Arc::new(MemoryStore::new());

        let result = run(
            &store_credential(store.clone()),
            json!({"name": "smtp", "value": "hunter2"}),
        )
        .await;
        match result {
            InvocationResult::Success { text, .. } => assert!(!text.contains("hunter2")),
            InvocationResult::Failure { message, .. } => panic!("unexpected failure: {message}"),
        }

        let result = run(&get_credential(store), json!({"name": "smtp"})).await;
        match result {
            InvocationResult::Success { text, .. } => assert_eq!(text, "hunter2"),
            InvocationResult::Failure { message, .. } => panic!("unexpected failure: {message}"),
        }
    }
}
