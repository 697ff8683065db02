//! File Integrity Tool
//!
//! SHA-256 digests for verifying that a file has not changed.

use anyhow::Context;
use sha2::{Digest, Sha256};
use tokio::fs;

use super::filesystem::expand_path;
use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;

pub fn file_checksum() -> ToolDescriptor {
    ToolDescriptor::new(
        "file_checksum",
        "Compute the SHA-256 checksum of a file.",
        schema![{
            name: "file_path",
            type: String,
            description: "The file to checksum",
            required: true
        }],
        |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);

            let bytes = fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let digest = Sha256::digest(&bytes);
            let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

            Ok(ToolOutput::text(format!(
                "sha256({}) = {}",
                path.display(),
                hex
            )))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::decode::decode;
    use crate::tools::error::ErrorKind;
    use crate::tools::executor::InvocationExecutor;
    use crate::tools::{InvocationResult, Payload};
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_checksum_known_value() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("data.txt");
        std::fs::write(&file, b"abc").unwrap();

        let descriptor = file_checksum();
        let args = decode(
            &Payload::from(json!({"file_path": file.to_str().unwrap()})),
            descriptor.schema(),
        )
        .unwrap();
        let result = InvocationExecutor::new().invoke(&descriptor, args).await;

        match result {
            InvocationResult::Success { text, .. } => {
                // SHA-256 of "abc"
                assert!(text.ends_with(
                    "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
                ));
            }
            InvocationResult::Failure { message, .. } => panic!("unexpected failure: {message}"),
        }
    }

    #[tokio::test]
    async fn test_checksum_missing_file() {
        let descriptor = file_checksum();
        let args = decode(
            &Payload::from(json!({"file_path": "/no/such/file"})),
            descriptor.schema(),
        )
        .unwrap();
        let result = InvocationExecutor::new().invoke(&descriptor, args).await;
        assert_eq!(result.kind(), Some(ErrorKind::ResourceNotFound));
    }
}
