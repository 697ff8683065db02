//! Filesystem Tools
//!
//! Information Hiding:
//! - File I/O details and path expansion hidden inside operations
//! - Size caps enforced here, configured by the host
//!
//! Arguments keep the vocabulary the assistant's users already know:
//! `file_path`, `content`, `append`.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_path(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

pub(crate) async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create parent directory")?;
        }
    }
    Ok(())
}

/// Create a file with the given content, making parent directories as needed.
pub fn create_file(max_bytes: u64) -> ToolDescriptor {
    ToolDescriptor::new(
        "create_file",
        "Create a file with the given content, creating parent directories as needed.",
        schema![
            {
                name: "file_path",
                type: String,
                description: "Path where the file should be created",
                required: true
            },
            {
                name: "content",
                type: String,
                description: "The content to write",
                required: true
            },
        ],
        move |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);
            let content = args.require_str("content")?.to_string();

            if content.len() as u64 > max_bytes {
                bail!(
                    "Content too large: {} bytes (max: {} bytes)",
                    content.len(),
                    max_bytes
                );
            }

            ensure_parent_dir(&path).await?;
            fs::write(&path, &content)
                .await
                .with_context(|| format!("Failed to create file {}", path.display()))?;

            tracing::info!(path = %path.display(), "created file");
            Ok(ToolOutput::text(format!("Created file at {}", path.display()))
                .with_side_effect(format!(
                    "wrote {} bytes to {}",
                    content.len(),
                    path.display()
                )))
        },
    )
}

/// Read a text file, capped at `max_bytes`.
pub fn read_file(max_bytes: u64) -> ToolDescriptor {
    ToolDescriptor::new(
        "read_file",
        "Read the contents of a text file.",
        schema![{
            name: "file_path",
            type: String,
            description: "The file path to read",
            required: true
        }],
        move |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);

            let metadata = fs::metadata(&path)
                .await
                .with_context(|| format!("Failed to stat {}", path.display()))?;
            if !metadata.is_file() {
                bail!("{} is not a file", path.display());
            }
            if metadata.len() > max_bytes {
                bail!(
                    "File too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    max_bytes
                );
            }

            let contents = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(ToolOutput::text(contents))
        },
    )
}

/// Overwrite or append to an existing file.
pub fn write_file(max_bytes: u64) -> ToolDescriptor {
    ToolDescriptor::new(
        "write_file",
        "Write content to an existing file, overwriting it or appending to it.",
        schema![
            {
                name: "file_path",
                type: String,
                description: "Path to the existing file",
                required: true
            },
            {
                name: "content",
                type: String,
                description: "The content to write",
                required: true
            },
            {
                name: "append",
                type: Bool,
                description: "Append instead of overwriting",
                required: false,
                default: false
            },
        ],
        move |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);
            let content = args.require_str("content")?.to_string();
            let append = args.bool("append").unwrap_or(false);

            if content.len() as u64 > max_bytes {
                bail!(
                    "Content too large: {} bytes (max: {} bytes)",
                    content.len(),
                    max_bytes
                );
            }

            // Unlike create_file, the target must already exist.
            let metadata = fs::metadata(&path)
                .await
                .with_context(|| format!("Failed to stat {}", path.display()))?;
            if !metadata.is_file() {
                bail!("{} is not a file", path.display());
            }

            if append {
                let mut file = fs::OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                file.write_all(content.as_bytes())
                    .await
                    .with_context(|| format!("Failed to append to {}", path.display()))?;
            } else {
                fs::write(&path, &content)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }

            let action = if append { "Appended" } else { "Wrote" };
            tracing::info!(path = %path.display(), append, "wrote file");
            Ok(
                ToolOutput::text(format!(
                    "{} {} bytes to {}",
                    action,
                    content.len(),
                    path.display()
                ))
                .with_side_effect(format!("modified {}", path.display())),
            )
        },
    )
}

/// Delete a file, or a directory when `recursive` is set.
pub fn delete_file() -> ToolDescriptor {
    ToolDescriptor::new(
        "delete_file",
        "Delete a file, or a directory when 'recursive' is true.",
        schema![
            {
                name: "file_path",
                type: String,
                description: "Path to delete",
                required: true
            },
            {
                name: "recursive",
                type: Bool,
                description: "Delete directories and their contents",
                required: false,
                default: false
            },
        ],
        |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);
            let recursive = args.bool("recursive").unwrap_or(false);

            let metadata = fs::metadata(&path)
                .await
                .with_context(|| format!("Failed to stat {}", path.display()))?;

            if metadata.is_dir() {
                if recursive {
                    fs::remove_dir_all(&path)
                        .await
                        .with_context(|| format!("Failed to delete directory {}", path.display()))?;
                } else {
                    fs::remove_dir(&path).await.with_context(|| {
                        format!(
                            "Failed to delete directory {} (use recursive for non-empty directories)",
                            path.display()
                        )
                    })?;
                }
            } else {
                fs::remove_file(&path)
                    .await
                    .with_context(|| format!("Failed to delete {}", path.display()))?;
            }

            tracing::info!(path = %path.display(), "deleted");
            Ok(ToolOutput::text(format!("Deleted {}", path.display()))
                .with_side_effect(format!("deleted {}", path.display())))
        },
    )
}

/// Move a file or directory to a new location.
pub fn move_file() -> ToolDescriptor {
    ToolDescriptor::new(
        "move_file",
        "Move a file or directory to a new location.",
        schema![
            {
                name: "source_path",
                type: String,
                description: "Current path",
                required: true
            },
            {
                name: "destination_path",
                type: String,
                description: "New path",
                required: true
            },
        ],
        |args: DecodedArgs| async move {
            let source = expand_path(args.require_str("source_path")?);
            let destination = expand_path(args.require_str("destination_path")?);

            ensure_parent_dir(&destination).await?;
            fs::rename(&source, &destination).await.with_context(|| {
                format!(
                    "Failed to move {} to {}",
                    source.display(),
                    destination.display()
                )
            })?;

            tracing::info!(from = %source.display(), to = %destination.display(), "moved");
            Ok(ToolOutput::text(format!(
                "Moved {} to {}",
                source.display(),
                destination.display()
            ))
            .with_side_effect(format!(
                "moved {} to {}",
                source.display(),
                destination.display()
            )))
        },
    )
}

/// Rename a file or directory in place.
pub fn rename_file() -> ToolDescriptor {
    ToolDescriptor::new(
        "rename_file",
        "Rename a file or directory without moving it.",
        schema![
            {
                name: "file_path",
                type: String,
                description: "Path to the file or directory",
                required: true
            },
            {
                name: "new_name",
                type: String,
                description: "The new name (not a path)",
                required: true
            },
        ],
        |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);
            let new_name = args.require_str("new_name")?;

            if new_name.contains('/') || new_name.contains('\\') {
                bail!("new_name must be a bare name, not a path: {}", new_name);
            }

            let target = path
                .parent()
                .map(|p| p.join(new_name))
                .unwrap_or_else(|| PathBuf::from(new_name));
            fs::rename(&path, &target).await.with_context(|| {
                format!("Failed to rename {} to {}", path.display(), new_name)
            })?;

            tracing::info!(from = %path.display(), to = %target.display(), "renamed");
            Ok(ToolOutput::text(format!(
                "Renamed {} to {}",
                path.display(),
                target.display()
            ))
            .with_side_effect(format!("renamed {}", path.display())))
        },
    )
}

/// List directory contents, directories suffixed with `/`.
pub fn list_directory() -> ToolDescriptor {
    ToolDescriptor::new(
        "list_directory",
        "List the contents of a directory.",
        schema![{
            name: "file_path",
            type: String,
            description: "Directory to list",
            required: false,
            default: "."
        }],
        |args: DecodedArgs| async move {
            let path = expand_path(args.str("file_path").unwrap_or("."));

            let mut reader = fs::read_dir(&path)
                .await
                .with_context(|| format!("Failed to list {}", path.display()))?;

            let mut names = Vec::new();
            while let Some(entry) = reader
                .next_entry()
                .await
                .context("Failed to read directory entry")?
            {
                let mut name = entry.file_name().to_string_lossy().into_owned();
                if entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false)
                {
                    name.push('/');
                }
                names.push(name);
            }
            names.sort();

            let text = if names.is_empty() {
                format!("{} is empty", path.display())
            } else {
                names.join("\n")
            };
            Ok(ToolOutput::text(text))
        },
    )
}
