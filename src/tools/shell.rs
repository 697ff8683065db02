//! Shell Command Tool
//!
//! Information Hiding:
//! - Process spawning and output capture hidden inside the operation
//! - Timeout clamping and the optional allowlist enforced here
//!
//! `timeout_seconds` is a declared schema field with a configured default
//! and hard cap, not a per-call magic constant.

use anyhow::bail;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;

/// Build the `execute_shell` descriptor.
///
/// `allowed_commands`, when set, restricts execution to commands whose
/// first word matches an entry.
pub fn execute_shell(
    default_timeout_secs: u64,
    max_timeout_secs: u64,
    allowed_commands: Option<Vec<String>>,
) -> ToolDescriptor {
    ToolDescriptor::new(
        "execute_shell",
        "Execute a shell command and return its output.",
        schema![
            {
                name: "command",
                type: String,
                description: "The shell command to execute",
                required: true
            },
            {
                name: "timeout_seconds",
                type: Int,
                description: "Seconds to wait before giving up",
                required: false,
                default: default_timeout_secs as i64
            },
        ],
        move |args: DecodedArgs| {
            let allowed_commands = allowed_commands.clone();
            async move {
                let command = args.require_str("command")?.to_string();
                if command.trim().is_empty() {
                    bail!("Command cannot be empty");
                }

                if let Some(allowed) = &allowed_commands {
                    let base = command.split_whitespace().next().unwrap_or_default();
                    if !allowed.iter().any(|entry| entry == base) {
                        bail!("Command '{}' is not in the allowed list", base);
                    }
                }

                let requested = args.int("timeout_seconds").unwrap_or(default_timeout_secs as i64);
                let effective = clamp_timeout(requested, max_timeout_secs);

                tracing::info!(%command, timeout_secs = effective, "executing shell command");

                let result = timeout(
                    Duration::from_secs(effective),
                    Command::new("sh").arg("-c").arg(&command).output(),
                )
                .await;

                let output = match result {
                    Ok(run) => run?,
                    Err(_) => bail!("Command timed out after {} seconds", effective),
                };

                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);

                if !output.status.success() {
                    bail!(
                        "Command failed with exit code {:?}\nstdout: {}\nstderr: {}",
                        output.status.code(),
                        stdout,
                        stderr
                    );
                }

                let text = if stderr.is_empty() {
                    stdout.into_owned()
                } else {
                    format!("stdout:\n{}\nstderr:\n{}", stdout, stderr)
                };
                Ok(ToolOutput::text(text).with_side_effect(format!("ran command: {}", command)))
            }
        },
    )
}

fn clamp_timeout(requested: i64, max_secs: u64) -> u64 {
    if requested <= 0 {
        1
    } else {
        (requested as u64).min(max_secs)
    }
}
