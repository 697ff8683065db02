//! Utility Tools
//!
//! Small informational and control tools: clock, host details, environment
//! variables, and a bounded delay.

use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::env;
use std::io;
use tokio::time::{sleep, Duration};

use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;

const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn current_datetime() -> ToolDescriptor {
    ToolDescriptor::new(
        "current_datetime",
        "Report the current local date and time.",
        schema![{
            name: "format",
            type: String,
            description: "strftime format string",
            required: false,
            default: DEFAULT_DATETIME_FORMAT
        }],
        |args: DecodedArgs| async move {
            let fmt = args.str("format").unwrap_or(DEFAULT_DATETIME_FORMAT).to_string();

            // chrono surfaces bad specifiers only while rendering, so check
            // the parsed items up front instead of panicking mid-format.
            let items: Vec<Item> = StrftimeItems::new(&fmt).collect();
            if items.iter().any(|item| matches!(item, Item::Error)) {
                bail!("Invalid datetime format '{}'", fmt);
            }

            let now = Local::now();
            let text = now.format_with_items(items.into_iter()).to_string();
            Ok(ToolOutput::text(text))
        },
    )
}

pub fn system_info() -> ToolDescriptor {
    ToolDescriptor::new(
        "system_info",
        "Report basic information about the host system.",
        schema![],
        |_args: DecodedArgs| async move {
            let cpus = std::thread::available_parallelism()
                .map(|n| n.get().to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            let cwd = env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "unknown".to_string());

            let text = format!(
                "os: {}\narch: {}\nfamily: {}\ncpus: {}\nworking directory: {}",
                env::consts::OS,
                env::consts::ARCH,
                env::consts::FAMILY,
                cpus,
                cwd
            );
            Ok(ToolOutput::text(text))
        },
    )
}

pub fn environment_variable() -> ToolDescriptor {
    ToolDescriptor::new(
        "environment_variable",
        "Get or set an environment variable, or list variable names.",
        schema![
            {
                name: "action",
                type: String,
                description: "One of get, set, list",
                required: true
            },
            {
                name: "name",
                type: String,
                description: "Variable name (for get and set)",
                required: false
            },
            {
                name: "value",
                type: String,
                description: "Variable value (for set)",
                required: false
            },
        ],
        |args: DecodedArgs| async move {
            let action = args.require_str("action")?.to_ascii_lowercase();

            match action.as_str() {
                "get" => {
                    let name = require_field(&args, "name", "get")?;
                    match env::var(name) {
                        Ok(value) => Ok(ToolOutput::text(format!("{}={}", name, value))),
                        Err(env::VarError::NotPresent) => Err(io::Error::new(
                            io::ErrorKind::NotFound,
                            format!("Environment variable '{}' is not set", name),
                        )
                        .into()),
                        Err(err) => Err(err.into()),
                    }
                }
                "set" => {
                    let name = require_field(&args, "name", "set")?.to_string();
                    let value = require_field(&args, "value", "set")?.to_string();
                    env::set_var(&name, &value);
                    Ok(ToolOutput::text(format!("Set {}", name))
                        .with_side_effect(format!("set environment variable {}", name)))
                }
                "list" => {
                    // Names only; values can hold credentials.
                    let mut names: Vec<String> = env::vars().map(|(name, _)| name).collect();
                    names.sort();
                    let text = format!(
                        "{} environment variables:\n{}",
                        names.len(),
                        names.join("\n")
                    );
                    Ok(ToolOutput::text(text))
                }
                other => bail!("Unsupported action '{}', expected get, set or list", other),
            }
        },
    )
}

fn require_field<'a>(args: &'a DecodedArgs, field: &str, action: &str) -> Result<&'a str> {
    args.str(field)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow::anyhow!("'{}' is required for action '{}'", field, action))
}

/// Bounded asynchronous pause, for pacing multi-step operations.
pub fn delay(max_delay_seconds: f64) -> ToolDescriptor {
    ToolDescriptor::new(
        "delay",
        "Pause for the given number of seconds before continuing.",
        schema![{
            name: "seconds",
            type: Float,
            description: "How long to pause",
            required: true
        }],
        move |args: DecodedArgs| async move {
            let requested = args
                .float("seconds")
                .ok_or_else(|| anyhow::anyhow!("schema field 'seconds' absent after decoding"))?;

            if !requested.is_finite() || requested <= 0.0 {
                bail!("Delay must be a positive number of seconds");
            }
            let effective = requested.min(max_delay_seconds);

            sleep(Duration::from_secs_f64(effective)).await;

            Ok(ToolOutput::text(format!("Waited {:.1} seconds", effective)))
        },
    )
}
