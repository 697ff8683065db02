//! File Content Search Tool
//!
//! Regex search over a single text file, reporting line-numbered matches.

use anyhow::Context;
use regex::RegexBuilder;
use tokio::fs;

use super::filesystem::expand_path;
use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;

const MAX_REPORTED_MATCHES: usize = 100;

pub fn search_file_content(max_bytes: u64) -> ToolDescriptor {
    ToolDescriptor::new(
        "search_file_content",
        "Search a text file with a regular expression and report matching lines.",
        schema![
            {
                name: "file_path",
                type: String,
                description: "The file to search",
                required: true
            },
            {
                name: "pattern",
                type: String,
                description: "Regular expression to look for",
                required: true
            },
            {
                name: "ignore_case",
                type: Bool,
                description: "Match case-insensitively",
                required: false,
                default: false
            },
        ],
        move |args: DecodedArgs| async move {
            let path = expand_path(args.require_str("file_path")?);
            let pattern = args.require_str("pattern")?;
            let ignore_case = args.bool("ignore_case").unwrap_or(false);

            let regex = RegexBuilder::new(pattern)
                .case_insensitive(ignore_case)
                .build()
                .with_context(|| format!("Invalid search pattern '{}'", pattern))?;

            let metadata = fs::metadata(&path)
                .await
                .with_context(|| format!("Failed to stat {}", path.display()))?;
            if metadata.len() > max_bytes {
                anyhow::bail!(
                    "File too large to search: {} bytes (max: {} bytes)",
                    metadata.len(),
                    max_bytes
                );
            }

            let contents = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let mut matches = Vec::new();
            for (number, line) in contents.lines().enumerate() {
                if regex.is_match(line) {
                    matches.push(format!("{}: {}", number + 1, line.trim_end()));
                    if matches.len() >= MAX_REPORTED_MATCHES {
                        break;
                    }
                }
            }

            let text = if matches.is_empty() {
                format!("No matches for '{}' in {}", pattern, path.display())
            } else {
                let mut report = format!(
                    "{} matching line(s) in {}:\n",
                    matches.len(),
                    path.display()
                );
                report.push_str(&matches.join("\n"));
                if matches.len() >= MAX_REPORTED_MATCHES {
                    report.push_str("\n(more matches truncated)");
                }
                report
            };
            Ok(ToolOutput::text(text))
        },
    )
}
