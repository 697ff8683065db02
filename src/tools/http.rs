//! HTTP Tools
//!
//! Information Hiding:
//! - Client construction and response handling hidden inside operations
//! - Domain allowlist and timeout clamping enforced here

use anyhow::{bail, Context, Result};
use reqwest::Client;
use tokio::fs;
use tokio::time::{timeout, Duration};

use super::filesystem::{ensure_parent_dir, expand_path};
use super::{DecodedArgs, ToolDescriptor, ToolOutput};
use crate::schema;

fn check_domain(url: &str, allowed: &Option<Vec<String>>) -> Result<()> {
    if let Some(domains) = allowed {
        if !domains.iter().any(|domain| url.contains(domain)) {
            bail!("Access to the domain in '{}' is not allowed", url);
        }
    }
    Ok(())
}

fn clamp_timeout(requested: i64, max_secs: u64) -> u64 {
    if requested <= 0 {
        1
    } else {
        (requested as u64).min(max_secs)
    }
}

/// Build the `http_request` descriptor (GET and POST).
pub fn http_request(
    default_timeout_secs: u64,
    max_timeout_secs: u64,
    allowed_domains: Option<Vec<String>>,
) -> ToolDescriptor {
    let client = Client::new();
    ToolDescriptor::new(
        "http_request",
        "Make an HTTP GET or POST request and return the response body.",
        schema![
            {
                name: "url",
                type: String,
                description: "The URL to request",
                required: true
            },
            {
                name: "method",
                type: String,
                description: "HTTP method, GET or POST",
                required: false,
                default: "GET"
            },
            {
                name: "body",
                type: String,
                description: "Request body for POST requests",
                required: false
            },
            {
                name: "timeout_seconds",
                type: Int,
                description: "Seconds to wait for the response",
                required: false,
                default: default_timeout_secs as i64
            },
        ],
        move |args: DecodedArgs| {
            let client = client.clone();
            let allowed_domains = allowed_domains.clone();
            async move {
                let url = args.require_str("url")?.to_string();
                check_domain(&url, &allowed_domains)?;

                let method = args
                    .str("method")
                    .unwrap_or("GET")
                    .to_ascii_uppercase();
                let requested = args.int("timeout_seconds").unwrap_or(default_timeout_secs as i64);
                let effective = clamp_timeout(requested, max_timeout_secs);

                tracing::info!(%method, %url, timeout_secs = effective, "http request");

                let request_future = async {
                    let response = match method.as_str() {
                        "GET" => client.get(&url).send().await?,
                        "POST" => {
                            let body = args.str("body").unwrap_or_default().to_string();
                            client.post(&url).body(body).send().await?
                        }
                        other => bail!("Only GET and POST are supported, got {}", other),
                    };
                    let status = response.status();
                    let body = response.text().await?;
                    Ok::<_, anyhow::Error>((status, body))
                };

                let (status, body) = match timeout(Duration::from_secs(effective), request_future).await
                {
                    Ok(outcome) => outcome?,
                    Err(_) => bail!("Request timed out after {} seconds", effective),
                };

                if !status.is_success() {
                    bail!("HTTP error {}\n{}", status, body);
                }
                Ok(ToolOutput::text(format!("Status: {}\n\n{}", status, body)))
            }
        },
    )
}

/// Build the `download_file` descriptor.
pub fn download_file(
    default_timeout_secs: u64,
    max_timeout_secs: u64,
    allowed_domains: Option<Vec<String>>,
) -> ToolDescriptor {
    let client = Client::new();
    ToolDescriptor::new(
        "download_file",
        "Download a URL to a local file.",
        schema![
            {
                name: "url",
                type: String,
                description: "The URL to download",
                required: true
            },
            {
                name: "file_path",
                type: String,
                description: "Where to save the downloaded content",
                required: true
            },
            {
                name: "timeout_seconds",
                type: Int,
                description: "Seconds to wait for the download",
                required: false,
                default: default_timeout_secs as i64
            },
        ],
        move |args: DecodedArgs| {
            let client = client.clone();
            let allowed_domains = allowed_domains.clone();
            async move {
                let url = args.require_str("url")?.to_string();
                check_domain(&url, &allowed_domains)?;
                let path = expand_path(args.require_str("file_path")?);

                let requested = args.int("timeout_seconds").unwrap_or(default_timeout_secs as i64);
                let effective = clamp_timeout(requested, max_timeout_secs);

                tracing::info!(%url, path = %path.display(), "downloading");

                let download_future = async {
                    let response = client.get(&url).send().await?;
                    let status = response.status();
                    if !status.is_success() {
                        bail!("HTTP error {} while downloading {}", status, url);
                    }
                    let bytes = response.bytes().await?;
                    Ok::<_, anyhow::Error>(bytes)
                };

                let bytes = match timeout(Duration::from_secs(effective), download_future).await {
                    Ok(outcome) => outcome?,
                    Err(_) => bail!("Download timed out after {} seconds", effective),
                };

                ensure_parent_dir(&path).await?;
                fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("Failed to save download to {}", path.display()))?;

                Ok(ToolOutput::text(format!(
                    "Downloaded {} bytes to {}",
                    bytes.len(),
                    path.display()
                ))
                .with_side_effect(format!("wrote {} from {}", path.display(), url)))
            }
        },
    )
}
