use anyhow::Result;
use clap::Parser;
use deskpilot::cli::{Cli, Commands};
use deskpilot::tools::format::ERROR_PREFIX;
use deskpilot::{utils, Settings, ToolHost};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let host = ToolHost::with_default_tools(&settings).await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Tools { json } => handle_tools(&host, json),
        Commands::Describe { name } => handle_describe(&host, &name),
        Commands::Invoke { name, payload } => handle_invoke(&host, &name, payload).await,
    }
}

fn handle_tools(host: &ToolHost, json: bool) -> Result<()> {
    if json {
        let manifests = host.registry().manifests();
        println!("{}", serde_json::to_string_pretty(&manifests)?);
        return Ok(());
    }

    utils::print_header(&format!("{} registered tools", host.capabilities().len()));
    for descriptor in host.capabilities() {
        utils::print_tool_line(descriptor.name(), descriptor.usage_text());
    }
    Ok(())
}

fn handle_describe(host: &ToolHost, name: &str) -> Result<()> {
    let descriptor = host.registry().lookup(name)?;

    utils::print_header(descriptor.name());
    println!("{}", descriptor.usage_text());

    if descriptor.schema().is_empty() {
        println!("\nNo arguments.");
        return Ok(());
    }

    println!("\nArguments:");
    for field in descriptor.schema() {
        let requirement = if field.required {
            "required".to_string()
        } else if let Some(default) = &field.default {
            format!("optional, default {}", default)
        } else {
            "optional".to_string()
        };
        utils::print_field(
            &field.name,
            &format!("({}) {} [{}]", field.ty, field.description, requirement),
        );
    }
    Ok(())
}

async fn handle_invoke(host: &ToolHost, name: &str, payload: Option<String>) -> Result<()> {
    let output = host
        .invoke_by_name(name, payload.unwrap_or_default())
        .await;

    if output.starts_with(ERROR_PREFIX) {
        utils::print_error(&output);
        std::process::exit(1);
    }
    println!("{}", output);
    Ok(())
}
