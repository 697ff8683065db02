use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "deskpilot")]
#[command(author, version, about = "Tool invocation runtime for desktop assistant agents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered tools
    Tools {
        /// Emit the capability list as JSON (for an orchestrator)
        #[arg(long)]
        json: bool,
    },

    /// Show one tool's usage text and argument schema
    Describe { name: String },

    /// Invoke a tool by name
    Invoke {
        name: String,

        /// JSON object or free-form payload; omit for tools without arguments
        payload: Option<String>,
    },
}
