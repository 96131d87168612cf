pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::ClientApp;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard CLI - session-aware client for the Taskboard tracker")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and inspect the stored session")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Evaluate navigation to a path with the current session")]
    Nav {
        #[arg(help = "Path to navigate to, e.g. /projects/1/tasks/2")]
        path: String,
    },

    #[command(about = "List the navigation table")]
    Routes,

    #[command(about = "Task operations")]
    Task {
        #[command(subcommand)]
        cmd: commands::task::TaskCommands,
    },

    #[command(about = "Project operations")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut app = ClientApp::from_config(crate::config::config())?;

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut app, &output_format).await,
        Commands::Nav { path } => commands::nav::navigate(&path, &mut app, &output_format),
        Commands::Routes => commands::nav::routes(&app, &output_format),
        Commands::Task { cmd } => commands::task::handle(cmd, &mut app, &output_format).await,
        Commands::Project { cmd } => commands::project::handle(cmd, &mut app, &output_format).await,
    };

    // Text mode leaves error printing to the binary; JSON callers get an envelope on stdout
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        utils::output_error(&output_format, &e.to_string(), utils::error_code(e))?;
    }
    result
}
