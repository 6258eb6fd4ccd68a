pub mod commands;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Vault CLI - Admin console for the UnibenEngVault course material API")]
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
    #[command(about = "Session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Department management")]
    Departments {
        #[command(subcommand)]
        cmd: commands::departments::DepartmentCommands,
    },

    #[command(about = "Level management")]
    Levels {
        #[command(subcommand)]
        cmd: commands::levels::LevelCommands,
    },

    #[command(about = "Course management")]
    Courses {
        #[command(subcommand)]
        cmd: commands::courses::CourseCommands,
    },

    #[command(about = "User management")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "File review and upload")]
    Files {
        #[command(subcommand)]
        cmd: commands::files::FileCommands,
    },

    #[command(about = "Dashboard counts")]
    Stats,
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

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Departments { cmd } => commands::departments::handle(cmd, output_format).await,
        Commands::Levels { cmd } => commands::levels::handle(cmd, output_format).await,
        Commands::Courses { cmd } => commands::courses::handle(cmd, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, output_format).await,
        Commands::Files { cmd } => commands::files::handle(cmd, output_format).await,
        Commands::Stats => commands::stats::handle(output_format).await,
    }
}
