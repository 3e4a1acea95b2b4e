//! # pentrex CLI
//!
//! Command-line interface for pentrex, an AI penetration testing assistant.
//!
//! ## Usage
//!
//! - `pentrex` - Start the interactive chat
//! - `pentrex agent "task"` - Run the autonomous agent once
//! - `pentrex crew "task"` - Run the orchestrator and its workers
//! - `pentrex learn ...` - Offline quizzes, explanations and guides

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use config::CliConfigLoader;

/// pentrex - AI penetration testing assistant
#[derive(Parser)]
#[command(name = "pentrex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI penetration testing assistant and cybersecurity tutor")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API key override
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long, global = true)]
    model: Option<String>,

    /// Target host, IP or range
    #[arg(short, long, global = true)]
    target: Option<String>,

    /// Iteration cap for the chat, agent and orchestrator loops
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Notes file path
    #[arg(long, global = true)]
    notes_file: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat (default)
    Chat,

    /// Run the autonomous agent on a task
    Agent {
        /// Task description
        task: String,
    },

    /// Run the crew orchestrator on a task
    Crew {
        /// Task description
        task: String,
    },

    /// Run a playbook against the target
    Playbook {
        /// Playbook name
        name: String,
    },

    /// List playbooks
    Playbooks,

    /// Show available tools
    Tools,

    /// Show saved findings, filtered by --target when given
    Notes {
        /// Only notes in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Write a markdown report from the saved findings
    Report {
        /// Directory for the report file
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Offline learning: quizzes, explanations, tool guides and scenarios
    Learn {
        #[command(subcommand)]
        action: LearnCommand,
    },
}

#[derive(Subcommand)]
pub enum LearnCommand {
    /// Answer a quiz question
    Quiz {
        /// Domain name or "random"
        domain: Option<String>,
    },
    /// Explain a security concept
    Explain {
        /// Topic, e.g. "sql injection"
        topic: Option<String>,
    },
    /// Show a tool usage guide
    Tool {
        /// Tool name, e.g. nmap
        name: Option<String>,
    },
    /// Walk through a practice scenario
    Scenario {
        /// Scenario name
        name: Option<String>,
    },
    /// List everything available offline
    List,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }
    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }
    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }
    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }
    if let Some(target) = &cli.target {
        loader = loader.with_target_override(target.clone());
    }
    if let Some(max_iterations) = cli.max_iterations {
        loader = loader.with_max_iterations_override(max_iterations);
    }
    if let Some(notes_file) = &cli.notes_file {
        loader = loader.with_notes_file_override(notes_file.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    pentrex_core::init_tracing_with_debug(cli.verbose);

    let config = build_config_loader(&cli).load().await?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat_command(config).await,
        Commands::Agent { task } => commands::agent_command(config, &task).await,
        Commands::Crew { task } => commands::crew_command(config, &task).await,
        Commands::Playbook { name } => commands::playbook_command(config, &name).await,
        Commands::Playbooks => commands::playbooks_command(config),
        Commands::Tools => commands::tools_command(config),
        Commands::Notes { category } => commands::notes_command(config, category).await,
        Commands::Report { output_dir } => commands::report_command(config, output_dir).await,
        Commands::Learn { action } => commands::learn_command(action).await,
    }
}
