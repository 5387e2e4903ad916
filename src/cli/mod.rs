//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and dispatching to the
//! interactive chat, the one-shot `say` command, history management and
//! configuration commands.

pub mod context;
pub mod say;
pub mod sessions;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::context::open_controller;
use crate::cli::say::run_say;
use crate::cli::sessions::run_sessions;
use crate::core::config::data::SETTABLE_KEYS;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogTarget};

#[derive(Parser)]
#[command(name = "shanai")]
#[command(about = "A terminal chat client for Gemini with saved conversations")]
#[command(
    long_about = "Shanai is a terminal chat client that sends each message to a Gemini \
generateContent endpoint and keeps every completed conversation so it can be \
reopened later. Fenced code in replies is shown as separate blocks.\n\n\
Configuration:\n\
  shanai set api-key <KEY>   Store the API key in the config file\n\n\
Environment Variables (fallback if no key configured):\n\
  GEMINI_API_KEY    Your Gemini API key\n\
  GEMINI_BASE_URL   Custom models base URL\n\
  SHANAI_LOG        Log filter directive (e.g. shanai=debug)\n\n\
Controls:\n\
  Enter             Send the message (or open the selected conversation)\n\
  Tab               Switch focus between input and history\n\
  Ctrl+N            Start a new conversation\n\
  Up/Down           Select a conversation in the history list\n\
  Delete / d        Delete the selected conversation\n\
  PageUp/PageDown   Scroll the conversation\n\
  Ctrl+C / Esc      Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostic logs to the given file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message text (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List, show or delete saved conversations
    Sessions {
        #[command(subcommand)]
        command: Option<SessionCommands>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set (api-key, model, base-url, data-dir)
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommands {
    /// List saved conversations, newest first (default)
    List,
    /// Print every message of a conversation
    Show { id: String },
    /// Delete a conversation
    Delete { id: String },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    let interactive = matches!(command, Commands::Chat);
    init_tracing(&LogTarget::choose(args.log, interactive))?;

    match command {
        Commands::Chat => {
            let config = Config::load()?;
            let controller = open_or_exit(&config);
            run_chat(controller).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                eprintln!("Usage: shanai say <prompt>");
                std::process::exit(1);
            }
            let mut controller = open_or_exit(&config);
            if !run_say(&mut controller, &prompt).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Sessions { command } => {
            let config = Config::load()?;
            let store = context::open_session_store(&config)?;
            run_sessions(store, command.unwrap_or(SessionCommands::List))
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let Some(key) = key else {
                config.print_all();
                return Ok(());
            };
            if value.is_empty() {
                eprintln!("⚠️  To set {key}, provide a value:");
                eprintln!("Example: shanai set {key} <VALUE>");
                std::process::exit(1);
            }
            if let Err(e) = config.set_value(&key, &value.join(" ")) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(e) = config.unset_value(&key) {
                eprintln!("❌ {e}");
                eprintln!("Known keys: {}", SETTABLE_KEYS.join(", "));
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
    }
}

fn open_or_exit(config: &Config) -> context::Controller {
    match open_controller(config) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}
