//! Command-line interface parsing and handling
//!
//! Parses arguments, loads configuration and credentials, then either lists
//! registries, manages the stored API key, or starts the chat page.

#[cfg(test)]
mod tests;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::chat_stream::ChatStreamClient;
use crate::core::config::Config;
use crate::core::controller::{ConversationController, SelectionError};
use crate::core::credentials::{remove_api_key, resolve_api_key, store_api_key, ApiKey};
use crate::core::models::{all_models, default_model};
use crate::core::persona::{all_personas, default_persona};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogDestination};
use crate::utils::url::normalize_base_url;

#[derive(Parser)]
#[command(name = "stephen-wolf")]
#[command(version)]
#[command(about = "Persona-driven terminal chat over the Groq API")]
#[command(
    long_about = "Stephen Wolf is a full-screen terminal chat page. Pick one of ten expert \
personas and a hosted model, then converse with streamed replies.\n\n\
Authentication:\n\
  Use 'stephen-wolf auth' to store a Groq API key in the system keyring.\n\
  GROQ_API_KEY is used when no key is stored.\n\n\
Controls:\n\
  Enter             Send the message\n\
  F2 / F3           Next persona / next model (clears the conversation)\n\
  Ctrl+L            Clear the conversation\n\
  Ctrl+S            Save a snapshot to this session's log\n\
  Ctrl+E            Export the conversation as JSON\n\
  Up/Down/PgUp/PgDn Scroll the transcript\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /help             List slash commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Persona to start with
    #[arg(short = 'p', long, global = true, value_name = "PERSONA")]
    pub persona: Option<String>,

    /// Model to start with (display name or backend id)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostics to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List available personas
    Personas,
    /// List available models
    Models,
    /// Store a Groq API key in the system keyring (read from stdin)
    Auth,
    /// Remove the stored API key
    Deauth,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.as_ref().unwrap_or(&Commands::Chat) {
        Commands::Chat => start_chat(&args).await,
        Commands::Personas => {
            print!("{}", persona_listing());
            Ok(())
        }
        Commands::Models => {
            print!("{}", model_listing());
            Ok(())
        }
        Commands::Auth => {
            init_tracing(&LogDestination::resolve(args.log.as_deref(), None, false))?;
            if let Err(e) = interactive_auth() {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            init_tracing(&LogDestination::resolve(args.log.as_deref(), None, false))?;
            match remove_api_key() {
                Ok(true) => println!("✅ Removed stored API key"),
                Ok(false) => println!("No stored API key"),
                Err(e) => {
                    eprintln!("❌ Deauthentication failed: {e}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}

async fn start_chat(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&LogDestination::resolve(
        args.log.as_deref(),
        config.log_file(),
        true,
    ))?;

    let api_key = match resolve_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let base_url = normalize_base_url(args.base_url.as_deref().unwrap_or(config.base_url()));
    let client = ChatStreamClient::new(base_url, api_key);
    info!(base_url = client.base_url(), "starting chat");
    let mut controller = ConversationController::new(Arc::new(client));
    if let Err(e) = apply_startup_selection(
        &mut controller,
        args.persona.as_deref(),
        args.model.as_deref(),
    ) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    run_chat(controller, config.export_dir()).await
}

/// Apply `--persona`/`--model` before any message is exchanged.
pub fn apply_startup_selection(
    controller: &mut ConversationController,
    persona: Option<&str>,
    model: Option<&str>,
) -> Result<(), SelectionError> {
    if let Some(name) = persona {
        controller.select_persona(name)?;
    }
    if let Some(name) = model {
        controller.select_model(name)?;
    }
    Ok(())
}

fn interactive_auth() -> Result<(), Box<dyn Error>> {
    eprint!("Enter your Groq API key: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let key = ApiKey::new(line)?;
    store_api_key(&key)?;

    println!("✅ API key stored in the system keyring");
    Ok(())
}

pub fn persona_listing() -> String {
    let default = default_persona();
    let mut out = String::from("Available personas:\n");
    for persona in all_personas() {
        let marker = if persona.name == default.name { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<24}{}\n",
            persona.name, persona.description
        ));
    }
    out
}

pub fn model_listing() -> String {
    let default = default_model();
    let mut out = String::from("Available models:\n");
    for model in all_models() {
        let marker = if model.display_name == default.display_name {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "{marker} {:<16}{}\n",
            model.display_name, model.backend_id
        ));
    }
    out
}
