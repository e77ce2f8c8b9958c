//! nerlm - CLI entry point.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nerlm::chat::{InMemoryStore, MemoryChat};
use nerlm::client::ChatMessage;
use nerlm::models::{DEFAULT_CHAT_MODEL, DEFAULT_EXTRACTION_MODEL};
use nerlm::schema::extraction_instruction;
use nerlm::{
    CoercionMode, Destination, EntityExtractionResult, ModelId, RetryPolicy, Settings,
    StructuredOutcome, build_client, extract_with_retry,
};

/// Structured LLM responses, entity extraction, and memory chat.
#[derive(Parser, Debug)]
#[command(name = "nerlm")]
#[command(about = "Schema-validated LLM responses for entity extraction and chat")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract named entities from a transaction narration
    Extract {
        /// Narration text to analyze
        #[arg(long)]
        text: String,

        /// Record ID echoed back as txnId
        #[arg(long, default_value = "cli")]
        id: String,

        /// Model identifier (defaults to the registry's extraction model)
        #[arg(long)]
        model: Option<String>,

        /// Send the request to the local inference server
        #[arg(long)]
        local: bool,

        /// Request output through a forced tool call instead of a JSON schema
        #[arg(long)]
        tool_mode: bool,

        /// Maximum number of attempts
        #[arg(long, default_value_t = nerlm::retry::DEFAULT_MAX_ATTEMPTS)]
        retries: u32,
    },

    /// Chat with per-user memory, one message per stdin line
    Chat {
        /// User ID that scopes the memory
        #[arg(long)]
        user: String,

        /// Model identifier (defaults to the registry's chat model)
        #[arg(long)]
        model: Option<String>,

        /// Send requests to the local inference server
        #[arg(long)]
        local: bool,
    },

    /// List known models
    Models,

    /// Show the remote API key's usage and limits
    KeyStatus,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nerlm=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Models => {
            print_models();
            Ok(())
        }
        Command::KeyStatus => key_status().await,
        Command::Extract {
            text,
            id,
            model,
            local,
            tool_mode,
            retries,
        } => {
            let mode = if tool_mode {
                CoercionMode::Tool
            } else {
                CoercionMode::Json
            };
            let model = model.unwrap_or_else(|| DEFAULT_EXTRACTION_MODEL.as_str().to_string());
            extract(&text, &id, &model, destination(local), mode, retries).await
        }
        Command::Chat { user, model, local } => {
            let model = model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.as_str().to_string());
            chat(&user, &model, destination(local)).await
        }
    }
}

fn destination(local: bool) -> Destination {
    if local {
        Destination::Local
    } else {
        Destination::Remote
    }
}

fn load_settings() -> Result<Settings> {
    Settings::from_env().context("Failed to load settings")
}

async fn extract(
    text: &str,
    id: &str,
    model: &str,
    destination: Destination,
    mode: CoercionMode,
    retries: u32,
) -> Result<()> {
    let settings = load_settings()?;
    let client = build_client(&settings, destination, mode).context("Failed to build client")?;
    let policy = RetryPolicy::default().with_max_attempts(retries);

    let instruction = extraction_instruction(id, text);
    let outcome =
        extract_with_retry::<EntityExtractionResult, _>(&client, model, &instruction, &policy)
            .await;

    match &outcome {
        StructuredOutcome::Success { value, .. } => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        StructuredOutcome::Failure { error, .. } => {
            if let Some((error_payload, info_payload)) = outcome.failure_payloads() {
                println!("{}", serde_json::to_string_pretty(&error_payload)?);
                println!("{}", serde_json::to_string_pretty(&info_payload)?);
            }
            bail!("Extraction failed: {}", error)
        }
    }
}

async fn chat(user: &str, model: &str, destination: Destination) -> Result<()> {
    let settings = load_settings()?;
    let client = build_client(&settings, destination, CoercionMode::Json)
        .context("Failed to build client")?;
    let chat = MemoryChat::new(client, InMemoryStore::new()).with_model(model);

    let mut conversation = Vec::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        conversation.push(ChatMessage::user(line));
        let reply = chat
            .handle_message(user, &mut conversation)
            .await
            .context("Chat turn failed")?;

        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn key_status() -> Result<()> {
    let settings = load_settings()?;
    let client = build_client(&settings, Destination::Remote, CoercionMode::Json)
        .context("Failed to build client")?;
    let status = client
        .key_status()
        .await
        .context("Failed to fetch key status")?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn print_models() {
    for model in ModelId::ALL {
        let cost = match model.cost_per_million_tokens() {
            Some(c) => format!("${:.3}/M", c),
            None => "unknown".to_string(),
        };
        println!(
            "{:<50} {:<7} {}",
            model.as_str(),
            model.default_destination().as_str(),
            cost
        );
    }
}
