//! Warehouse Agent CLI
//!
//! Interactive terminal front-end: reads user requests line by line, runs
//! each through the dialogue loop, and prints the assistant's replies.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{
    ChatBackend, DialogueConfig, DialogueLoop, GenerationOptions, Message, ToolRegistry, Transcript,
};
use agent_runtime::OpenAiBackend;
use warehouse::svckit::shared_ledger;
use warehouse::tools::{AddItemTool, GetInventoryTool, RemoveItemTool};
use warehouse::WAREHOUSE_AGENT_PROMPT;

/// Inputs that end the session (matched case-insensitively)
const EXIT_KEYWORDS: &[&str] = &["exit", "quit"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize chat backend
    let backend = Arc::new(
        OpenAiBackend::from_env()
            .context("cannot start: set OPENAI_API_KEY in the environment or in .env")?,
    );

    match backend.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to OpenAI API"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ OpenAI API not reachable - requests will fail");
        }
    }

    // Initialize tools over one shared ledger
    let ledger = shared_ledger();
    let mut tools = ToolRegistry::new();
    tools.register(AddItemTool::new(ledger.clone()));
    tools.register(RemoveItemTool::new(ledger.clone()));
    tools.register(GetInventoryTool::new(ledger));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let config = DialogueConfig {
        options: GenerationOptions {
            model: backend.model().to_string(),
            ..GenerationOptions::default()
        },
    };
    let dialogue = DialogueLoop::new(backend, Arc::new(tools), config);
    let mut transcript = Transcript::with_system_prompt(WAREHOUSE_AGENT_PROMPT);

    println!(
        "{} (model: {})",
        "Warehouse agent ready.".bold(),
        dialogue.options().model
    );
    println!("Type 'exit' or 'quit' to end the session.\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "{} ", "You:".yellow().bold())?;
        stdout.flush()?;

        line.clear();
        // EOF ends the session like an exit keyword
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_KEYWORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }

        let reply = dialogue.run_turn(&mut transcript, input).await;
        if !reply.is_empty() {
            println!("{} {}\n", "Assistant:".green().bold(), reply);
            transcript.push(Message::assistant(reply));
        }
    }

    println!("Goodbye.");
    Ok(())
}
