use std::sync::{Arc, Mutex};

use anyhow::Context;
use ask_chat::{ask_once, AppConfig, AppError, HttpAskClient, TerminalSession};
use ask_chat_core::Conversation;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "ask-chat")]
#[command(version)]
#[command(about = "Chat with the company knowledge companion from the terminal", long_about = None)]
struct Cli {
    /// Backend base address (overrides API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Ask the backend to include web search results
    #[arg(long, global = true)]
    web: bool,

    /// Restrict web search to this domain (repeatable)
    #[arg(long = "web-domain", value_name = "DOMAIN", global = true)]
    web_domains: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat session (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Check that the backend is reachable
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Logs go to stderr so the conversation on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ask_chat=info,ask_chat_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.api_base, cli.web, cli.web_domains);
    let client = HttpAskClient::new(config.api_base.clone());
    info!(api_base = %config.api_base, web = config.ask_options.web, "configured");

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let session_id = Uuid::new_v4();
            let out = Arc::new(Mutex::new(std::io::stdout()));
            let conversation = Conversation::with_options(config.ask_options);
            let mut session = TerminalSession::new(conversation, client, out);
            session
                .run(BufReader::new(tokio::io::stdin()))
                .instrument(info_span!("session", id = %session_id))
                .await
                .context("chat session failed")?;
        }
        Command::Ask { question } => {
            let question = question.join(" ");
            let turn = ask_once(&client, config.ask_options, &question).await?;
            println!("{}", turn.text);
            for source in &turn.sources {
                println!("source: {source}");
            }
        }
        Command::Status => {
            let report = client.status().await?;
            if !report.ok {
                println!("not ok");
                return Err(AppError::BackendNotOk { base_url: config.api_base }.into());
            }
            println!("ok");
        }
    }
    Ok(())
}
