use anyhow::Result;
use clap::{Parser, Subcommand};
use pulse_core::PulseConfig;
use pulse_gateway::GatewayServer;
use pulse_memory::{ChatResponse, ScoreCoordinator};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, default_value = "pulse.toml")]
    config: PathBuf,

    /// Storage directory for per-user memory documents
    #[arg(short, long, env = "PULSE_MEM_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP gateway
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Score a set of answers once and print the summary
    Score {
        #[arg(short, long, default_value = "default")]
        user: String,
        #[arg(short, long)]
        nickname: Option<String>,
        /// Free-text answers, joined before scoring
        #[arg(required = true)]
        answers: Vec<String>,
    },
    /// Interactive chat loop feeding the buffering state machine
    Chat {
        #[arg(short, long, default_value = "default")]
        user: String,
        #[arg(short, long)]
        nickname: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = PulseConfig::load_or_default(&cli.config);
    if let Some(dir) = cli.dir {
        config.storage.dir = dir;
    }
    let coordinator = Arc::new(ScoreCoordinator::new(config));

    match cli.command {
        Command::Serve { host, port } => {
            info!("Starting Pulse gateway...");
            GatewayServer::new(coordinator, &host, port).serve().await
        }
        Command::Score {
            user,
            nickname,
            answers,
        } => {
            let summary = coordinator
                .submit_answers(&user, nickname.as_deref(), &answers)
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Chat { user, nickname } => chat_loop(coordinator, &user, nickname.as_deref()).await,
    }
}

/// Read messages from stdin until "quit"; print queued acks and, when the
/// buffer flushes, the full summary.
async fn chat_loop(
    coordinator: Arc<ScoreCoordinator>,
    user: &str,
    nickname: Option<&str>,
) -> Result<()> {
    println!("Pulse chat for '{user}'. Type 'quit' to exit.");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            print!("> ");
            io::stdout().flush()?;
            continue;
        }

        match coordinator.submit_chat(user, nickname, trimmed).await {
            Ok(ChatResponse::Queued { count, threshold }) => {
                println!("[queued {count}/{threshold}]");
            }
            Ok(ChatResponse::Scored(summary)) => {
                println!("{}", serde_json::to_string_pretty(&*summary)?);
            }
            Err(e) => {
                tracing::error!("Chat submission failed: {}", e);
                println!("[error] {e}");
            }
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
