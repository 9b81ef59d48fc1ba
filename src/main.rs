use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use venue_wake::config::Config;
use venue_wake::fuzzy::levenshtein;
use venue_wake::stats::DetectionStats;
use venue_wake::worker::{self, Worker};
use venue_wake::{EngineSettings, Inbound, Outbound, WakeWordEngine};

#[derive(Parser)]
#[command(name = "venue-wake")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wake phrase override
    #[arg(long, global = true)]
    phrase: Option<String>,

    /// Maximum edit distance override
    #[arg(long, global = true)]
    max_distance: Option<usize>,

    /// Debounce window override, in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Ignore punctuation and digits in transcripts
    #[arg(long, global = true, overrides_with = "no_strip_punctuation")]
    strip_punctuation: bool,

    /// Match punctuation and digits, even if the config file strips them
    #[arg(long, global = true, overrides_with = "strip_punctuation")]
    no_strip_punctuation: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read transcript lines from stdin, print detections as JSON (default)
    Listen,
    /// Read JSON messages from stdin, print JSON replies
    Serve,
    /// Check a single transcript
    Check { text: String },
    /// Print the edit distance between two strings
    Distance { a: String, b: String },
}

#[hotpath::main]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    let mut cli = Cli::parse();

    match cli.command.take() {
        Some(Command::Distance { a, b }) => {
            println!("{}", levenshtein(&a, &b));
            Ok(())
        }
        Some(Command::Check { text }) => {
            let mut engine = build_engine(&cli)?;
            match engine.check(&text, 0) {
                Some(event) => println!("{}", serde_json::to_string(&Outbound::from(event))?),
                None => eprintln!("No wake phrase in transcript."),
            }
            Ok(())
        }
        Some(Command::Serve) => run_session(worker::spawn(build_engine(&cli)?), true).await,
        Some(Command::Listen) | None => {
            let engine = build_engine(&cli)?;
            eprintln!(
                "Listening for \"{}\"... (one transcript per line, Ctrl+D to finish)\n",
                engine.config().phrase()
            );
            run_session(worker::spawn(engine), false).await
        }
    }
}

fn build_engine(cli: &Cli) -> Result<WakeWordEngine> {
    let settings = settings_from(cli)?;
    WakeWordEngine::with_settings(&settings).context("invalid wake word settings")
}

/// Config file values with CLI flags layered on top
fn settings_from(cli: &Cli) -> Result<EngineSettings> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    Ok(apply_overrides(EngineSettings::from(&config.wake), cli))
}

fn apply_overrides(mut settings: EngineSettings, cli: &Cli) -> EngineSettings {
    if let Some(phrase) = &cli.phrase {
        settings.phrase = phrase.clone();
    }
    if let Some(max_distance) = cli.max_distance {
        settings.max_distance = max_distance;
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        settings.debounce_ms = debounce_ms;
    }
    if cli.strip_punctuation {
        settings.strip_punctuation = true;
    } else if cli.no_strip_punctuation {
        settings.strip_punctuation = false;
    }
    settings
}

/// Pump stdin into the worker and worker replies to stdout until either ends
async fn run_session(worker: Worker, json_input: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("reading stdin")? {
                    Some(line) => {
                        if let Some(msg) = parse_line(&line, json_input) {
                            if worker.tx.send_async(msg).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => {
                        stdin_open = false;
                        // Worker drains what it already has, then closes its outbound side
                        if worker.tx.send_async(Inbound::Shutdown).await.is_err() {
                            break;
                        }
                    }
                }
            }

            reply = worker.rx.recv_async() => {
                let Ok(reply) = reply else { break };
                let mut out = serde_json::to_string(&reply)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    let stats: DetectionStats = tokio::task::spawn_blocking(move || worker.join()).await?;
    tracing::info!("{}", stats.summary());
    Ok(())
}

fn parse_line(line: &str, json_input: bool) -> Option<Inbound> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !json_input {
        return Some(Inbound::Check {
            text: line.to_string(),
            now_ms: None,
        });
    }
    match serde_json::from_str(line) {
        Ok(msg) => Some(msg),
        Err(e) => {
            tracing::warn!(error = %e, line, "skipping malformed message");
            None
        }
    }
}
