use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use reviewguard::config::resolve_config_path;
use reviewguard::prelude::*;

/// Screen academic supervisor reviews for profanity and spam.
#[derive(Parser)]
#[command(name = "reviewguard", version, about)]
struct Cli {
    /// Configuration file (YAML, TOML or JSON). Defaults to $REVIEWGUARD_CONFIG
    /// or config/moderation.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate a text and print the verdict
    Check {
        text: String,
    },

    /// Run the full submission flow on a review
    Screen {
        /// Review text to screen
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        text: Option<String>,

        /// Screen each line read from standard input
        #[arg(long)]
        stdin: bool,
    },

    /// Show where the lexicon was loaded from
    Lexicon,

    /// Print the effective configuration as YAML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    info!("Starting reviewguard v{}", reviewguard::VERSION);

    let config_path = resolve_config_path(cli.config);
    let config = ModerationConfig::load_or_default(&config_path).await;

    if let Commands::Config = cli.command {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let engine = Arc::new(
        ModerationEngine::from_config(&config)
            .await
            .context("Failed to build moderation engine")?,
    );

    match cli.command {
        Commands::Check { text } => {
            let verdict = engine.moderate(&text);
            let report = serde_json::json!({
                "verdict": verdict,
                "academicContext": engine.is_academic_context(&text),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Screen { text, stdin } => {
            let screener = ReviewScreener::new(Arc::clone(&engine), config.submission.clone());

            if stdin {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                loop {
                    let outcome = match lines.next_line().await {
                        Ok(Some(line)) => screener.screen(&line),
                        Ok(None) => break,
                        Err(e) => {
                            error!("Failed to read review from stdin: {}", e);
                            let outcome = ScreeningOutcome::error(format!("Failed to read input: {}", e));
                            println!("{}", serde_json::to_string(&outcome)?);
                            break;
                        }
                    };
                    println!("{}", serde_json::to_string(&outcome)?);
                }
            } else if let Some(text) = text {
                let outcome = screener.screen(&text);
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
        }

        Commands::Lexicon => {
            let lexicon = engine.lexicon();
            println!("Lexicon source: {}", lexicon.source());
            println!("Words: {}", lexicon.len());
        }

        Commands::Config => {}
    }

    Ok(())
}
