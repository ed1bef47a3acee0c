//! InsightAI CLI - structured document summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{Parser, Subcommand};
use colored::Colorize;
use insightai::agent::Provider;
use insightai::prompt::truncate_chars;
use insightai::server::{self, AppState};
use insightai::{extract, pipeline, Config, Summary, SummaryRequest, SummaryResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "insightai")]
#[command(author, version, about = "HTTP service for structured document summarisation", long_about = None)]
struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on, overriding the config
        #[arg(long)]
        bind: Option<String>,
    },
    /// Extract plain text from a local file
    Extract {
        /// PDF or text file
        file: PathBuf,
        /// Print the whole text instead of a preview
        #[arg(long)]
        full: bool,
    },
    /// Summarise a local file
    Summarize {
        /// PDF or text file
        file: PathBuf,
        /// Topic to cover (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
        /// Model identifier, overriding the config
        #[arg(long)]
        model: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("insightai=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            server::serve(AppState::new(config)?).await?;
        }
        Commands::Extract { file, full } => {
            let bytes = std::fs::read(&file)?;
            let extracted = extract::extract_blocking(bytes, file_name(&file)).await?;

            if full {
                println!("{}", extracted.text);
            } else {
                println!(
                    "{}",
                    truncate_chars(&extracted.text, config.server.preview_chars)
                );
            }
            println!("\n--- Extracted {} characters ---", extracted.char_count);
        }
        Commands::Summarize {
            file,
            topics,
            model,
            json,
        } => {
            let provider = Provider::from_config(&config)?;
            if provider.is_dry_run() {
                eprintln!("{}", "OPENAI_API_KEY not set: showing placeholder output".yellow());
            }

            let bytes = std::fs::read(&file)?;
            let request = SummaryRequest {
                topics: Some(topics),
                model,
                ..SummaryRequest::default()
            };
            let result = pipeline::summarize_document(
                &provider,
                bytes,
                file_name(&file),
                request,
                &config.agent.model,
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_result(result: &SummaryResult) {
    if let Some(raw) = result.raw_text() {
        println!("{raw}");
        return;
    }
    match result.to_summary() {
        Some(summary) => print_summary(&summary),
        // Model ignored the schema; show whatever came back
        None => println!("{}", serde_json::to_string_pretty(result).unwrap_or_default()),
    }
}

fn print_summary(summary: &Summary) {
    println!("{}", "💡 Executive Summary:".bold());
    println!("  {}\n", summary.executive_summary);

    print_list("📌 Insights:", &summary.insights);
    print_list("⚖️  Decisions:", &summary.decisions);

    if !summary.actions.is_empty() {
        println!("{}", "✅ Actions:".bold());
        for (i, action) in summary.actions.iter().enumerate() {
            let mut line = format!("  {}. {}", i + 1, action.title);
            if let Some(owner) = &action.owner {
                line.push_str(&format!(" ({})", owner.cyan()));
            }
            if let Some(due) = &action.due {
                line.push_str(&format!(" due {}", due.yellow()));
            }
            println!("{line}");
        }
        println!();
    }

    print_list("⚠️  Risks:", &summary.risks);
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", heading.bold());
    for item in items {
        println!("  • {}", item);
    }
    println!();
}
