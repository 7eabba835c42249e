use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use docsplice::doxygen::DoxygenRunner;
use docsplice::{document_dir, document_file, Language, OpenAiClient, RunConfig, RunSummary};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsplice")]
#[command(about = "Automated docstring injection for Python and Java sources", long_about = None)]
#[command(version)]
struct Cli {
    /// File or directory to document
    path: PathBuf,

    /// Source language to document
    #[arg(short, long, default_value = "python")]
    language: Language,

    /// Generation service API key (falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier for the generation service
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    /// Generation service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Run Doxygen over the documented path afterwards
    #[arg(short, long)]
    doxygen: bool,

    /// Show a unified diff of each rewritten file
    #[arg(long)]
    diff: bool,

    /// Output directory for generated Doxygen documentation
    #[arg(long, default_value = "docs")]
    doc_output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let api_key = resolve_api_key(cli.api_key)?;

    let mut config = RunConfig::new(cli.language, api_key);
    config.model = cli.model;
    config.show_diff = cli.diff;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let client = OpenAiClient::new(&config)?;

    println!(
        "{}",
        format!("Documenting {} sources under {}", cli.language, cli.path.display()).dimmed()
    );

    let summary = if cli.path.is_file() {
        let outcome = document_file(&cli.path, &config, &client)?;
        RunSummary {
            files: 1,
            selected: outcome.selected,
            spliced: outcome.spliced,
            failed: 0,
        }
    } else if cli.path.is_dir() {
        document_dir(&cli.path, &config, &client)?
    } else {
        anyhow::bail!(
            "{} {}",
            "The path is not valid, please specify a valid path:".red(),
            cli.path.display()
        );
    };

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} files processed", format!("{}", summary.files).green());
    println!("  {} entities selected", summary.selected);
    println!("  {} entities documented", format!("{}", summary.spliced).green());
    println!("  {} files failed", format!("{}", summary.failed).red());

    if cli.doxygen {
        println!("{}", "Starting Doxygen...".dimmed());
        let runner = DoxygenRunner::new("docsplice", &cli.doc_output);
        runner.generate(&cli.path, &config.ignored_dirs)?;
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Resolve the API credential from the flag or the environment.
fn resolve_api_key(flag: Option<String>) -> Result<String> {
    if let Some(key) = flag {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    if let Ok(key) = env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    anyhow::bail!(
        "{}\n{}\n  {}\n  {}",
        "No generation service API key found.".red(),
        "Try one of:".bold(),
        "1. Pass it explicitly: docsplice <path> --api-key sk-...",
        "2. Set environment variable: export OPENAI_API_KEY=sk-..."
    )
}
