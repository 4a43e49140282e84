//! FactGraph - AI summarizer and knowledge verification client
//!
//! Entry point: the interactive terminal interface plus one-shot commands.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use factgraph_core::{
    summary::plain_lines,
    tui::{EventLoop, FactGraphApp, TerminalConfig, TerminalManager},
    AnalysisSession, FactGraphConfig, HttpAnalysisClient, NoticeLevel,
};
use std::fs::{File, OpenOptions};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "factgraph")]
#[command(about = "AI summarizer and knowledge verification client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Analysis endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal interface
    Tui,

    /// Analyze one document and print the result
    Analyze {
        /// Text to analyze (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));

    init_logging(&cli.log_level, interactive);
    debug!("factgraph v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().unwrap_or_else(FactGraphConfig::default_path);

    if let Some(Commands::Config { action }) = &cli.command {
        return run_config(action, &config_path, &cli);
    }

    let config = load_config(&config_path, &cli)?;

    let result = match cli.command {
        None | Some(Commands::Tui) => run_tui(&config).await,
        Some(Commands::Analyze { text, file, json }) => {
            let text = read_source(text, file)?;
            run_analyze(&config, text, json).await
        }
        Some(Commands::Config { .. }) => Ok(()),
    };

    if let Err(err) = &result {
        error!("{:#}", err);
    }
    result
}

/// TUI logs go to a file so the screen stays intact
fn init_logging(level: &str, interactive: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("factgraph={0},factgraph_core={0}", level)));

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    match open_log_file() {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

fn open_log_file() -> Option<File> {
    let data_dir = directories::ProjectDirs::from("", "", "factgraph")
        .map(|dirs| dirs.data_dir().to_path_buf());

    data_dir
        .into_iter()
        .chain(std::iter::once(std::env::temp_dir()))
        .find_map(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("factgraph.log"))
                .ok()
        })
}

/// File, then environment, then command line
fn load_config(path: &PathBuf, cli: &Cli) -> Result<FactGraphConfig> {
    let mut config = FactGraphConfig::load(path)?;
    config.apply_env_overrides()?;

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }

    config.validate()?;
    debug!("Endpoint: {}", config.endpoint);
    Ok(config)
}

fn run_config(action: &ConfigAction, path: &PathBuf, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(path, cli)?;
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            FactGraphConfig::default().save(path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
    }
    Ok(())
}

fn read_source(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No text given: pass TEXT, --file, or pipe the document on stdin");
    }
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn session_for(config: &FactGraphConfig) -> Result<AnalysisSession> {
    let client = Arc::new(HttpAnalysisClient::from_config(config)?);
    Ok(AnalysisSession::new(
        client,
        config.input.clone(),
        config.request_timeout(),
    ))
}

async fn run_tui(config: &FactGraphConfig) -> Result<()> {
    let session = session_for(config)?;
    let app = FactGraphApp::new(session, config);
    let event_loop = EventLoop::new(config.tui.tick_rate_ms);

    let mut terminal = TerminalManager::new(TerminalConfig::default())?;
    app.run(&mut terminal, &event_loop).await?;

    debug!("TUI exiting");
    Ok(())
}

async fn run_analyze(config: &FactGraphConfig, text: String, json: bool) -> Result<()> {
    let mut session = session_for(config)?;
    session.set_input(text);

    let submitted = session.submit();
    if submitted.is_some() {
        session.settle().await;
    }

    let mut failed = false;
    for notice in session.state_mut().take_notices() {
        match notice.level {
            NoticeLevel::Error => {
                failed = true;
                eprintln!("✗ {}", notice.message);
            }
            NoticeLevel::Warning => eprintln!("⚠ {}", notice.message),
            NoticeLevel::Info => eprintln!("ℹ {}", notice.message),
        }
    }

    let Some(result) = session.state().result() else {
        if submitted.is_none() || failed {
            bail!("Analysis failed");
        }
        bail!("Analysis produced no result");
    };

    info!(
        "Received {} sentences for request {}",
        result.summary.len(),
        submitted.map(|seq| seq.to_string()).unwrap_or_default()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for line in plain_lines(&result.summary) {
        println!("{}", line);
    }

    println!();
    match &result.graph_data {
        Some(graph) => {
            println!(
                "Graph: {} nodes, {} links",
                graph.nodes.len(),
                graph.links.len()
            );
            let groups = graph.groups();
            if !groups.is_empty() {
                println!("Groups: {}", groups.join(", "));
            }
        }
        None => println!("Graph: none"),
    }

    Ok(())
}
