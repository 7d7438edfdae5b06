use anyhow::{Context, Result, bail};
use caretpad_core::HistoryConfig;
use caretpad_session::{Frame, SessionCmd};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

use crate::script::{self, Step};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Command script to run, `-` for stdin
    #[arg(value_name = "SCRIPT", default_value = "-")]
    pub script: PathBuf,

    /// File holding the initial document text
    #[arg(long, value_name = "FILE", env = "CARETPAD_TEXT")]
    pub text: Option<PathBuf>,

    /// Maximum number of snapshots kept for undo and for redo
    #[arg(long, value_name = "N", env = "CARETPAD_CAPACITY", default_value_t = 20)]
    pub capacity: usize,

    /// Minimum spacing between two undo snapshots, in milliseconds
    #[arg(
        long,
        value_name = "MS",
        env = "CARETPAD_DEBOUNCE_MS",
        default_value_t = 5000
    )]
    pub debounce_ms: u64,

    /// Reset the undo history when undo finds it full
    #[arg(long)]
    pub reset_full_undo: bool,

    /// Print the final frame as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn history_config(&self) -> Result<HistoryConfig> {
        if self.capacity == 0 {
            bail!("--capacity must be at least 1");
        }
        Ok(HistoryConfig {
            capacity: self.capacity,
            debounce: Duration::from_millis(self.debounce_ms),
            reset_full_undo: self.reset_full_undo,
        })
    }
}

pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging();
    let frame = run_with_args(&args).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        println!("{}", frame.text);
    }
    Ok(())
}

async fn run_with_args(args: &Args) -> Result<Frame> {
    let config = args.history_config()?;
    let source = read_source(&args.script).await?;
    let lines = script::parse(&source)?;
    let text = match &args.text {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => String::new(),
    };
    tracing::info!(steps = lines.len(), capacity = config.capacity, "running script");
    execute(&text, config, lines).await
}

/// Run parsed script lines against a fresh session and return the final
/// frame.
async fn execute(text: &str, config: HistoryConfig, lines: Vec<script::Line>) -> Result<Frame> {
    let mut handle = caretpad_session::open(text, config);
    for line in lines {
        let cmd = match line.step {
            Step::Cmd(cmd) => cmd,
            Step::Print => SessionCmd::RequestFrame,
        };
        let print = matches!(cmd, SessionCmd::RequestFrame);
        let frame = handle
            .request(cmd)
            .await
            .context("session stopped unexpectedly")?;
        if let Some(status) = &frame.status {
            tracing::warn!(line = line.number, "{status}");
        }
        if print {
            println!("{}", frame.text);
        }
    }
    handle
        .request(SessionCmd::RequestFrame)
        .await
        .context("session stopped unexpectedly")
}

async fn read_source(path: &Path) -> Result<String> {
    let mut source = String::new();
    if path == Path::new("-") {
        tokio::io::stdin()
            .read_to_string(&mut source)
            .await
            .context("reading script from stdin")?;
    } else {
        source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
    }
    Ok(source)
}
