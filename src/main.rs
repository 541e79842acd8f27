//! fencebox - sandboxed file operations confined to a single root.
//!
//! Usage:
//!   fencebox --root DIR read PATH        Print a file's contents
//!   fencebox --root DIR write PATH TEXT  Write a file, creating parents
//!   fencebox --root DIR delete PATH      Delete a single file
//!   fencebox --root DIR analyze PATH     Recursive folder summary
//!
//! The sandbox root may also come from the FENCEBOX_ROOT environment
//! variable. Every PATH is relative to the root; anything resolving
//! outside it is rejected.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result};

use fencebox_analyze::{AnalyzeConfig, DEFAULT_LISTING_CAP};
use fencebox_core::{LogLevel, SandboxConfig, DEFAULT_MAX_FILE_SIZE};
use fencebox_ops::{Executor, FolderRequest, OperationEvent, OperationReply};

#[derive(Parser)]
#[command(
    name = "fencebox",
    version,
    about = "Sandboxed file operations confined to a single root directory",
    long_about = "fencebox confines every file operation to one root directory.\n\n\
                  Paths are relative to the root; traversal and symlink escapes \
                  are rejected before anything touches the filesystem."
)]
struct Cli {
    /// Sandbox root directory (created if absent; defaults to $FENCEBOX_ROOT)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Maximum file size a read will return, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Show progress ticks on stderr
    #[arg(short, long)]
    progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a file inside the sandbox
    Read {
        /// Path relative to the sandbox root
        path: String,
    },

    /// Write content to a file inside the sandbox
    Write {
        /// Path relative to the sandbox root
        path: String,

        /// Content to write (required, non-empty)
        content: String,
    },

    /// Delete a single file inside the sandbox
    Delete {
        /// Path relative to the sandbox root
        path: String,
    },

    /// Recursively analyze a folder inside the sandbox
    Analyze {
        /// Path relative to the sandbox root
        path: String,

        /// Maximum number of entries in the listing (totals are never capped)
        #[arg(short = 'n', long, default_value_t = DEFAULT_LISTING_CAP)]
        cap: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let root = cli
        .root
        .or_else(|| std::env::var_os("FENCEBOX_ROOT").map(PathBuf::from))
        .ok_or_else(|| eyre!("no sandbox root: pass --root or set FENCEBOX_ROOT"))?;

    let config = Arc::new(SandboxConfig::open(root, cli.max_file_size)?);
    let mut executor = Executor::new(config);

    let request = match cli.command {
        Command::Read { path } => FolderRequest::read(path),
        Command::Write { path, content } => FolderRequest::write(path, content),
        Command::Delete { path } => FolderRequest::delete(path),
        Command::Analyze { path, cap } => {
            let analyze = AnalyzeConfig::builder().listing_cap(cap).build()?;
            executor = executor.with_analyze_config(analyze);
            FolderRequest::analysis(path)
        }
    };

    let mut rx = executor.dispatch(request);
    while let Some(event) = rx.recv().await {
        match event {
            OperationEvent::Progress { current, total } => {
                if cli.progress {
                    eprintln!("  [{current}/{total}]");
                }
            }
            OperationEvent::Log { level, message } => {
                if cli.progress || level != LogLevel::Info {
                    eprintln!("{level}: {message}");
                }
            }
            OperationEvent::Complete(Ok(reply)) => {
                print_reply(&reply, cli.format)?;
            }
            OperationEvent::Complete(Err(failure)) => {
                if matches!(cli.format, OutputFormat::Json) {
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                }
                return Err(eyre!("{failure}"));
            }
        }
    }

    Ok(())
}

/// Print a successful reply in the chosen format.
fn print_reply(reply: &OperationReply, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reply)?);
        }
        OutputFormat::Text => match reply {
            OperationReply::FileRead { content, .. } => {
                print!("{content}");
            }
            OperationReply::FileWritten { path, message }
            | OperationReply::FileDeleted { path, message } => {
                println!("{message}: {path}");
            }
            OperationReply::FolderAnalysis { path, analysis } => {
                println!("{}", "─".repeat(60));
                println!(" {path} - {}", format_size(analysis.total_size));
                println!(" {} files", analysis.file_count);
                println!("{}", "─".repeat(60));

                for file in &analysis.files {
                    println!(
                        " {:<40} {:>10}  {}",
                        truncate(&file.name, 40),
                        format_size(file.size),
                        file.modified.format("%Y-%m-%d %H:%M")
                    );
                }

                if analysis.truncated {
                    println!(
                        " ... listing capped at {} of {} files",
                        analysis.files.len(),
                        analysis.file_count
                    );
                }
            }
        },
    }
    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 1).collect();
        format!("{cut}…")
    }
}
