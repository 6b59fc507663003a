//! TxKV CLI
//!
//! Command-line driver for the TxKV transactional store.
//!
//! # Commands
//!
//! - `exec` - Execute a transaction script (BEGIN/PUT/GET/COMMIT/ROLLBACK)
//! - `version` - Show version information

mod commands;
mod error;
mod script;

use clap::{Parser, Subcommand};
use commands::exec::OutputFormat;
use error::CliError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// TxKV transactional key-value store tools.
#[derive(Parser)]
#[command(name = "txkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a transaction script against a fresh in-memory store
    Exec {
        /// Script file to run (reads stdin if omitted)
        script: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Stop at the first rejected command and exit with an error
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so script output stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Exec {
            script,
            format,
            fail_fast,
        } => {
            commands::exec::run(script.as_deref(), format, fail_fast)?;
        }
        Commands::Version => {
            println!("TxKV CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("TxKV Core v{}", txkv_core::VERSION);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_exec_arguments() {
        let cli = Cli::try_parse_from(["txkv", "-v", "exec", "demo.txkv", "--format", "json"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Exec {
                script,
                format,
                fail_fast,
            } => {
                assert_eq!(script, Some(PathBuf::from("demo.txkv")));
                assert_eq!(format, OutputFormat::Json);
                assert!(!fail_fast);
            }
            Commands::Version => panic!("expected exec"),
        }
    }

    #[test]
    fn exec_defaults_to_stdin_and_text() {
        let cli = Cli::try_parse_from(["txkv", "exec", "--fail-fast"]).unwrap();
        match cli.command {
            Commands::Exec {
                script,
                format,
                fail_fast,
            } => {
                assert!(script.is_none());
                assert_eq!(format, OutputFormat::Text);
                assert!(fail_fast);
            }
            Commands::Version => panic!("expected exec"),
        }
    }

    #[test]
    fn parse_error_renders_line_and_message() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BEGIN\nPUT A").unwrap();

        let err = run(Commands::Exec {
            script: Some(file.path().to_path_buf()),
            format: OutputFormat::Text,
            fail_fast: false,
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "line 2: PUT requires a key and a value");
    }

    #[test]
    fn fail_fast_error_renders_store_message() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BEGIN\nCOMMIT\nCOMMIT").unwrap();

        let err = run(Commands::Exec {
            script: Some(file.path().to_path_buf()),
            format: OutputFormat::Text,
            fail_fast: true,
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "line 3: no active transaction to commit");
    }
}
