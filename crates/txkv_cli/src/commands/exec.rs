//! Exec command implementation.

use crate::error::CliError;
use crate::script::{self, Command, Statement};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info};
use txkv_core::{StatsSnapshot, StoreResult, TransactionalStore};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per command.
    Text,
    /// One JSON object per command.
    Json,
}

/// Result of one executed command.
#[derive(Debug, Serialize)]
pub struct Outcome {
    /// Script line number.
    pub line: usize,
    /// Command verb.
    pub command: &'static str,
    /// Whether the store accepted the command.
    pub ok: bool,
    /// Value returned by `GET` (`null` when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Option<String>>,
    /// Error message for a rejected command, unchanged from the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Counters printed by `STATS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsSnapshot>,
}

/// What an accepted command produced.
#[derive(Debug, Default)]
struct Applied {
    value: Option<Option<String>>,
    stats: Option<StatsSnapshot>,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecSummary {
    /// Commands executed.
    pub executed: usize,
    /// Commands rejected by the store.
    pub failed: usize,
}

/// Runs the exec command: reads a script from `path` or stdin and executes it.
pub fn run(
    path: Option<&Path>,
    format: OutputFormat,
    fail_fast: bool,
) -> Result<(), CliError> {
    let source = match path {
        Some(path) => {
            info!("Executing script {:?}", path);
            load_script(path)?
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = execute(&source, &mut out, format, fail_fast)?;
    info!(
        executed = summary.executed,
        failed = summary.failed,
        "Script finished"
    );
    Ok(())
}

/// Reads a script file.
pub fn load_script(path: &Path) -> Result<String, CliError> {
    Ok(fs::read_to_string(path)?)
}

/// Parses and executes `source` against a fresh store, writing results to `out`.
///
/// Nothing runs if the script fails to parse. Rejected commands are reported
/// and execution continues, unless `fail_fast` is set.
pub fn execute(
    source: &str,
    out: &mut impl Write,
    format: OutputFormat,
    fail_fast: bool,
) -> Result<ExecSummary, CliError> {
    let statements = script::parse(source)?;
    debug!(commands = statements.len(), "Parsed script");

    let mut store: TransactionalStore<String, String> = TransactionalStore::new();
    let mut summary = ExecSummary::default();

    for Statement { line, command } in statements {
        let result = apply(&mut store, &command);
        summary.executed += 1;

        let outcome = match &result {
            Ok(applied) => Outcome {
                line,
                command: command.verb(),
                ok: true,
                value: applied.value.clone(),
                error: None,
                stats: applied.stats.clone(),
            },
            Err(err) => Outcome {
                line,
                command: command.verb(),
                ok: false,
                value: None,
                error: Some(err.to_string()),
                stats: None,
            },
        };
        write_outcome(out, &outcome, format)?;

        if let Err(err) = result {
            summary.failed += 1;
            if fail_fast {
                out.flush()?;
                return Err(CliError::Store { line, source: err });
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

fn apply(store: &mut TransactionalStore<String, String>, command: &Command) -> StoreResult<Applied> {
    let mut applied = Applied::default();
    match command {
        Command::Begin => store.begin()?,
        Command::Put { key, value } => store.put(key.clone(), value.clone())?,
        Command::Get { key } => applied.value = Some(store.get(key.as_str()).cloned()),
        Command::Commit => store.commit()?,
        Command::Rollback => store.rollback()?,
        Command::Stats => applied.stats = Some(store.stats().snapshot()),
    }
    Ok(applied)
}

fn write_outcome(
    out: &mut impl Write,
    outcome: &Outcome,
    format: OutputFormat,
) -> Result<(), CliError> {
    if format == OutputFormat::Json {
        serde_json::to_writer(&mut *out, outcome)?;
        writeln!(out)?;
        return Ok(());
    }

    if let Some(err) = &outcome.error {
        writeln!(out, "ERROR: {err}")?;
    } else if let Some(value) = &outcome.value {
        writeln!(out, "{}", value.as_deref().unwrap_or("NULL"))?;
    } else if let Some(stats) = &outcome.stats {
        writeln!(
            out,
            "reads={} writes={} started={} committed={} rolled_back={} keys_committed={} rejected={}",
            stats.reads,
            stats.writes,
            stats.transactions_started,
            stats.transactions_committed,
            stats.transactions_rolled_back,
            stats.keys_committed,
            stats.rejected
        )?;
    } else {
        writeln!(out, "OK")?;
    }
    Ok(())
}
