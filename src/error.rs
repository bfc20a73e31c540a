//! Error taxonomy for a single CLI run.
//!
//! Every variant is terminal: the process reports it and exits with status 1.
//! Nothing is retried.

use std::io::{self, Write};

use thiserror::Error;

use crate::cmd::command::{USAGE, WwdcCommand};

#[derive(Debug, Error)]
pub enum CliError {
    /// A required positional argument is missing. Carries the literal usage line.
    #[error("{0}")]
    Usage(&'static str),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown wwdc subcommand: {0}\nAvailable: {available}", available = WwdcCommand::names().join(", "))]
    UnknownWwdcSubcommand(String),

    #[error("Invalid target '{target}': {source:#}")]
    InvalidTarget {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    /// The documentation server could not be started or initialized.
    #[error(
        "Documentation server unavailable. Check --target / APPLE_DOCS_TARGET (default needs `npx`).\nDetail: {0:#}"
    )]
    Load(#[source] anyhow::Error),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The tool ran and flagged its own result as an error; carries the joined content.
    #[error("{0}")]
    ToolFailed(String),

    /// The call itself failed (transport / protocol).
    #[error("Error: {0}")]
    Invocation(String),

    #[error("Fatal: {0:#}")]
    Fatal(#[source] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Write the error the way the CLI presents it. Only an unknown command
    /// also prints the usage block, and that goes to `out`.
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        writeln!(err, "{self}")?;
        if matches!(self, CliError::UnknownCommand(_)) {
            writeln!(out, "{USAGE}")?;
        }
        Ok(())
    }
}
