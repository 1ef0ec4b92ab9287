use std::io;

use crate::errors::InsightError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] InsightError),
    #[error("Invalid amount: `{0}` is not a whole number")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("No snapshot loaded. Use `load <path>`, `open <name>` or `new` first.")]
    NoSnapshot,
    #[error("No active user. Use `user <id>` or `user new` first.")]
    NoUser,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
