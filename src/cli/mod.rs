mod context;
mod errors;
pub mod output;
mod shell;

pub use context::{CliMode, ShellContext};
pub use errors::CliError;
pub use shell::run_cli;
