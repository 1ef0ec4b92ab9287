use std::path::PathBuf;

use budget_insight::{cli::run_cli, init};

fn main() {
    init();

    let snapshot = std::env::args_os().nth(1).map(PathBuf::from);
    if let Err(err) = run_cli(snapshot.as_deref()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
