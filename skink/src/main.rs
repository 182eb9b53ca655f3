//! Skink runtime shell CLI

use clap::Parser;
use std::path::{Path, PathBuf};

use skink::repl::{Session, Shell};
use skink::runtime::Runtime;

#[derive(Parser)]
#[command(name = "skink", version, about = "Skink runtime shell")]
struct Cli {
    /// Script of shell commands to run instead of starting the REPL
    script: Option<PathBuf>,

    /// Cell budget for the list store
    #[arg(long)]
    cells: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let runtime = match cli.cells {
        Some(cells) => Runtime::with_cell_limit(cells),
        None => Runtime::new(),
    };

    let result = match cli.script {
        Some(path) => run_script(&path, runtime),
        None => run_shell(runtime),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_script(path: &Path, runtime: Runtime) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let mut session = Session::new(runtime);
    session.run_source(&source)?;
    Ok(())
}

fn run_shell(runtime: Runtime) -> Result<(), Box<dyn std::error::Error>> {
    let mut shell = Shell::new(runtime)?;
    shell.run()?;
    Ok(())
}
