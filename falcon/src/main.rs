use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use falcon::app::Falcon;
use falcon::config::{AppConfig, Overrides};
use falcon::logger;
use falcon::shell;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Task file, relative to the working directory (e.g. data/falcon.txt)
    #[arg(long, short)]
    file: Option<PathBuf>,
    /// Where to write the log
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(Overrides {
        data_file: cli.file,
        log_file: cli.log_file,
        log_level: cli.log_level,
    })?;
    if let Err(err) = logger::init(&config) {
        eprintln!("Warning: logging disabled: {err:#}");
    }

    let mut app = Falcon::new(&config)?;
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    let mut stdout = io::stdout();
    shell::run(&mut app, &mut stdin_lock, &mut stdout)
}
