//! JQL CLI
//!
//! A thin wrapper around the jql-shell library.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use jql_shell::loader::is_json_file;
use jql_shell::{JsonFileLoader, OutputFormat, Session};

#[derive(Parser)]
#[command(name = "jql")]
#[command(about = "Query JSON files with a tiny SQL-like language")]
#[command(after_help = "\
EXAMPLES:
    # Start a shell with two tables preloaded as 'people' and 'orders'
    jql ./data/people.json ./data/orders.json

    # Run statements and exit
    jql -c 'load \"people.json\" as p; select name, age from p;'

    # Print outcomes as JSON documents
    jql --format json -c 'load \"people.json\"; tables;'
")]
struct Args {
    /// JSON files to load before reading commands
    files: Vec<PathBuf>,

    /// Log tokens and parsed statements
    #[arg(long)]
    debug: bool,

    /// How outcomes are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Execute these statements and exit instead of starting the shell
    #[arg(short = 'c', long)]
    command: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut session = Session::new(JsonFileLoader::new(), args.format);
    for file in &args.files {
        if !is_json_file(file) {
            log::warn!("{} does not have a .json extension", file.display());
        }
        let path = file
            .to_str()
            .with_context(|| format!("path is not valid UTF-8: {}", file.display()))?;
        session
            .preload(path)
            .with_context(|| format!("failed to preload {}", file.display()))?;
    }

    let mut stdout = io::stdout().lock();
    if let Some(command) = args.command {
        let failed = session.execute(&command, &mut stdout)?;
        if failed > 0 {
            anyhow::bail!("{failed} statement(s) failed");
        }
        return Ok(());
    }

    session.repl(io::stdin().lock(), &mut stdout)?;
    Ok(())
}
