use anyhow::{Context as _, Result};
use blogmatter::BlogMatterError;
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use std::path::PathBuf;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands::{self, Context};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        let code = e
            .downcast_ref::<BlogMatterError>()
            .map(|err| err.kind().exit_code())
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let ctx = Context::load(cwd, home.as_deref(), cli.config.as_deref(), cli.quiet)?;

    match cli.command {
        Commands::Draft(args) => commands::draft_command(&ctx, args)?,
        Commands::New(args) => commands::new_command(&ctx, args)?,
        Commands::Pub(args) => commands::pub_command(&ctx, args)?,
        Commands::Gen(args) => commands::gen_command(&ctx, args)?,
        Commands::List(args) => commands::list_command(&ctx, args)?,
        Commands::Tags => commands::tags_command(&ctx)?,
    }
    Ok(())
}
