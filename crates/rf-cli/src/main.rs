use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rf_cli::commands::{fetch, find, locations};
use rf_cli::{Cli, Commands, Config, loader};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Find(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let zone = config.zone()?;
            let at = args.instant(zone)?;
            let catalog = loader::open_catalog(&config, &args.load, zone)?;
            find::run(&mut stdout, &catalog, args, &at)?;
        }
        Some(Commands::Fetch(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let zone = config.zone()?;
            let catalog = loader::load_reference(&config)?;
            let results = loader::fetch_feeds(
                config.feed_source(args.load.reload()),
                &catalog.schedule_ids(),
                args.load.threads(&config),
            )?;
            fetch::run(&mut stdout, &results, zone)?;
        }
        Some(Commands::Locations { json }) => {
            let config = load_config(cli.config.as_deref())?;
            let catalog = loader::load_reference(&config)?;
            locations::run(&mut stdout, catalog.locations(), *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
