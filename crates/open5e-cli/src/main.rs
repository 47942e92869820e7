mod cli;
mod commands;
mod observability;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use open5e_client::{ClientConfig, FileStore, Open5eApi, SourceSelection, Sources};

use cli::{Cli, Commands};
use output::{CliSignal, print_error};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = &cli.api_url {
        config.api.url = url.clone();
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid --api-url: {e}"))?;
    }
    observability::init_tracing_with_level(&config.logging.level);

    let store = FileStore::new(config.store_path()?);
    let mut selection = SourceSelection::load(store, &config.default_sources())?;

    // Subcommands that never reach the API.
    match &cli.command {
        Commands::Sources(args) => return commands::sources::run(&mut selection, &args.command),
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                return output::print_record(&config, format);
            }
        },
        _ => {}
    }

    let sources = match &cli.sources {
        Some(slugs) => Sources::new(slugs.clone()),
        None => selection.current().clone(),
    };
    tracing::debug!(api = %config.api.url, sources = %sources, "resolved request context");

    let api = Open5eApi::from_config(&config)?.with_signal(Arc::new(CliSignal));

    match &cli.command {
        Commands::Monsters(args) => commands::monsters::list(&api, &sources, args, format).await?,
        Commands::Monster(args) => commands::monsters::show(&api, &args.slug, format).await?,
        Commands::Spells(args) => commands::spells::list(&api, &sources, args, format).await?,
        Commands::Spell(args) => commands::spells::show(&api, &args.slug, format).await?,
        Commands::MagicItems(args) => commands::items::list(&api, &sources, args, format).await?,
        Commands::MagicItem(args) => commands::items::show(&api, &args.slug, format).await?,
        Commands::Backgrounds(args) => {
            commands::reference::backgrounds(&api, &sources, args, format).await?
        }
        Commands::Background(args) => {
            commands::reference::background(&api, &args.slug, format).await?
        }
        Commands::Classes(args) => commands::classes::list(&api, &sources, args, format).await?,
        Commands::Class(args) => commands::classes::show(&api, &args.slug, format).await?,
        Commands::Archetype(args) => {
            commands::classes::archetype(&api, &args.class, &args.slug, format).await?
        }
        Commands::Sections(args) => {
            commands::reference::sections(&api, &sources, args, format).await?
        }
        Commands::Section(args) => commands::reference::section(&api, &args.slug, format).await?,
        Commands::Documents(args) => commands::reference::documents(&api, args, format).await?,
        Commands::Document(args) => {
            commands::reference::document(&api, &args.slug, format).await?
        }
        Commands::Search(args) => {
            commands::reference::search(&api, &sources, &args.text, format).await?
        }
        Commands::Sources(_) | Commands::Config(_) => {}
    }

    let stats = api.cache().stats();
    tracing::debug!(entries = stats.entries, hits = stats.hits, misses = stats.misses, "cache stats");
    Ok(())
}
