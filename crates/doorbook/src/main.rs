//! `doorbook` - CLI for the building directory
//!
//! This binary opens the on-device store and runs one command against it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use tracing::warn;

use doorbook::building::format_timestamp;
use doorbook::cli::{Cli, Command, ConfigCommand, OutputFormat};
use doorbook::{
    init_logging, BuildingDraft, BuildingRecord, Config, Error, RecordStore, SqliteKv,
    SystemClock,
};

type Store = RecordStore<SqliteKv>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => run_store_command(&config, command),
    }
}

fn run_store_command(config: &Config, command: Command) -> anyhow::Result<()> {
    // Import and clear overwrite the slot, so they may start from a corrupt one
    let tolerate_corrupt = matches!(command, Command::Import(_) | Command::Clear(_));
    let mut store = open_store(config, tolerate_corrupt)?;

    match command {
        Command::Add(cmd) => {
            let draft = cmd.fields.overlay(BuildingDraft::new(cmd.name));
            let record = store.add(draft)?;
            print_record(&record, cmd.format)?;
        }
        Command::Show(cmd) => {
            let record = if cmd.no_touch {
                store
                    .get_by_id(&cmd.id)
                    .cloned()
                    .ok_or_else(|| Error::not_found(&cmd.id))?
            } else {
                store.touch(&cmd.id)?
            };
            print_record(&record, cmd.format)?;
        }
        Command::Edit(cmd) => {
            let mut edited = store
                .get_by_id(&cmd.id)
                .cloned()
                .ok_or_else(|| Error::not_found(&cmd.id))?;
            let mut draft = edited.draft();
            if let Some(name) = cmd.name {
                draft.name = name;
            }
            edited.apply(cmd.fields.overlay(draft));
            let record = store.update(&edited)?;
            print_record(&record, OutputFormat::Plain)?;
        }
        Command::Delete(cmd) => {
            if store.delete(&cmd.id)? {
                println!("Deleted {}", cmd.id);
            } else {
                println!("No building with id {}", cmd.id);
            }
        }
        Command::List(cmd) => print_records(store.records(), cmd.format)?,
        Command::Recent(cmd) => {
            let limit = cmd.limit.unwrap_or(config.views.recent_limit);
            print_records(&store.recent(limit), cmd.format)?;
        }
        Command::Search(cmd) => print_records(&store.search(&cmd.query), cmd.format)?,
        Command::Export(cmd) => handle_export(&store, config, cmd.stdout, cmd.dir)?,
        Command::Import(cmd) => {
            if !cmd.yes {
                println!(
                    "This will replace all {} stored buildings with the contents of {}.",
                    store.len(),
                    cmd.file.display()
                );
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let count = store
                .import_from_file(&cmd.file)
                .with_context(|| format!("failed to import {}", cmd.file.display()))?;
            println!("Imported {count} buildings.");
        }
        Command::Clear(cmd) => {
            if !cmd.yes {
                println!("This will delete all {} stored buildings.", store.len());
                println!("Use --yes to confirm.");
                return Ok(());
            }
            store.clear_all()?;
            println!("All buildings deleted.");
        }
        Command::Stats(cmd) => handle_stats(&store, cmd.json)?,
        Command::Config(config_cmd) => handle_config(config, config_cmd)?,
    }

    Ok(())
}

fn open_store(config: &Config, tolerate_corrupt: bool) -> anyhow::Result<Store> {
    let path = config.database_path();
    let kv = SqliteKv::open(&path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;
    let mut store = RecordStore::new(kv, Arc::new(SystemClock));

    match store.load() {
        Ok(_) => Ok(store),
        Err(err @ Error::CorruptState { .. }) if tolerate_corrupt => {
            warn!("Starting from an empty set: {}", err);
            Ok(store)
        }
        Err(err @ Error::CorruptState { .. }) => Err(anyhow::Error::new(err).context(
            "stored buildings are unreadable; restore with `doorbook import` or reset with `doorbook clear --yes`",
        )),
        Err(err) => Err(err.into()),
    }
}

fn handle_export(
    store: &Store,
    config: &Config,
    stdout: bool,
    dir: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    if stdout {
        println!("{}", store.export_all()?);
        return Ok(());
    }

    let dir = dir.unwrap_or_else(|| config.export_dir());
    match store.export_to_dir(&dir, &config.export.file_prefix, Utc::now().date_naive()) {
        Ok(path) => {
            println!("Exported {} buildings to {}", store.len(), path.display());
            Ok(())
        }
        Err(Error::NothingToExport) => bail!("there are no buildings to export"),
        Err(err) => Err(err.into()),
    }
}

fn handle_stats(store: &Store, json: bool) -> anyhow::Result<()> {
    let stats = store.stats();
    let stamp = |value: Option<chrono::DateTime<Utc>>| value.map(|t| format_timestamp(&t));

    if json {
        let status = serde_json::json!({
            "total_buildings": stats.total_buildings,
            "oldest_created": stamp(stats.oldest_created),
            "newest_created": stamp(stats.newest_created),
            "last_viewed": stamp(stats.last_viewed),
            "database_path": store.backend().path(),
            "database_size_bytes": store.backend().size_bytes(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
        println!("doorbook stats");
        println!("--------------");
        println!("Buildings:     {}", stats.total_buildings);
        println!("Oldest:        {}", or_dash(stamp(stats.oldest_created)));
        println!("Newest:        {}", or_dash(stamp(stats.newest_created)));
        println!("Last viewed:   {}", or_dash(stamp(stats.last_viewed)));
        println!("Database:      {}", store.backend().path().display());
        println!("Size (bytes):  {}", store.backend().size_bytes());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Views]");
                println!("  Recent limit:       {}", config.views.recent_limit);
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
                println!("  File prefix:        {}", config.export.file_prefix);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_record(record: &BuildingRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Plain => {
            let field = |value: &Option<String>| value.clone().unwrap_or_default();
            println!("{} ({})", record.name, record.id);
            println!("  Address:       {}", field(&record.address));
            println!("  Neighborhood:  {}", field(&record.neighborhood));
            println!("  Outer code:    {}", field(&record.outer_door_code));
            println!("  Inner code:    {}", field(&record.inner_door_code));
            println!("  Notes:         {}", field(&record.notes));
            println!("  Created:       {}", format_timestamp(&record.created_at));
            println!("  Last viewed:   {}", format_timestamp(&record.last_viewed));
        }
    }
    Ok(())
}

fn print_records(records: &[BuildingRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("No buildings.");
            }
            for record in records {
                let address = record.address.as_deref().unwrap_or("");
                println!("{:<14} {:<30} {}", record.id, record.name, address);
            }
        }
    }
    Ok(())
}
