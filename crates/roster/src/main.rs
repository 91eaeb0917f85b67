//! `roster` - CLI and server for the student roster
//!
//! This binary runs the REST API and offers the same record operations on
//! the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use roster::cli::{
    AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, ServeCommand,
    ShowCommand, UpdateCommand,
};
use roster::render::{self, Format};
use roster::{init_logging, server, Config, Roster, Storage};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    if !cli.command.uses_loaded_config() {
        if let Command::Config(cmd) = cli.command {
            return inspect_config(cli.config, cmd);
        }
    }

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(path) = cli.data_file {
        config.storage.data_file = Some(path);
    }
    let storage = Storage::open(config.data_file());

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, storage, &cmd),
        Command::List(cmd) => handle_list(&storage, &cmd),
        Command::Show(cmd) => handle_show(&storage, &cmd),
        Command::Add(cmd) => handle_add(&storage, cmd),
        Command::Update(cmd) => handle_update(&storage, cmd),
        Command::Remove(cmd) => {
            let removed = storage.remove(&cmd.id)?;
            println!("Removed student {} ({})", removed.id, removed.full_name);
            Ok(())
        }
        Command::Stats(cmd) => {
            let summary = storage.summary()?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_serve(mut config: Config, storage: Storage, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = &cmd.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(server::serve(&config, storage))?;
    Ok(())
}

fn handle_list(storage: &Storage, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut roster = Roster::new(storage.list()?);
    roster.set_filter(cmd.filter_state());
    let visible = roster.visible();

    if cmd.stats && cmd.format == OutputFormat::Json {
        let body = serde_json::json!({
            "students": visible,
            "summary": roster.summary(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{}", render::records(&visible, cmd.format.into())?);
    if cmd.stats {
        println!();
        println!(
            "Showing {} of {} students",
            visible.len(),
            roster.records().len()
        );
        println!("{}", roster.summary());
    }
    Ok(())
}

fn handle_show(storage: &Storage, cmd: &ShowCommand) -> anyhow::Result<()> {
    let record = storage.get(&cmd.id)?;
    if cmd.json {
        println!("{}", render::records(&[&record], Format::Json)?);
    } else {
        println!("{}", render::detail(&record));
    }
    Ok(())
}

fn handle_add(storage: &Storage, cmd: AddCommand) -> anyhow::Result<()> {
    let record = cmd.fields.into_payload(Some(cmd.id)).into_record()?;
    let stored = storage.add(record)?;
    println!("Added student {} ({})", stored.id, stored.full_name);
    Ok(())
}

fn handle_update(storage: &Storage, cmd: UpdateCommand) -> anyhow::Result<()> {
    let record = cmd.fields.into_payload(None).into_record_with_id(&cmd.id)?;
    let stored = storage.update(&cmd.id, record)?;
    println!("Updated student {} ({})", stored.id, stored.full_name);
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
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!("  Base path:          {}", config.server.base_path);
                println!(
                    "  Static dir:         {}",
                    config
                        .server
                        .static_dir
                        .as_ref()
                        .map_or_else(|| "(none)".to_string(), |d| d.display().to_string())
                );
                println!("  CORS:               {}", config.server.cors);
                println!();
                println!("[Storage]");
                println!("  Data file:          {}", config.data_file().display());
            }
        }
        ConfigCommand::Path | ConfigCommand::Validate { .. } => {
            return inspect_config(None, cmd);
        }
    }
    Ok(())
}

/// `config path` and `config validate`, which never need a loaded config.
fn inspect_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path.clone())) {
                bail!("configuration {} is invalid: {e}", path.display());
            }
            println!("Configuration is valid.");
        }
        ConfigCommand::Show { .. } => bail!("`config show` needs a loaded configuration"),
    }
    Ok(())
}
