//! # Command Handlers
//!
//! - `run()`: parses arguments, installs logging, builds the context and dispatches
//! - `init_context()`: builds `AppContext` from config and flags
//! - `handle_*()`: per-command handlers that call the API and print the result
//!
//! Handlers return `Ok(false)` when the command ran but something it reports on
//! failed (a batch item, an unfixed inconsistency), so `main` can exit non-zero.

use super::print::{print_batch, print_items, print_messages, print_report, sort_items};
use super::setup::{Cli, Commands};
use clap::Parser;
use colored::Colorize;
use pimedia::api::MediaLibrary;
use pimedia::config::MediaConfig;
use pimedia::error::{MediaError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    library: MediaLibrary,
    owner: Option<String>,
}

impl AppContext {
    fn owner(&self) -> Result<&str> {
        self.owner
            .as_deref()
            .ok_or_else(|| MediaError::Config("--owner is required for this command".to_string()))
    }
}

pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Init => handle_init(&ctx),
        Commands::Ls {
            trash,
            favorites,
            json,
        } => handle_list(&ctx, trash, favorites, json),
        Commands::Mkdir { parent, name } => handle_mkdir(&ctx, &parent, &name),
        Commands::Add { folder, files } => handle_add(&ctx, &folder, &files),
        Commands::Trash { ids } => handle_trash(&ctx, &ids),
        Commands::Restore { ids } => handle_restore(&ctx, &ids),
        Commands::Purge { ids } => handle_purge(&ctx, &ids),
        Commands::Fav { ids } => handle_favorite(&ctx, &ids),
        Commands::Doctor { fix } => handle_doctor(&ctx, fix),
        Commands::Locate { folder, name } => handle_locate(&ctx, &folder, &name),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let mut config = MediaConfig::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config = config.with_storage_dir(root);
    }
    let library = MediaLibrary::from_config(&config)?;
    debug!(storage = %library.layout().storage_dir().display(), "library opened");

    Ok(AppContext {
        library,
        owner: cli.owner.clone(),
    })
}

fn handle_init(ctx: &AppContext) -> Result<bool> {
    let messages = ctx.library.init()?;
    print_messages(&messages);
    Ok(true)
}

fn handle_list(ctx: &AppContext, trash: bool, favorites: bool, json: bool) -> Result<bool> {
    let mut items: Vec<_> = ctx
        .library
        .list(ctx.owner()?)?
        .into_iter()
        .filter(|item| item.is_trashed == trash)
        .filter(|item| !favorites || item.is_favorite)
        .collect();
    sort_items(&mut items);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_items(&items);
    }
    Ok(true)
}

fn handle_mkdir(ctx: &AppContext, parent: &str, name: &str) -> Result<bool> {
    let id = ctx.library.create_folder(ctx.owner()?, parent, name)?;
    println!("{}", format!("Folder created: {}", id).green());
    Ok(true)
}

fn handle_add(ctx: &AppContext, folder: &str, files: &[PathBuf]) -> Result<bool> {
    let owner = ctx.owner()?;
    let mut all_ok = true;

    for path in files {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => {
                println!("{}", format!("Skipped {}: no file name", path.display()).red());
                all_ok = false;
                continue;
            }
        };
        let outcome = File::open(path)
            .map_err(MediaError::from)
            .and_then(|mut file| ctx.library.upload(owner, folder, name, &mut file));
        match outcome {
            Ok(id) => println!("{}", format!("Added: {}", id).green()),
            Err(e) => {
                println!("{}", format!("Could not add {}: {}", path.display(), e).red());
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

fn handle_trash(ctx: &AppContext, ids: &[String]) -> Result<bool> {
    let result = ctx.library.move_to_trash(ctx.owner()?, ids);
    print_batch(&result);
    Ok(!result.has_failures())
}

fn handle_restore(ctx: &AppContext, ids: &[String]) -> Result<bool> {
    let result = ctx.library.restore(ctx.owner()?, ids);
    print_batch(&result);
    Ok(!result.has_failures())
}

fn handle_purge(ctx: &AppContext, ids: &[String]) -> Result<bool> {
    let result = ctx.library.permanent_delete(ctx.owner()?, ids);
    print_batch(&result);
    Ok(!result.has_failures())
}

fn handle_favorite(ctx: &AppContext, ids: &[String]) -> Result<bool> {
    let result = ctx.library.toggle_favorite(ctx.owner()?, ids);
    print_batch(&result);
    Ok(!result.has_failures())
}

fn handle_doctor(ctx: &AppContext, fix: bool) -> Result<bool> {
    let report = ctx.library.doctor(ctx.owner()?, fix)?;
    print_report(&report);
    Ok(report.is_clean() || report.fixed)
}

fn handle_locate(ctx: &AppContext, folder: &str, name: &str) -> Result<bool> {
    let path = ctx.library.locate(ctx.owner()?, folder, name)?;
    println!("{}", path.display());
    Ok(true)
}
