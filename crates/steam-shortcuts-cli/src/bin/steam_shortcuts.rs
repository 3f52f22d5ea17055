//! steam-shortcuts - Add macOS applications to Steam as non-Steam games.
//!
//! This binary reads one or more `.app` bundles, installs their icons as
//! Steam grid art, and merges shortcut entries into the selected user's
//! `shortcuts.vdf`.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use steam_shortcuts::config::IconConfig;
use steam_shortcuts::{
    clear_caches, AppBundle, IconConverter, MergeOutcome, ShortcutDatabase, ShortcutEntry,
    SteamPaths,
};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "steam-shortcuts")]
#[command(about = "Create Steam shortcuts for macOS applications with proper icons")]
struct Args {
    /// Paths to one or more macOS app bundles (.app)
    #[arg(required = true)]
    app_paths: Vec<PathBuf>,

    /// Steam user ID (if not specified, first user is used)
    #[arg(long)]
    user: Option<String>,

    /// PNG icon size in pixels
    #[arg(long, default_value_t = IconConfig::DEFAULT_SIZE)]
    size: u32,

    /// Overwrite existing shortcut if it exists
    #[arg(long)]
    overwrite: bool,

    /// Create a new shortcuts.vdf file (ignore existing)
    #[arg(long)]
    new_vdf: bool,

    /// Clear Steam's caches so new icons appear properly
    #[arg(long)]
    clear_cache: bool,

    /// Show detailed debug information
    #[arg(short, long)]
    debug: bool,
}

/// Result of processing one app bundle, carrying its display name.
enum AddOutcome {
    Created(String),
    Skipped(String),
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let steam = SteamPaths::locate()?;
    let user = steam.select_user(args.user.as_deref())?;
    debug!(
        "Using Steam user directory: {}",
        steam.userdata_dir().join(&user).display()
    );

    let shortcuts_file = steam.shortcuts_file(&user)?;
    debug!("Using shortcuts file: {}", shortcuts_file.display());

    let mut db = match ShortcutDatabase::load(&shortcuts_file, args.new_vdf) {
        Ok(db) => db,
        Err(e) if e.is_format_error() => {
            error!("Could not load shortcuts file: {e}");
            error!(
                "Re-run with --new-vdf to start over; the unreadable file will \
                 be kept as shortcuts.vdf.bak"
            );
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let converter = IconConverter::new(args.size);
    let grid_dir = steam.grid_dir(&user);
    let library_cache_dir = steam.library_cache_dir(&user);

    let mut created = 0usize;
    let mut failed = 0usize;
    for app_path in &args.app_paths {
        let outcome = add_app(
            app_path,
            &mut db,
            &converter,
            &grid_dir,
            &library_cache_dir,
            args.overwrite,
        );
        match outcome {
            Ok(AddOutcome::Created(name)) => {
                info!("Shortcut created for {name}");
                created += 1;
            }
            Ok(AddOutcome::Skipped(name)) => {
                warn!("Shortcut for {name} already exists. Use --overwrite to replace it.");
            }
            Err(e) => {
                error!("{}: {e}", app_path.display());
                failed += 1;
            }
        }
    }

    if created > 0 {
        db.save(&shortcuts_file)?;
        info!("Successfully created {created} shortcut(s)");

        if args.clear_cache {
            let report = clear_caches(&steam);
            debug!(
                "Cache clearing removed {} entries ({} failures)",
                report.removed, report.errors
            );
        }

        info!("Restart Steam to see the shortcut(s) with their icons");
        info!("Note: You may need to restart Steam COMPLETELY (quit from the menu) for icons to appear");
    } else {
        warn!("No shortcuts were created");
    }

    if failed == args.app_paths.len() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Process one app bundle: read metadata, install the icon, merge the entry.
///
/// The duplicate check runs before icon conversion so a skipped app does
/// not overwrite grid art belonging to its existing shortcut.
fn add_app(
    app_path: &Path,
    db: &mut ShortcutDatabase,
    converter: &IconConverter,
    grid_dir: &Path,
    library_cache_dir: &Path,
    overwrite: bool,
) -> steam_shortcuts::Result<AddOutcome> {
    let bundle = AppBundle::read(app_path)?;
    debug!("App info: {bundle:?}");

    let mut entry = ShortcutEntry::builder(&bundle.path)
        .app_name(&bundle.name)
        .build();

    let exists = db
        .entries()
        .any(|record| record.get_str("exe") == Some(entry.exe.as_str()));
    if exists && !overwrite {
        return Ok(AddOutcome::Skipped(bundle.name));
    }

    // A failed icon conversion downgrades the shortcut to no icon rather
    // than losing the shortcut itself.
    if let Some(icns) = &bundle.icon_path {
        match converter.install(icns, entry.app_id, grid_dir, library_cache_dir) {
            Ok(icon) => {
                info!("Icon converted and saved to {}", icon.display());
                entry.icon = icon.display().to_string();
            }
            Err(e) => warn!("Could not convert icon for {}: {e}", bundle.name),
        }
    }

    match db.merge(&entry, overwrite) {
        MergeOutcome::Added { .. } | MergeOutcome::Replaced { .. } => {
            Ok(AddOutcome::Created(bundle.name))
        }
        MergeOutcome::DuplicateExists { .. } => Ok(AddOutcome::Skipped(bundle.name)),
    }
}
