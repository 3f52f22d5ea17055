//! Steam Shortcuts - Create Steam shortcuts for macOS applications.
//!
//! This crate reads macOS `.app` bundles, converts their `.icns` icons into
//! the PNG grid art Steam expects, and merges shortcut entries into the
//! per-user `shortcuts.vdf` database using the same binary key-value format
//! Steam itself writes. It can be used programmatically without the CLI
//! front end.
//!
//! For the command-line tools (`steam-shortcuts`, `find-steam-apps`), see
//! the `steam-shortcuts-cli` crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use steam_shortcuts::{AppBundle, IconConverter, ShortcutDatabase, ShortcutEntry, SteamPaths};
//!
//! fn main() -> steam_shortcuts::Result<()> {
//!     let steam = SteamPaths::locate()?;
//!     let user = steam.select_user(None)?;
//!
//!     let bundle = AppBundle::read(Path::new("/Applications/Safari.app"))?;
//!     let mut entry = ShortcutEntry::builder(&bundle.path)
//!         .app_name(&bundle.name)
//!         .build();
//!     if let Some(icns) = &bundle.icon_path {
//!         let icon = IconConverter::default().install(
//!             icns,
//!             entry.app_id,
//!             &steam.grid_dir(&user),
//!             &steam.library_cache_dir(&user),
//!         )?;
//!         entry.icon = icon.display().to_string();
//!     }
//!
//!     let shortcuts_file = steam.shortcuts_file(&user)?;
//!     let mut db = ShortcutDatabase::load(&shortcuts_file, false)?;
//!     db.merge(&entry, true);
//!     db.save(&shortcuts_file)?;
//!     Ok(())
//! }
//! ```

pub mod appid;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod database;
pub mod entry;
pub mod error;
pub mod icon;
pub mod steam;
pub mod vdf;

// Re-export commonly used types
pub use appid::shortcut_app_id;
pub use bundle::AppBundle;
pub use cache::{clear_caches, CacheReport};
pub use database::{MergeOutcome, ShortcutDatabase};
pub use entry::{ShortcutEntry, ShortcutEntryBuilder};
pub use error::{Result, ShortcutError};
pub use icon::IconConverter;
pub use steam::{expand_tilde, SteamPaths};
