//! Steam cache clearing.
//!
//! Steam caches icon assets aggressively; after installing new grid art the
//! old icon can stick around until the relevant caches are emptied. Only
//! cache directories that Steam rebuilds on demand are touched.

use crate::steam::SteamPaths;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// `appcache/` children that are safe to empty.
const APP_CACHE_SUBDIRS: [&str; 2] = ["httpcache", "stats"];

/// Tally of one cache-clearing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheReport {
    /// Filesystem entries removed.
    pub removed: usize,
    /// Entries that could not be removed.
    pub errors: usize,
}

/// Clear Steam's HTTP, app and shader caches so new icons are picked up.
///
/// Removal failures are logged and counted rather than aborting the pass,
/// so one locked file does not leave the remaining caches stale.
pub fn clear_caches(paths: &SteamPaths) -> CacheReport {
    let mut report = CacheReport::default();

    let html_cache = paths.html_cache_dir();
    if html_cache.exists() {
        clear_children(&html_cache, &mut report);
        info!("Cleared Steam HTTP cache");
    }

    let app_cache = paths.app_cache_dir();
    if app_cache.exists() {
        for subdir in APP_CACHE_SUBDIRS {
            let path = app_cache.join(subdir);
            if path.exists() {
                clear_children(&path, &mut report);
            }
        }
        info!("Cleared Steam appcache");
    }

    let shader_cache = paths.shader_cache_dir();
    if shader_cache.exists() {
        clear_shader_cache(&shader_cache, &mut report);
        info!("Cleared Steam shader cache for non-Steam apps");
    }

    report
}

/// Remove every child of `dir`, leaving the directory itself in place.
fn clear_children(dir: &Path, report: &mut CacheReport) {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("Failed to read cache directory {}: {e}", dir.display());
            report.errors += 1;
            return;
        }
    };
    for entry in reader.filter_map(|e| e.ok()) {
        let path = entry.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!("Failed to remove {}: {e}", path.display());
                report.errors += 1;
            }
        }
    }
}

/// Remove only numeric-named subdirectories. Shortcut app ids are numeric,
/// while Steam's own store titles use other names we must not touch.
fn clear_shader_cache(dir: &Path, report: &mut CacheReport) {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) => {
            warn!("Failed to read shader cache {}: {e}", dir.display());
            report.errors += 1;
            return;
        }
    };
    for entry in reader.filter_map(|e| e.ok()) {
        let path = entry.path();
        let numeric_name = entry
            .file_name()
            .to_str()
            .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()));
        if !path.is_dir() || !numeric_name {
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!("Failed to remove {}: {e}", path.display());
                report.errors += 1;
            }
        }
    }
}
