//! Icon conversion for Steam's grid art.
//!
//! Steam shows non-Steam shortcut icons from PNG files in the per-user
//! `config/grid` directory, keyed by app id. macOS ships icons as `.icns`,
//! so conversion runs in two steps: the system `sips` tool rasterizes the
//! `.icns` to a temporary PNG at the requested size, then the result is
//! re-encoded as RGBA to normalize color mode and transparency.

use crate::config::IconConfig;
use crate::error::{Result, ShortcutError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Converts `.icns` icons and installs every PNG variant Steam looks for.
#[derive(Debug, Clone, Copy)]
pub struct IconConverter {
    size: u32,
}

impl Default for IconConverter {
    fn default() -> Self {
        Self::new(IconConfig::DEFAULT_SIZE)
    }
}

impl IconConverter {
    /// Converter producing square PNGs of `size` pixels.
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Convert `icns_path` and install it for `app_id`.
    ///
    /// Writes `{id}p.png` (the icon the shortcut entry points at) plus the
    /// `{id}.png`, `{id}_hero.png` and `{id}_logo.png` grid variants, and
    /// mirrors `{id}.png` into the library cache on a best-effort basis.
    /// Returns the absolute path of the primary icon.
    pub fn install(
        &self,
        icns_path: &Path,
        app_id: u32,
        grid_dir: &Path,
        library_cache_dir: &Path,
    ) -> Result<PathBuf> {
        fs::create_dir_all(grid_dir).map_err(|e| ShortcutError::io_with_path(e, grid_dir))?;

        let image = self.rasterize(icns_path)?;

        let primary = grid_dir.join(format!("{app_id}p.png"));
        let variants = [
            primary.clone(),
            grid_dir.join(format!("{app_id}.png")),
            grid_dir.join(format!("{app_id}_hero.png")),
            grid_dir.join(format!("{app_id}_logo.png")),
        ];
        for path in &variants {
            image.save(path).map_err(|e| ShortcutError::IconConversion {
                message: format!("Could not write {}: {e}", path.display()),
            })?;
        }

        // Some Steam builds read icons from librarycache instead of grid.
        // Failure here only costs the icon in those builds, so log and move on.
        let cached = library_cache_dir.join(format!("{app_id}.png"));
        if let Err(e) = fs::create_dir_all(library_cache_dir) {
            debug!("Could not create librarycache directory: {e}");
        } else if let Err(e) = image.save(&cached) {
            debug!("Could not save icon to librarycache directory: {e}");
        }

        debug!(
            "Icon converted and saved as {} variants in {}",
            variants.len(),
            grid_dir.display()
        );
        Ok(primary)
    }

    /// Run `sips` into a temporary PNG and decode the result as RGBA.
    fn rasterize(&self, icns_path: &Path) -> Result<image::RgbaImage> {
        let temp_png = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| ShortcutError::IconConversion {
                message: format!("Could not create temporary PNG file: {e}"),
            })?;

        let size = self.size.to_string();
        let output = Command::new("sips")
            .arg("-s")
            .arg("format")
            .arg("png")
            .arg("--resampleHeightWidth")
            .arg(&size)
            .arg(&size)
            .arg(icns_path)
            .arg("--out")
            .arg(temp_png.path())
            .output()
            .map_err(|e| ShortcutError::IconConversion {
                message: format!("Could not run sips: {e}"),
            })?;
        if !output.status.success() {
            return Err(ShortcutError::IconConversion {
                message: format!(
                    "sips failed for {}: {}",
                    icns_path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let image = image::open(temp_png.path()).map_err(|e| ShortcutError::IconConversion {
            message: format!("Could not decode converted icon: {e}"),
        })?;
        Ok(image.to_rgba8())
    }
}
