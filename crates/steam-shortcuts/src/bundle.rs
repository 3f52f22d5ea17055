//! macOS application bundle inspection.
//!
//! An `.app` bundle is a directory; the metadata we need (display name,
//! bundle identifier, icon file) lives in `Contents/Info.plist`. Property
//! lists come in XML and binary flavors; binary ones are converted through
//! the system `plutil` tool before the XML is scanned.

use crate::error::{Result, ShortcutError};
use crate::steam::expand_tilde;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

const BINARY_PLIST_MAGIC: &[u8] = b"bplist00";

/// Metadata read from one macOS `.app` bundle.
#[derive(Debug, Clone)]
pub struct AppBundle {
    /// Canonical path to the bundle directory.
    pub path: PathBuf,
    /// Display name, from `CFBundleName` or the directory stem.
    pub name: String,
    /// `CFBundleIdentifier`, or empty when the plist omits it.
    pub bundle_id: String,
    /// Executable under `Contents/MacOS`. Shortcuts store the bundle path,
    /// not this; it is resolved for callers that need the real binary.
    pub executable: PathBuf,
    /// Bundle icon in `.icns` form, when one could be found.
    pub icon_path: Option<PathBuf>,
}

impl AppBundle {
    /// Read bundle metadata from disk.
    ///
    /// The path may start with `~`; it is expanded and canonicalized before
    /// any checks. A missing icon is not an error, only a missing or
    /// unreadable `Info.plist` is.
    pub fn read(path: &Path) -> Result<Self> {
        let expanded = expand_tilde(path);
        let bundle_path = expanded
            .canonicalize()
            .map_err(|_| ShortcutError::BundleNotFound(expanded.clone()))?;

        let is_app_dir = bundle_path.is_dir()
            && bundle_path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("app"));
        if !is_app_dir {
            return Err(ShortcutError::NotAnAppBundle(bundle_path));
        }

        let info_plist = bundle_path.join("Contents").join("Info.plist");
        if !info_plist.exists() {
            return Err(ShortcutError::MetadataMissing {
                path: bundle_path,
                message: "Info.plist not found in app bundle".to_string(),
            });
        }
        let plist = read_plist_content(&info_plist)?;

        let stem = bundle_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let name = plist_string_value(&plist, "CFBundleName").unwrap_or(stem);
        let bundle_id = plist_string_value(&plist, "CFBundleIdentifier").unwrap_or_default();
        let executable = bundle_path
            .join("Contents")
            .join("MacOS")
            .join(plist_string_value(&plist, "CFBundleExecutable").unwrap_or_else(|| name.clone()));

        let icon_path = find_icon(&bundle_path, &plist);
        if icon_path.is_none() {
            warn!("No icon found for app: {}", bundle_path.display());
        }

        debug!(
            "Read app bundle {} ({name})",
            bundle_path.display()
        );
        Ok(Self {
            path: bundle_path,
            name,
            bundle_id,
            executable,
            icon_path,
        })
    }
}

/// Load a property list as XML text, converting binary plists via `plutil`.
fn read_plist_content(path: &Path) -> Result<String> {
    let raw = fs::read(path).map_err(|e| ShortcutError::io_with_path(e, path))?;
    if !raw.starts_with(BINARY_PLIST_MAGIC) {
        return Ok(String::from_utf8_lossy(&raw).into_owned());
    }

    let output = Command::new("plutil")
        .arg("-convert")
        .arg("xml1")
        .arg("-o")
        .arg("-")
        .arg(path)
        .output()
        .map_err(|e| ShortcutError::MetadataMissing {
            path: path.to_path_buf(),
            message: format!("Could not run plutil to read binary plist: {e}"),
        })?;
    if !output.status.success() {
        return Err(ShortcutError::MetadataMissing {
            path: path.to_path_buf(),
            message: format!(
                "plutil failed to convert binary plist: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// First `<string>` value following `<key>{key}</key>`, if any.
fn plist_string_value(content: &str, key: &str) -> Option<String> {
    let pattern = format!(
        r"<key>{}</key>\s*<string>([^<]*)</string>",
        regex::escape(key)
    );
    let regex = Regex::new(&pattern).ok()?;
    regex
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve the bundle's `.icns` file.
///
/// Prefers the `CFBundleIconFile` name (with the `.icns` suffix appended
/// when absent, as the plist convention allows either form), then falls
/// back to the alphabetically first `.icns` file in `Contents/Resources`.
fn find_icon(bundle_path: &Path, plist: &str) -> Option<PathBuf> {
    let resources = bundle_path.join("Contents").join("Resources");

    if let Some(mut icon_name) = plist_string_value(plist, "CFBundleIconFile") {
        if !icon_name.to_ascii_lowercase().ends_with(".icns") {
            icon_name.push_str(".icns");
        }
        let declared = resources.join(&icon_name);
        if declared.is_file() {
            return Some(declared);
        }
    }

    let entries = fs::read_dir(&resources).ok()?;
    let mut icns_files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("icns"))
        })
        .collect();
    icns_files.sort();
    icns_files.into_iter().next()
}
