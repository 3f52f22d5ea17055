//! The shortcut database and its merge engine.
//!
//! Entries are held as raw decoded objects rather than fully typed records,
//! so fields this tool does not model (written by Steam or by other tools)
//! survive a load-merge-save cycle untouched. Serialized index keys are
//! derived from position on every encode, which keeps them a contiguous
//! `"0".."N-1"` run and silently repairs databases keyed by older tooling.
//!
//! Writes are atomic: encode to memory, re-decode to verify, write to a
//! temp file, fsync, rename over the target.

use crate::entry::ShortcutEntry;
use crate::error::{Result, ShortcutError};
use crate::vdf::{self, Object, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process;
use std::thread;
use tracing::{debug, warn};

/// Root key wrapping the entry map in the serialized form.
const ROOT_KEY: &str = "shortcuts";

/// Outcome of merging one entry into the database.
///
/// `DuplicateExists` is a value, not an error: the caller decides whether a
/// duplicate means skip, abort, or retry with overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The entry was appended at `index`.
    Added { index: usize },
    /// An existing entry at `index` was replaced in place.
    Replaced { index: usize },
    /// An entry with the same `exe` already sits at `index`; the database
    /// was left untouched.
    DuplicateExists { index: usize },
}

/// An ordered collection of shortcut entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortcutDatabase {
    entries: Vec<Object>,
}

impl ShortcutDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a database from shortcuts-file bytes.
    ///
    /// The root may hold only the conventional `shortcuts` object (matched
    /// case-insensitively); any other root pair fails with
    /// [`ShortcutError::Format`] rather than being dropped on the next
    /// encode. An empty root decodes as an empty database (Steam tolerates
    /// the same). Entry index keys are ignored on read: order is
    /// positional, and the next encode renumbers from zero.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let root = vdf::from_bytes(bytes)?;
        let mut entries = Vec::new();
        let mut seen_root_key = false;
        for (key, value) in root.iter() {
            if !key.eq_ignore_ascii_case(ROOT_KEY) {
                return Err(ShortcutError::format_at(
                    0,
                    format!("unexpected root key {key:?}"),
                ));
            }
            if seen_root_key {
                return Err(ShortcutError::format_at(
                    0,
                    "duplicate root 'shortcuts' key",
                ));
            }
            seen_root_key = true;
            let map = match value {
                Value::Object(map) => map,
                _ => {
                    return Err(ShortcutError::format_at(
                        0,
                        "root 'shortcuts' value is not an object",
                    ))
                }
            };
            entries.reserve(map.len());
            for (entry_key, entry_value) in map.iter() {
                match entry_value {
                    Value::Object(entry) => entries.push(entry.clone()),
                    _ => {
                        return Err(ShortcutError::format_at(
                            0,
                            format!("shortcut entry {entry_key:?} is not an object"),
                        ))
                    }
                }
            }
        }
        Ok(Self { entries })
    }

    /// Encode the database to shortcuts-file bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut map = Object::new();
        for (index, entry) in self.entries.iter().enumerate() {
            map.push(index.to_string(), Value::Object(entry.clone()));
        }
        let mut root = Object::new();
        root.push(ROOT_KEY, Value::Object(map));
        vdf::to_bytes(&root)
    }

    /// Merge one entry.
    ///
    /// The scan matches the first existing entry whose `exe` string equals
    /// the new entry's quoted `exe` exactly (the stored key is resolved
    /// case-insensitively, so Steam-written entries match too). A match with
    /// `overwrite` replaces in place, preserving the entry's position; a
    /// match without it reports [`MergeOutcome::DuplicateExists`] and leaves
    /// the database untouched. No match appends.
    pub fn merge(&mut self, entry: &ShortcutEntry, overwrite: bool) -> MergeOutcome {
        let existing = self
            .entries
            .iter()
            .position(|obj| obj.get_str("exe") == Some(entry.exe.as_str()));

        match existing {
            Some(index) if overwrite => {
                self.entries[index] = entry.to_object();
                debug!("Replaced shortcut at index {index} for {}", entry.exe);
                MergeOutcome::Replaced { index }
            }
            Some(index) => MergeOutcome::DuplicateExists { index },
            None => {
                self.entries.push(entry.to_object());
                let index = self.entries.len() - 1;
                debug!("Added shortcut at index {index} for {}", entry.exe);
                MergeOutcome::Added { index }
            }
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored entries in index order.
    pub fn entries(&self) -> impl Iterator<Item = &Object> {
        self.entries.iter()
    }

    /// The stored entry at `index`, if any.
    pub fn entry(&self, index: usize) -> Option<&Object> {
        self.entries.get(index)
    }

    /// Load a database from disk.
    ///
    /// A missing file is an empty database; the file is only created by
    /// [`ShortcutDatabase::save`]. With `fresh` set the existing file is
    /// never read, which is the sanctioned escape hatch for a corrupted
    /// database: decoding errors cannot occur because no decode happens.
    pub fn load(path: &Path, fresh: bool) -> Result<Self> {
        if fresh {
            debug!("Starting from a fresh shortcut database");
            return Ok(Self::new());
        }
        if !path.exists() {
            debug!("No shortcuts file at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let bytes = fs::read(path).map_err(|e| ShortcutError::io_with_path(e, path))?;
        Self::decode(&bytes)
    }

    /// Write the database to disk atomically.
    ///
    /// The encoded bytes are re-decoded and compared before anything touches
    /// the destination. If the target exists but no longer decodes (the
    /// fresh-mode recovery case), its bytes are first copied to a `.vdf.bak`
    /// sibling so corrupt data is never silently destroyed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let encoded = self.encode()?;

        // Validate by re-decoding before any bytes reach the destination.
        let reparsed = Self::decode(&encoded).map_err(|e| ShortcutError::Encode {
            message: format!("verification re-decode failed: {e}"),
        })?;
        if reparsed != *self {
            return Err(ShortcutError::Encode {
                message: "verification mismatch after re-decode".to_string(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ShortcutError::io_with_path(e, parent))?;
            }
        }

        // Unique temp name so a concurrent invocation cannot collide.
        let pid = process::id();
        let tid = thread_id();
        let temp_path = path.with_extension(format!("vdf.{pid}.{tid}.tmp"));

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| ShortcutError::io_with_path(e, &temp_path))?;
            file.write_all(&encoded)
                .map_err(|e| ShortcutError::io_with_path(e, &temp_path))?;
            file.flush()
                .map_err(|e| ShortcutError::io_with_path(e, &temp_path))?;
            file.sync_all()
                .map_err(|e| ShortcutError::io_with_path(e, &temp_path))?;
        }

        self.backup_if_corrupt(path);

        fs::rename(&temp_path, path).map_err(|e| ShortcutError::io_with_path(e, path))?;
        debug!("Atomically wrote {}", path.display());
        Ok(())
    }

    /// Keep a `.vdf.bak` copy of an existing target that no longer decodes.
    fn backup_if_corrupt(&self, path: &Path) {
        let old_bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            // Missing target is the common case; anything else is surfaced
            // by the rename that follows.
            Err(_) => return,
        };
        if Self::decode(&old_bytes).is_ok() {
            return;
        }
        let backup_path = path.with_extension("vdf.bak");
        match fs::copy(path, &backup_path) {
            Ok(_) => debug!(
                "Backed up undecodable shortcuts file to {}",
                backup_path.display()
            ),
            Err(e) => warn!(
                "Failed to back up {} to {}: {}",
                path.display(),
                backup_path.display(),
                e
            ),
        }
    }
}

/// Get a unique thread identifier.
fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    format!("{:?}", thread::current().id()).hash(&mut hasher);
    hasher.finish()
}
