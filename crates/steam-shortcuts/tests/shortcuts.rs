//! Integration tests for the shortcut pipeline.
//!
//! These tests exercise the public surface end to end: reading app bundle
//! metadata, deriving app ids, merging entries, and round-tripping the
//! binary shortcuts database through the filesystem.

use std::fs;
use std::path::Path;
use steam_shortcuts::vdf::{self, Object, Value};
use steam_shortcuts::{
    shortcut_app_id, AppBundle, MergeOutcome, ShortcutDatabase, ShortcutEntry,
};
use tempfile::TempDir;

/// Byte-for-byte form of a shortcuts file with no entries.
const EMPTY_FILE: &[u8] = b"\x00shortcuts\x00\x08\x08";

fn entry_for(path: &str) -> ShortcutEntry {
    ShortcutEntry::builder(path)
        .app_name(Path::new(path).file_stem().unwrap().to_str().unwrap())
        .build()
}

#[test]
fn test_empty_database_matches_steam_reference_bytes() {
    let db = ShortcutDatabase::new();
    assert_eq!(db.encode().unwrap(), EMPTY_FILE);
    assert!(ShortcutDatabase::decode(EMPTY_FILE).unwrap().is_empty());
}

#[test]
fn test_known_app_ids() {
    assert_eq!(shortcut_app_id("/Applications/Foo.app"), 581159244);
    assert_eq!(shortcut_app_id("/Applications/Bar.app"), 1956044572);
    assert_eq!(shortcut_app_id("/Applications/Safari.app"), 35711054);
}

#[test]
fn test_add_save_and_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = temp_dir.path().join("shortcuts.vdf");

    let mut db = ShortcutDatabase::load(&file, false).unwrap();
    assert!(db.is_empty());

    let outcome = db.merge(&entry_for("/Applications/Foo.app"), false);
    assert_eq!(outcome, MergeOutcome::Added { index: 0 });
    db.save(&file).unwrap();

    let reloaded = ShortcutDatabase::load(&file, false).unwrap();
    assert_eq!(reloaded.len(), 1);
    let record = reloaded.entry(0).unwrap();
    assert_eq!(record.get_u32("appid"), Some(581159244));
    assert_eq!(record.get_str("AppName"), Some("Foo"));
    assert_eq!(record.get_str("exe"), Some("'/Applications/Foo.app'"));
    assert_eq!(record.get_str("StartDir"), Some("'/Applications'"));
}

#[test]
fn test_second_app_appends_without_touching_first() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = temp_dir.path().join("shortcuts.vdf");

    let mut db = ShortcutDatabase::new();
    db.merge(&entry_for("/Applications/Foo.app"), false);
    db.save(&file).unwrap();

    let mut db = ShortcutDatabase::load(&file, false).unwrap();
    let outcome = db.merge(&entry_for("/Applications/Bar.app"), false);
    assert_eq!(outcome, MergeOutcome::Added { index: 1 });
    db.save(&file).unwrap();

    let reloaded = ShortcutDatabase::load(&file, false).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(
        reloaded.entry(0).unwrap().get_str("exe"),
        Some("'/Applications/Foo.app'")
    );
    assert_eq!(
        reloaded.entry(1).unwrap().get_str("exe"),
        Some("'/Applications/Bar.app'")
    );
}

#[test]
fn test_overwrite_replaces_in_place() {
    let mut db = ShortcutDatabase::new();
    db.merge(&entry_for("/Applications/Foo.app"), false);
    db.merge(&entry_for("/Applications/Bar.app"), false);

    let mut updated = entry_for("/Applications/Foo.app");
    updated.icon = "/tmp/grid/581159244p.png".to_string();
    let outcome = db.merge(&updated, true);
    assert_eq!(outcome, MergeOutcome::Replaced { index: 0 });
    assert_eq!(db.len(), 2);
    assert_eq!(
        db.entry(0).unwrap().get_str("icon"),
        Some("/tmp/grid/581159244p.png")
    );
}

#[test]
fn test_duplicate_without_overwrite_leaves_bytes_unchanged() {
    let mut db = ShortcutDatabase::new();
    db.merge(&entry_for("/Applications/Foo.app"), false);
    let before = db.encode().unwrap();

    let outcome = db.merge(&entry_for("/Applications/Foo.app"), false);
    assert_eq!(outcome, MergeOutcome::DuplicateExists { index: 0 });
    assert_eq!(db.encode().unwrap(), before);
}

#[test]
fn test_entry_keys_are_renumbered_on_encode() {
    // Older tools keyed records by app id; Steam expects positional keys.
    let mut record = Object::new();
    record.push("appid", Value::U32(581159244));
    record.push("exe", Value::String("'/Applications/Foo.app'".to_string()));
    record.push("tags", Value::Object(Object::new()));
    let mut shortcuts = Object::new();
    shortcuts.push("581159244", Value::Object(record));
    let mut root = Object::new();
    root.push("shortcuts", Value::Object(shortcuts));
    let legacy_bytes = vdf::to_bytes(&root).unwrap();

    let db = ShortcutDatabase::decode(&legacy_bytes).unwrap();
    let repaired = vdf::from_bytes(&db.encode().unwrap()).unwrap();
    let Some(Value::Object(shortcuts)) = repaired.get("shortcuts") else {
        panic!("missing shortcuts object");
    };
    let keys: Vec<&str> = shortcuts.keys().collect();
    assert_eq!(keys, vec!["0"]);
}

#[test]
fn test_fresh_mode_recovers_from_corrupt_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = temp_dir.path().join("shortcuts.vdf");
    fs::write(&file, b"\x07garbage").unwrap();

    let strict = ShortcutDatabase::load(&file, false);
    assert!(strict.as_ref().is_err_and(|e| e.is_format_error()));

    let mut db = ShortcutDatabase::load(&file, true).unwrap();
    assert!(db.is_empty());
    db.merge(&entry_for("/Applications/Foo.app"), false);
    db.save(&file).unwrap();

    // The unreadable predecessor is kept next to the new file.
    let backup = temp_dir.path().join("shortcuts.vdf.bak");
    assert_eq!(fs::read(&backup).unwrap(), b"\x07garbage");
    assert_eq!(ShortcutDatabase::load(&file, false).unwrap().len(), 1);
}

#[test]
fn test_bundle_to_database_pipeline() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bundle_dir = temp_dir.path().join("Pixel Painter.app");
    let contents = bundle_dir.join("Contents");
    fs::create_dir_all(contents.join("Resources")).unwrap();
    fs::write(
        contents.join("Info.plist"),
        r#"<plist><dict>
            <key>CFBundleName</key>
            <string>Pixel Painter</string>
            <key>CFBundleIdentifier</key>
            <string>com.example.pixelpainter</string>
        </dict></plist>"#,
    )
    .unwrap();

    let bundle = AppBundle::read(&bundle_dir).unwrap();
    assert_eq!(bundle.name, "Pixel Painter");
    assert!(bundle.icon_path.is_none());

    let entry = ShortcutEntry::builder(&bundle.path)
        .app_name(&bundle.name)
        .build();
    assert_eq!(
        entry.app_id,
        shortcut_app_id(&bundle.path.display().to_string())
    );

    let file = temp_dir.path().join("shortcuts.vdf");
    let mut db = ShortcutDatabase::new();
    db.merge(&entry, false);
    db.save(&file).unwrap();

    let record_exe = format!("'{}'", bundle.path.display());
    let reloaded = ShortcutDatabase::load(&file, false).unwrap();
    assert_eq!(reloaded.entry(0).unwrap().get_str("exe"), Some(record_exe.as_str()));
    assert_eq!(
        reloaded.entry(0).unwrap().get_str("AppName"),
        Some("Pixel Painter")
    );
}
