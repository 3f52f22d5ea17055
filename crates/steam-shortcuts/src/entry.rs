//! Typed representation of one shortcut record.
//!
//! The serialized field set matches what Steam's own shortcut editor writes,
//! including the duplicated-case pairs (`AppName`/`appname`, `Exe`/`exe`)
//! that keep older Steam builds happy. `exe` and `StartDir` hold the path in
//! single quotes, the same form Steam produces when a shortcut is added
//! through its UI.

use crate::appid::shortcut_app_id;
use crate::vdf::{Object, Value};
use std::path::{Path, PathBuf};

/// One non-Steam-application record in the shortcuts database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutEntry {
    pub app_id: u32,
    pub app_name: String,
    /// Quoted absolute bundle path, e.g. `'/Applications/Foo.app'`.
    pub exe: String,
    /// Quoted absolute parent directory, e.g. `'/Applications'`.
    pub start_dir: String,
    /// Absolute path to the converted PNG icon, or empty when no icon
    /// could be produced.
    pub icon: String,
    pub shortcut_path: String,
    pub launch_options: String,
    pub is_hidden: u32,
    pub allow_desktop_config: u32,
    pub allow_overlay: u32,
    pub open_vr: u32,
    pub devkit: u32,
    pub devkit_game_id: String,
    pub last_play_time: u32,
    pub flatpak_app_id: String,
    pub tags: Vec<String>,
}

impl Default for ShortcutEntry {
    fn default() -> Self {
        Self {
            app_id: 0,
            app_name: String::new(),
            exe: String::new(),
            start_dir: String::new(),
            icon: String::new(),
            shortcut_path: String::new(),
            launch_options: String::new(),
            is_hidden: 0,
            allow_desktop_config: 1,
            allow_overlay: 1,
            open_vr: 0,
            devkit: 0,
            devkit_game_id: String::new(),
            last_play_time: 0,
            flatpak_app_id: String::new(),
            tags: Vec::new(),
        }
    }
}

impl ShortcutEntry {
    /// Create a builder for the given app bundle path.
    ///
    /// The app id, quoted `exe`, and quoted `start_dir` (the bundle's parent
    /// directory) are derived from the path immediately.
    pub fn builder(bundle_path: impl AsRef<Path>) -> ShortcutEntryBuilder {
        ShortcutEntryBuilder::new(bundle_path)
    }

    /// Render to the serialized key-value form, in the exact field order
    /// Steam expects.
    pub fn to_object(&self) -> Object {
        let mut obj = Object::new();
        obj.push("appid", Value::U32(self.app_id));
        obj.push("AppName", Value::String(self.app_name.clone()));
        obj.push("appname", Value::String(self.app_name.clone()));
        obj.push("Exe", Value::String(self.exe.clone()));
        obj.push("exe", Value::String(self.exe.clone()));
        obj.push("StartDir", Value::String(self.start_dir.clone()));
        obj.push("icon", Value::String(self.icon.clone()));
        obj.push("shortcutpath", Value::String(self.shortcut_path.clone()));
        obj.push("LaunchOptions", Value::String(self.launch_options.clone()));
        obj.push("IsHidden", Value::U32(self.is_hidden));
        obj.push("AllowDesktopConfig", Value::U32(self.allow_desktop_config));
        obj.push("AllowOverlay", Value::U32(self.allow_overlay));
        obj.push("OpenVR", Value::U32(self.open_vr));
        obj.push("Devkit", Value::U32(self.devkit));
        obj.push("DevkitGameID", Value::String(self.devkit_game_id.clone()));
        obj.push("LastPlayTime", Value::U32(self.last_play_time));
        obj.push("FlatpakAppID", Value::String(self.flatpak_app_id.clone()));
        let mut tags = Object::new();
        for (i, tag) in self.tags.iter().enumerate() {
            tags.push(i.to_string(), Value::String(tag.clone()));
        }
        obj.push("tags", Value::Object(tags));
        obj
    }

    /// Typed view over a stored record. Key lookup is case-insensitive, so
    /// entries written by Steam itself (`Exe`, `AppName`) and by this tool
    /// resolve identically. Missing fields take their defaults.
    pub fn from_object(obj: &Object) -> Self {
        let defaults = Self::default();
        let tags = match obj.get("tags") {
            Some(Value::Object(tags)) => tags
                .iter()
                .filter_map(|(_, v)| match v {
                    Value::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            app_id: obj.get_u32("appid").unwrap_or(defaults.app_id),
            app_name: obj
                .get_str("appname")
                .unwrap_or(&defaults.app_name)
                .to_string(),
            exe: obj.get_str("exe").unwrap_or(&defaults.exe).to_string(),
            start_dir: obj
                .get_str("startdir")
                .unwrap_or(&defaults.start_dir)
                .to_string(),
            icon: obj.get_str("icon").unwrap_or(&defaults.icon).to_string(),
            shortcut_path: obj
                .get_str("shortcutpath")
                .unwrap_or(&defaults.shortcut_path)
                .to_string(),
            launch_options: obj
                .get_str("launchoptions")
                .unwrap_or(&defaults.launch_options)
                .to_string(),
            is_hidden: obj.get_u32("ishidden").unwrap_or(defaults.is_hidden),
            allow_desktop_config: obj
                .get_u32("allowdesktopconfig")
                .unwrap_or(defaults.allow_desktop_config),
            allow_overlay: obj
                .get_u32("allowoverlay")
                .unwrap_or(defaults.allow_overlay),
            open_vr: obj.get_u32("openvr").unwrap_or(defaults.open_vr),
            devkit: obj.get_u32("devkit").unwrap_or(defaults.devkit),
            devkit_game_id: obj
                .get_str("devkitgameid")
                .unwrap_or(&defaults.devkit_game_id)
                .to_string(),
            last_play_time: obj
                .get_u32("lastplaytime")
                .unwrap_or(defaults.last_play_time),
            flatpak_app_id: obj
                .get_str("flatpakappid")
                .unwrap_or(&defaults.flatpak_app_id)
                .to_string(),
            tags,
        }
    }
}

/// Wrap an absolute path in the single quotes the shortcuts format expects.
pub(crate) fn quote_path(path: &Path) -> String {
    format!("'{}'", path.display())
}

/// Builder for shortcut entries.
pub struct ShortcutEntryBuilder {
    entry: ShortcutEntry,
}

impl ShortcutEntryBuilder {
    /// Create a builder with path-derived fields filled in.
    pub fn new(bundle_path: impl AsRef<Path>) -> Self {
        let path = bundle_path.as_ref();
        let start_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        let entry = ShortcutEntry {
            app_id: shortcut_app_id(&path.display().to_string()),
            exe: quote_path(path),
            start_dir: quote_path(&start_dir),
            ..ShortcutEntry::default()
        };
        Self { entry }
    }

    /// Set the display name shown in the Steam library.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.entry.app_name = name.into();
        self
    }

    /// Set the converted icon path.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.entry.icon = icon.into();
        self
    }

    /// Set extra launch options.
    pub fn launch_options(mut self, options: impl Into<String>) -> Self {
        self.entry.launch_options = options.into();
        self
    }

    /// Hide the shortcut from the library view.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.entry.is_hidden = u32::from(hidden);
        self
    }

    /// Set category tags.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.entry.tags = tags;
        self
    }

    /// Build the entry.
    pub fn build(self) -> ShortcutEntry {
        self.entry
    }
}
