//! Centralized configuration constants.

/// Directory and file names inside a Steam installation.
pub struct SteamLayout;

impl SteamLayout {
    pub const USERDATA_DIR_NAME: &'static str = "userdata";
    pub const CONFIG_DIR_NAME: &'static str = "config";
    pub const SHORTCUTS_FILE_NAME: &'static str = "shortcuts.vdf";
    pub const GRID_DIR_NAME: &'static str = "grid";
    pub const LIBRARY_CACHE_DIR_NAME: &'static str = "librarycache";
    pub const HTML_CACHE_DIR_NAME: &'static str = "htmlcache";
    pub const APP_CACHE_DIR_NAME: &'static str = "appcache";
    pub const SHADER_CACHE_DIR_NAME: &'static str = "shadercache";
}

/// Icon conversion parameters.
pub struct IconConfig;

impl IconConfig {
    /// Default edge length of the generated PNG in pixels.
    pub const DEFAULT_SIZE: u32 = 128;
}
