//! Steam installation paths.
//!
//! All paths hang off one explicit root value; nothing here is process-wide
//! state. The default root is macOS's
//! `~/Library/Application Support/Steam`, but tests (and unusual installs)
//! can point at any directory.

use crate::config::SteamLayout;
use crate::error::{Result, ShortcutError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths within one Steam installation.
#[derive(Debug, Clone)]
pub struct SteamPaths {
    root: PathBuf,
}

impl SteamPaths {
    /// Wrap an explicit Steam root. No existence checks are performed.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the default Steam installation for the current user.
    ///
    /// Fails with [`ShortcutError::NoSteamUserFound`] when the `userdata`
    /// directory does not exist, since without it there is no account to
    /// write shortcuts for.
    pub fn locate() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            ShortcutError::Other("Could not determine home directory".to_string())
        })?;
        let paths = Self::new(
            home.join("Library")
                .join("Application Support")
                .join("Steam"),
        );
        let userdata = paths.userdata_dir();
        if !userdata.exists() {
            return Err(ShortcutError::NoSteamUserFound {
                message: format!(
                    "Steam userdata directory not found at {}",
                    userdata.display()
                ),
            });
        }
        debug!("Found Steam userdata directory: {}", userdata.display());
        Ok(paths)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn userdata_dir(&self) -> PathBuf {
        self.root.join(SteamLayout::USERDATA_DIR_NAME)
    }

    /// Numeric account ids under `userdata/`, sorted ascending.
    pub fn users(&self) -> Result<Vec<String>> {
        let userdata = self.userdata_dir();
        let reader = fs::read_dir(&userdata).map_err(|_| ShortcutError::NoSteamUserFound {
            message: format!(
                "Steam userdata directory not found at {}",
                userdata.display()
            ),
        })?;

        let mut users: Vec<String> = reader
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
            .collect();

        if users.is_empty() {
            return Err(ShortcutError::NoSteamUserFound {
                message: "No Steam user directories found".to_string(),
            });
        }
        users.sort_by_key(|name| name.parse::<u64>().unwrap_or(u64::MAX));
        Ok(users)
    }

    /// Pick the requested account id, or the first available one.
    pub fn select_user(&self, requested: Option<&str>) -> Result<String> {
        let users = self.users()?;
        match requested {
            Some(id) => {
                if users.iter().any(|u| u == id) {
                    Ok(id.to_string())
                } else {
                    Err(ShortcutError::NoSteamUserFound {
                        message: format!("Steam user ID {id} not found"),
                    })
                }
            }
            None => Ok(users[0].clone()),
        }
    }

    fn user_config_dir(&self, user: &str) -> PathBuf {
        self.userdata_dir()
            .join(user)
            .join(SteamLayout::CONFIG_DIR_NAME)
    }

    /// Path to the user's shortcuts database, creating the containing
    /// `config/` directory when absent. The file itself is not created.
    pub fn shortcuts_file(&self, user: &str) -> Result<PathBuf> {
        let config_dir = self.user_config_dir(user);
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ShortcutError::io_with_path(e, &config_dir))?;
        }
        Ok(config_dir.join(SteamLayout::SHORTCUTS_FILE_NAME))
    }

    /// Grid-art directory for converted shortcut icons.
    pub fn grid_dir(&self, user: &str) -> PathBuf {
        self.user_config_dir(user).join(SteamLayout::GRID_DIR_NAME)
    }

    /// Library cache directory Steam also reads icons from.
    pub fn library_cache_dir(&self, user: &str) -> PathBuf {
        self.user_config_dir(user)
            .join(SteamLayout::LIBRARY_CACHE_DIR_NAME)
    }

    pub fn html_cache_dir(&self) -> PathBuf {
        self.root
            .join(SteamLayout::CONFIG_DIR_NAME)
            .join(SteamLayout::HTML_CACHE_DIR_NAME)
    }

    pub fn app_cache_dir(&self) -> PathBuf {
        self.root.join(SteamLayout::APP_CACHE_DIR_NAME)
    }

    pub fn shader_cache_dir(&self) -> PathBuf {
        self.root.join(SteamLayout::SHADER_CACHE_DIR_NAME)
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(stripped) = path
        .to_str()
        .and_then(|s| s.strip_prefix('~'))
    else {
        return path.to_path_buf();
    };
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };
    match stripped.strip_prefix('/') {
        Some(rest) => home.join(rest),
        None if stripped.is_empty() => home,
        // `~something` is a literal file name, not a home reference.
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn steam_with_users(users: &[&str]) -> (TempDir, SteamPaths) {
        let temp_dir = TempDir::new().unwrap();
        for user in users {
            fs::create_dir_all(temp_dir.path().join("userdata").join(user)).unwrap();
        }
        let paths = SteamPaths::new(temp_dir.path());
        (temp_dir, paths)
    }

    #[test]
    fn test_users_sorted_numerically() {
        let (_tmp, paths) = steam_with_users(&["222", "33", "1111111111"]);
        assert_eq!(paths.users().unwrap(), vec!["33", "222", "1111111111"]);
    }

    #[test]
    fn test_users_ignores_non_numeric_dirs() {
        let (_tmp, paths) = steam_with_users(&["1001"]);
        fs::create_dir_all(paths.userdata_dir().join("ac_persona")).unwrap();
        assert_eq!(paths.users().unwrap(), vec!["1001"]);
    }

    #[test]
    fn test_no_users_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("userdata")).unwrap();
        let paths = SteamPaths::new(temp_dir.path());
        assert!(matches!(
            paths.users(),
            Err(ShortcutError::NoSteamUserFound { .. })
        ));
    }

    #[test]
    fn test_missing_userdata_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SteamPaths::new(temp_dir.path());
        assert!(matches!(
            paths.users(),
            Err(ShortcutError::NoSteamUserFound { .. })
        ));
    }

    #[test]
    fn test_select_user_prefers_request() {
        let (_tmp, paths) = steam_with_users(&["1001", "1002"]);
        assert_eq!(paths.select_user(Some("1002")).unwrap(), "1002");
        assert_eq!(paths.select_user(None).unwrap(), "1001");
        assert!(matches!(
            paths.select_user(Some("9999")),
            Err(ShortcutError::NoSteamUserFound { .. })
        ));
    }

    #[test]
    fn test_shortcuts_file_creates_config_dir() {
        let (_tmp, paths) = steam_with_users(&["1001"]);
        let file = paths.shortcuts_file("1001").unwrap();
        assert!(file.ends_with("userdata/1001/config/shortcuts.vdf"));
        assert!(file.parent().unwrap().is_dir());
        assert!(!file.exists());
    }

    #[test]
    fn test_per_user_dirs() {
        let (_tmp, paths) = steam_with_users(&["1001"]);
        assert!(paths.grid_dir("1001").ends_with("userdata/1001/config/grid"));
        assert!(paths
            .library_cache_dir("1001")
            .ends_with("userdata/1001/config/librarycache"));
        assert!(paths.html_cache_dir().ends_with("config/htmlcache"));
        assert!(paths.shader_cache_dir().ends_with("shadercache"));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(
            expand_tilde(Path::new("/Applications")),
            PathBuf::from("/Applications")
        );
        assert_eq!(
            expand_tilde(Path::new("~notahome/x")),
            PathBuf::from("~notahome/x")
        );
        // Home expansion only applies where a home directory exists.
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~")), home);
            assert_eq!(expand_tilde(Path::new("~/Applications")), home.join("Applications"));
        }
    }
}
