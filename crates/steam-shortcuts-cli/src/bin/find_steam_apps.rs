//! find-steam-apps - List macOS application bundles worth adding to Steam.
//!
//! Scans the usual application directories for `.app` bundles and prints
//! ready-to-paste `steam-shortcuts` command lines.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use steam_shortcuts::expand_tilde;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

/// Bundles nested deeper than this below a search directory are ignored.
const MAX_SEARCH_DEPTH: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "find-steam-apps")]
#[command(about = "Find macOS application bundles (.app) for adding to Steam")]
struct Args {
    /// Optional search term to filter applications
    search_term: Option<String>,

    /// Directories to search for .app bundles
    #[arg(
        long,
        num_args = 1..,
        default_values_os_t = vec![PathBuf::from("/Applications"), PathBuf::from("~/Applications")]
    )]
    search_dirs: Vec<PathBuf>,

    /// Limit the number of results (0 = no limit)
    #[arg(long, default_value_t = 0)]
    limit: usize,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let dir_list = args
        .search_dirs
        .iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Searching for .app bundles in: {dir_list}");
    if let Some(term) = &args.search_term {
        println!("Filtering by: {term}");
    }

    let apps = find_apps(&args.search_dirs, args.search_term.as_deref());
    if apps.is_empty() {
        println!("No matching applications found");
        return Ok(ExitCode::FAILURE);
    }

    let shown = if args.limit > 0 && apps.len() > args.limit {
        println!(
            "\nFound {} applications, showing first {}:\n",
            apps.len(),
            args.limit
        );
        &apps[..args.limit]
    } else {
        println!("\nFound {} applications:\n", apps.len());
        &apps[..]
    };

    for (i, app) in shown.iter().enumerate() {
        println!("{}. {}", i + 1, app.display());
    }

    println!("\nTo add applications to Steam, use the steam-shortcuts command:");
    if shown.len() > 1 {
        let example = shown
            .iter()
            .take(3)
            .map(|app| format!("\"{}\"", app.display()))
            .collect::<Vec<_>>()
            .join(" ");
        println!("steam-shortcuts {example}");
        println!("\nYou can add multiple applications at once!");
    } else {
        println!("steam-shortcuts \"{}\"", shown[0].display());
    }

    println!("\nAdd --clear-cache to ensure icons appear properly in Steam:");
    println!("steam-shortcuts [app paths] --clear-cache");

    Ok(ExitCode::SUCCESS)
}

/// Collect `.app` bundle paths under the search directories, sorted.
///
/// A blank search term matches everything; a non-blank term filters
/// case-insensitively on the full path.
fn find_apps(search_dirs: &[PathBuf], search_term: Option<&str>) -> Vec<PathBuf> {
    let term = search_term
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut apps = Vec::new();
    for search_dir in search_dirs {
        let search_dir = expand_tilde(search_dir);
        if !search_dir.exists() {
            warn!("Directory {} does not exist, skipping", search_dir.display());
            continue;
        }

        let walker = WalkDir::new(&search_dir)
            .max_depth(MAX_SEARCH_DEPTH)
            .into_iter()
            .filter_map(|e| e.ok());
        for entry in walker {
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            let is_app = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("app"));
            if !is_app {
                continue;
            }
            if let Some(term) = &term {
                if !path.to_string_lossy().to_lowercase().contains(term) {
                    continue;
                }
            }
            apps.push(path.to_path_buf());
        }
    }
    apps.sort();
    apps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &std::path::Path) {
        fs::create_dir_all(root.join("Beta.app")).unwrap();
        fs::create_dir_all(root.join("Alpha.app")).unwrap();
        fs::create_dir_all(root.join("Games/Chess.app")).unwrap();
        fs::create_dir_all(root.join("a/b/c/TooDeep.app")).unwrap();
        fs::write(root.join("Alpha.txt"), b"not an app").unwrap();
    }

    #[test]
    fn test_find_apps_sorted_within_depth() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path());

        let apps = find_apps(&[temp_dir.path().to_path_buf()], None);
        let names: Vec<&str> = apps
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alpha.app", "Beta.app", "Chess.app"]);
    }

    #[test]
    fn test_find_apps_filters_by_term() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path());

        let apps = find_apps(&[temp_dir.path().to_path_buf()], Some("chESS"));
        assert_eq!(apps.len(), 1);
        assert!(apps[0].ends_with("Games/Chess.app"));

        // Whitespace-only terms do not filter at all.
        let apps = find_apps(&[temp_dir.path().to_path_buf()], Some("   "));
        assert_eq!(apps.len(), 3);
    }

    #[test]
    fn test_find_apps_skips_missing_dirs() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path());

        let dirs = vec![
            temp_dir.path().join("no-such-dir"),
            temp_dir.path().to_path_buf(),
        ];
        assert_eq!(find_apps(&dirs, None).len(), 3);
    }
}
