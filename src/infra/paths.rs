// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the RAGEVAL_HOME environment variable for isolation.
// When RAGEVAL_HOME is set, config and data live under that directory.
// When unset, config uses ~/.rageval/ and data uses XDG_DATA_HOME/rageval.

use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<Option<ProjectDirs>> = OnceLock::new();

fn project_dirs() -> Option<&'static ProjectDirs> {
    PROJECT_DIRS
        .get_or_init(|| ProjectDirs::from("", "", "rageval"))
        .as_ref()
}

/// Returns the RAGEVAL_HOME override, if set.
fn rageval_home() -> Option<PathBuf> {
    std::env::var_os("RAGEVAL_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when none can be determined.
fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $RAGEVAL_HOME/ or ~/.rageval/
pub fn config_dir() -> PathBuf {
    if let Some(home) = rageval_home() {
        return home;
    }
    dirs_home().join(".rageval")
}

/// Data directory: $RAGEVAL_HOME/data/ or ~/.local/share/rageval/
pub fn data_dir() -> PathBuf {
    if let Some(home) = rageval_home() {
        return home.join("data");
    }
    match project_dirs() {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => config_dir().join("data"),
    }
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Conversation logs directory
pub fn dialogues_dir() -> PathBuf {
    data_dir().join("dialogues")
}

/// Resolve a log location given on the command line.
///
/// A bare file name lands in [`dialogues_dir`]; anything with a directory
/// component is used as given.
pub fn resolve_log_path(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    let has_parent = path
        .parent()
        .map(|p| !p.as_os_str().is_empty())
        .unwrap_or(false);
    if path.is_absolute() || has_parent {
        path.to_path_buf()
    } else {
        dialogues_dir().join(path)
    }
}

/// Ensure the directory holding `path` exists.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
