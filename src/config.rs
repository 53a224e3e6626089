//! Startup paths. The database lives next to the executable so the desk
//! carries its data with it; logs go to the per-user data directory because
//! the terminal itself belongs to the UI.

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// SQLite file name, fixed so every launch finds the same store.
const DB_FILE_NAME: &str = "library.db";
/// Application name used for the per-user data directory.
const APP_NAME: &str = "library-desk";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolve the default locations for this machine.
    pub fn resolve() -> Self {
        let app_dir = executable_dir().unwrap_or_else(|| PathBuf::from("."));
        let log_dir = ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| app_dir.join("logs"));

        Self {
            db_path: app_dir.join(DB_FILE_NAME),
            log_dir,
        }
    }

    /// Keep both the database and the logs under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            db_path: dir.join(DB_FILE_NAME),
            log_dir: dir.join("logs"),
        }
    }
}

fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}
