//! Binary entry point that glues the SQLite-backed repository to the TUI:
//! resolve paths, start file logging, make sure the schema exists, and drive
//! the Ratatui event loop until the user exits.
use anyhow::Context;
use library_desk::{logging, run_app, App, AppConfig, SqliteRepository};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::resolve();
    let _log_guard = logging::init(&config.log_dir)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        db = %config.db_path.display(),
        "starting library desk"
    );

    let repo = SqliteRepository::open(&config.db_path).with_context(|| {
        format!(
            "failed to prepare the library database at {}",
            config.db_path.display()
        )
    })?;

    tracing::info!(db = %repo.path().display(), "schema ready");

    let mut app = App::new(repo);
    let result = run_app(&mut app);
    tracing::info!("library desk closed");
    result
}
