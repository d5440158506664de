use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory name searched under the working directory for dataset files.
pub const LOCAL_DATA_DIR: &str = "data";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber, writing to stderr.
///
/// `log_level` takes the CLI spelling (`DEBUG`, `INFO`, `WARNING`, `ERROR`)
/// and falls back to `"warn"` when unrecognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .init();

    Ok(())
}

fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Pick the directory datasets are discovered in.
///
/// In order: the explicit `--data-dir`, `./data` under `cwd` when present,
/// then `~/.placement-dashboard/data`.
pub fn resolve_data_dir(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    let local = cwd.join(LOCAL_DATA_DIR);
    if local.is_dir() {
        return local;
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".placement-dashboard")
        .join(LOCAL_DATA_DIR)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_directive_maps_cli_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
    }

    #[test]
    fn test_resolve_data_dir_prefers_explicit() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(tmp.path().join("data")).expect("create data dir");
        let explicit = tmp.path().join("elsewhere");

        let dir = resolve_data_dir(Some(&explicit), tmp.path());
        assert_eq!(dir, explicit);
    }

    #[test]
    fn test_resolve_data_dir_uses_local_data() {
        let tmp = TempDir::new().expect("tempdir");
        let local = tmp.path().join("data");
        std::fs::create_dir_all(&local).expect("create data dir");

        assert_eq!(resolve_data_dir(None, tmp.path()), local);
    }

    #[test]
    fn test_resolve_data_dir_falls_back_to_home() {
        let tmp = TempDir::new().expect("tempdir");

        let dir = resolve_data_dir(None, tmp.path());
        assert!(dir.ends_with(".placement-dashboard/data"));
    }
}
