use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "OathplateCalc";
const APP_NAME: &str = "oathplate-calc";
const LOG_FILENAME: &str = "oathplate-calc.log";

/// Where logs go when nothing overrides it. The dashboard owns the terminal,
/// so logging to stdout is not an option.
pub fn default_log_dir() -> PathBuf {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Installs the global subscriber, appending to `<log_dir>/oathplate-calc.log`.
/// `RUST_LOG` wins over `log_level` when set.
pub fn init(log_dir: &Path, log_level: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILENAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("oathplate_calc={log_level},reqwest=warn").into());

    // A second init (tests, repeated runs in one process) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(path)
}
