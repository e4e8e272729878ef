//! Where mapsketch keeps `config.json` and its log files.
//!
//! Debug builds and `cargo run` use the working directory. Release builds use
//! the platform config directory for the config file and the data directory
//! for logs, each under a `mapsketch` folder.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "mapsketch";

fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Resolve an app directory under a platform base, or `.` in dev mode
fn app_dir(platform_base: impl FnOnce() -> Option<PathBuf>) -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }
    platform_base().map(|base| base.join(APP_DIR_NAME))
}

fn config_dir() -> Option<PathBuf> {
    app_dir(dirs::config_dir)
}

fn data_dir() -> Option<PathBuf> {
    app_dir(dirs::data_dir)
}

pub fn config_file() -> PathBuf {
    config_dir()
        .map(|dir| dir.join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Create the config directory so defaults can be written on first run
pub fn ensure_config_dir() -> std::io::Result<()> {
    match config_dir() {
        Some(dir) => std::fs::create_dir_all(dir),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_build_uses_working_directory() {
        assert_eq!(config_file(), PathBuf::from("./config.json"));
        assert_eq!(logs_dir(), PathBuf::from("./logs"));
    }

    #[test]
    fn test_dev_mode_ignores_platform_base() {
        let dir = app_dir(|| Some(PathBuf::from("/base")));
        // Tests always run in dev mode
        assert_eq!(dir, Some(PathBuf::from(".")));
        assert!(ensure_config_dir().is_ok());
    }
}
