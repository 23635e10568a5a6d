//! Environment overrides for WestTek
//!
//! The settings files (see config_file module) are the primary source of
//! configuration. These environment variables can override parts of it:
//!
//! - WESTTEK_CONFIG_DIR: folder holding the settings files
//! - WESTTEK_GAME_PROCESS: watched process name, for every script

use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;

pub const CONFIG_DIR_VAR: &str = "WESTTEK_CONFIG_DIR";
pub const GAME_PROCESS_VAR: &str = "WESTTEK_GAME_PROCESS";

/// Parse the WESTTEK_CONFIG_DIR environment variable
///
/// Returns None if not set or blank
pub fn parse_config_dir() -> Option<PathBuf> {
    match env::var(CONFIG_DIR_VAR) {
        Ok(val) if val.trim().is_empty() => {
            warn!("{} is set but empty. Using default folder.", CONFIG_DIR_VAR);
            None
        }
        Ok(val) => {
            info!("Settings folder set via environment variable: {}", val.trim());
            Some(PathBuf::from(val.trim()))
        }
        Err(_) => {
            debug!("{} not set.", CONFIG_DIR_VAR);
            None
        }
    }
}

/// Parse the WESTTEK_GAME_PROCESS environment variable
///
/// Returns the process name to watch instead of the configured one.
/// Names containing a path separator are rejected since the match is on
/// the bare executable name.
pub fn parse_game_process_override() -> Option<String> {
    match env::var(GAME_PROCESS_VAR) {
        Ok(val) => {
            let name = val.trim();
            if name.is_empty() {
                warn!("{} is set but empty. Ignoring.", GAME_PROCESS_VAR);
                None
            } else if name.contains('/') || name.contains('\\') {
                warn!(
                    "Invalid {}: '{}' (expected an executable name, not a path). Ignoring.",
                    GAME_PROCESS_VAR, name
                );
                None
            } else {
                info!("Game process overridden via environment variable: {}", name);
                Some(name.to_string())
            }
        }
        Err(_) => {
            debug!("{} not set.", GAME_PROCESS_VAR);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both variables are exercised from a single test so parallel test
    // threads never race on the process environment.
    #[test]
    fn test_env_overrides() {
        env::set_var(CONFIG_DIR_VAR, "/tmp/westtek");
        assert_eq!(parse_config_dir(), Some(PathBuf::from("/tmp/westtek")));

        env::set_var(CONFIG_DIR_VAR, "   ");
        assert_eq!(parse_config_dir(), None, "Blank folder should be ignored");

        env::remove_var(CONFIG_DIR_VAR);
        assert_eq!(parse_config_dir(), None);

        env::set_var(GAME_PROCESS_VAR, " Fallout76.exe ");
        assert_eq!(
            parse_game_process_override(),
            Some("Fallout76.exe".to_string()),
            "Name should be trimmed"
        );

        env::set_var(GAME_PROCESS_VAR, "C:\\Games\\Fallout76.exe");
        assert_eq!(
            parse_game_process_override(),
            None,
            "Paths should be rejected"
        );

        env::set_var(GAME_PROCESS_VAR, "");
        assert_eq!(parse_game_process_override(), None);

        env::remove_var(GAME_PROCESS_VAR);
        assert_eq!(parse_game_process_override(), None);
    }
}
