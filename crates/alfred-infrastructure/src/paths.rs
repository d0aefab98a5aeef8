//! Default filesystem locations.
//!
//! Configuration lives under the platform config directory, mutable state
//! (sessions, the learned-intent overlay) under the platform data
//! directory. Both can be overridden by CLI flags.

use alfred_core::error::{AlfredError, Result};
use std::path::PathBuf;

pub struct AlfredPaths;

impl AlfredPaths {
    /// `~/.config/alfred` (or the platform equivalent).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("alfred"))
            .ok_or_else(|| AlfredError::config("cannot determine config directory"))
    }

    /// The engine configuration file, `alfred.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("alfred.toml"))
    }

    /// `~/.local/share/alfred` (or the platform equivalent).
    pub fn state_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("alfred"))
            .ok_or_else(|| AlfredError::config("cannot determine data directory"))
    }

    /// Where per-user session files live.
    pub fn sessions_dir() -> Result<PathBuf> {
        Ok(Self::state_dir()?.join("sessions"))
    }

    /// The learned-intent overlay file.
    pub fn learned_intents_file() -> Result<PathBuf> {
        Ok(Self::state_dir()?.join("learned_intents.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_nest_under_app_dirs() {
        // dirs resolves on every supported platform in CI
        let sessions = AlfredPaths::sessions_dir().unwrap();
        assert!(sessions.ends_with("alfred/sessions"));
        let overlay = AlfredPaths::learned_intents_file().unwrap();
        assert!(overlay.ends_with("alfred/learned_intents.json"));
    }
}
