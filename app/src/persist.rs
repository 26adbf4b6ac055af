//! Remembers where the window was last moved to, so relaunching puts it
//! back. One window, one file, under the temp dir.
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn state_file() -> PathBuf {
    std::env::temp_dir().join("clavier").join("window_position.json")
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn load() -> Option<Self> {
        Self::load_from(&state_file())
    }

    /// Saves the position, logging a warning on failure rather than
    /// returning an error. Losing the position is not worth interrupting
    /// play for.
    pub fn save(self) {
        if let Err(e) = self.save_to(&state_file()) {
            log::warn!("failed to save window position: {}", e);
        }
    }

    fn load_from(path: &Path) -> Option<Self> {
        let json_string = fs::read_to_string(path).ok()?;
        serde_json::from_str(&json_string).ok()
    }

    fn save_to(self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string(&self)?)?;
        Ok(())
    }
}
