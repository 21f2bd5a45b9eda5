use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Serialize, Deserialize)]
struct FlagFile {
    enabled: bool,
}

/// On/off switch of the daily digest, mirrored to a small JSON file.
/// Every change is written before it becomes visible.
pub struct PinFlag {
    path: PathBuf,
    enabled: Mutex<bool>,
}

impl PinFlag {
    /// Reads the flag file, falling back to `default` when it is missing
    /// or unreadable.
    pub fn load(path: impl Into<PathBuf>, default: bool) -> Self {
        let path = path.into();
        let enabled = match read_flag(&path) {
            Some(enabled) => enabled,
            None => {
                info!(
                    "No usable pin flag at {}, defaulting to {}",
                    path.display(),
                    default
                );
                default
            }
        };
        Self {
            path,
            enabled: Mutex::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flips the flag and returns the new value. If the file cannot be
    /// written the flag keeps its old value.
    pub fn toggle(&self) -> Result<bool> {
        let mut enabled = self.enabled.lock().unwrap_or_else(|e| e.into_inner());
        let next = !*enabled;
        write_flag(&self.path, next)?;
        *enabled = next;
        info!("Daily digest {}", if next { "enabled" } else { "disabled" });
        Ok(next)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_flag(path: &Path) -> Option<bool> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<FlagFile>(&content) {
        Ok(file) => Some(file.enabled),
        Err(e) => {
            warn!("Ignoring corrupt pin flag {}: {}", path.display(), e);
            None
        }
    }
}

fn write_flag(path: &Path, enabled: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(&FlagFile { enabled })?)?;
    Ok(())
}
