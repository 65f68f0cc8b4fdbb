use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default settings file name, resolved relative to the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Images directory used when the settings file does not name one.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Release-probe cadence used when the settings file does not name one.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Shortest accepted probe cadence. Anything faster just burns cycles
/// re-registering the chord.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Directory scanned for overlay images. Defaults to `images` next to
    /// the working directory.
    #[serde(default)]
    pub images_dir: Option<String>,
    /// Interval in milliseconds between release probes while the chord is
    /// held. Defaults to 100.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    /// Sort the scanned images lexicographically by path instead of relying
    /// on directory-listing order.
    #[serde(default)]
    pub sort_images: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            images_dir: None,
            poll_interval_ms: None,
            sort_images: false,
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(
            self.images_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGES_DIR.to_string()),
        )
    }

    pub fn poll_interval(&self) -> Duration {
        let ms = self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if ms < MIN_POLL_INTERVAL_MS {
            tracing::warn!(
                requested = ms,
                floor = MIN_POLL_INTERVAL_MS,
                "poll_interval_ms below floor; clamping"
            );
        }
        Duration::from_millis(ms.max(MIN_POLL_INTERVAL_MS))
    }
}
