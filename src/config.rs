//! Application configuration.
//!
//! The configuration is loaded from a JSON file
//! (`$XDG_CONFIG_HOME/vdesk/config.json`).  Every section is optional and
//! falls back to its compiled-in defaults; unknown keys are ignored.
//!
//! # Example
//!
//! ```json
//! {
//!   "workspaces": {
//!     "count": 6,
//!     "names": ["web", "code", "mail"],
//!     "wrap_layout": true,
//!     "toggle_workspaces": true,
//!     "sticky_monitor": "HDMI-A-1"
//!   },
//!   "notifier": { "fade_delay_ms": 30, "steps": 10 },
//!   "screen": {
//!     "width": 3840,
//!     "height": 1080,
//!     "monitors": [
//!       { "name": "DP-1", "x": 0, "y": 0, "width": 1920, "height": 1080, "primary": true },
//!       { "name": "HDMI-A-1", "x": 1920, "y": 0, "width": 1920, "height": 1080 }
//!     ]
//!   }
//! }
//! ```

use crate::command::MonitorInfo;
use crate::geometry::Rect;
use crate::layout::LayoutRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workspace count, names and switching policy.
    #[serde(default)]
    pub workspaces: WorkspaceConfig,

    /// Workspace-name popup timing.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Screen and monitors for the headless backend.
    #[serde(default)]
    pub screen: ScreenConfig,
}

/// Workspace count, names and switching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Initial number of workspaces.
    pub count: u32,
    /// Initial workspace names; missing entries show as "Workspace N".
    pub names: Vec<String>,
    /// Wrap around grid edges when moving in a direction.
    pub wrap_layout: bool,
    /// Wrap out-of-range workspace numbers when switching directly.
    pub wrap_cycle: bool,
    /// Switching to the current workspace returns to the previous one.
    pub toggle_workspaces: bool,
    pub click_to_focus: bool,
    pub raise_on_click: bool,
    pub raise_on_focus: bool,
    /// Windows on this monitor follow every switch.
    pub sticky_monitor: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            count: 4,
            names: Vec::new(),
            wrap_layout: true,
            wrap_cycle: false,
            toggle_workspaces: false,
            click_to_focus: true,
            raise_on_click: true,
            raise_on_focus: false,
            sticky_monitor: None,
        }
    }
}

/// Workspace-name popup timing.
///
/// All durations are in **milliseconds**.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Interval between fade frames.
    pub fade_delay_ms: u64,
    /// How long the popup stays before fading.
    pub linger_ms: u64,
    /// Number of fade frames.
    pub steps: u32,
    /// Extra time before a stalled fade is torn down regardless.
    pub grace_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            fade_delay_ms: 30,
            linger_ms: 400,
            steps: 10,
            grace_ms: 2000,
        }
    }
}

impl NotifierConfig {
    /// Largest accepted number of fade frames.
    pub const MAX_STEPS: u32 = 255;
    /// Largest accepted duration, for every timing field.
    pub const MAX_DELAY_MS: u64 = 60_000;

    /// The same configuration with every field brought into a usable range.
    pub fn clamped(&self) -> Self {
        Self {
            fade_delay_ms: self.fade_delay_ms.clamp(1, Self::MAX_DELAY_MS),
            linger_ms: self.linger_ms.min(Self::MAX_DELAY_MS),
            steps: self.steps.clamp(1, Self::MAX_STEPS),
            grace_ms: self.grace_ms.min(Self::MAX_DELAY_MS),
        }
    }
}

/// Screen description for the headless backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    /// Monitors; empty means one primary monitor covering the screen.
    pub monitors: Vec<MonitorInfo>,
    /// Desktop layout requested by the pager.
    pub layout: LayoutRequest,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            monitors: Vec::new(),
            layout: LayoutRequest::default(),
        }
    }
}

impl ScreenConfig {
    /// Configured monitors, or a single primary one covering the screen.
    pub fn monitors_or_default(&self) -> Vec<MonitorInfo> {
        if !self.monitors.is_empty() {
            return self.monitors.clone();
        }
        vec![MonitorInfo {
            name: "SIM-1".into(),
            geometry: Rect::new(0, 0, self.width, self.height),
            primary: true,
        }]
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
