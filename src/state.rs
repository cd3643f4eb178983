//! Per-screen workspace state and the policy switches that govern it.

use crate::config::WorkspaceConfig;
use crate::geometry::Margins;
use crate::layout::DesktopLayout;

/// Behaviour switches consulted during navigation and switching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    /// Wrap around grid edges when moving in a direction.
    pub wrap_layout: bool,
    /// Wrap out-of-range workspace numbers when switching directly.
    pub wrap_cycle: bool,
    /// Switching to the current workspace goes back to the previous one.
    pub toggle_workspaces: bool,
    pub click_to_focus: bool,
    pub raise_on_click: bool,
    pub raise_on_focus: bool,
    /// Name of the monitor whose windows follow every switch.
    pub sticky_monitor: Option<String>,
}

impl From<&WorkspaceConfig> for Policy {
    fn from(cfg: &WorkspaceConfig) -> Self {
        Self {
            wrap_layout: cfg.wrap_layout,
            wrap_cycle: cfg.wrap_cycle,
            toggle_workspaces: cfg.toggle_workspaces,
            click_to_focus: cfg.click_to_focus,
            raise_on_click: cfg.raise_on_click,
            raise_on_focus: cfg.raise_on_focus,
            sticky_monitor: cfg.sticky_monitor.clone(),
        }
    }
}

/// Workspace bookkeeping for one screen.
///
/// Invariants: `count >= 1`, `current < count`, and `previous` is the last
/// value `current` held before it changed.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    pub(crate) current: u32,
    pub(crate) previous: u32,
    pub(crate) count: u32,
    pub(crate) names: Vec<String>,
    /// Aggregated reservations, recomputed by the work-area pass.
    pub(crate) margins: Margins,
    /// Externally supplied reservations used as the floor for `margins`.
    pub(crate) base_margins: Margins,
    pub(crate) layout: DesktopLayout,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl WorkspaceState {
    pub fn new(count: u32, width: i32, height: i32) -> Self {
        let count = count.max(1);
        Self {
            current: 0,
            previous: 0,
            count,
            names: Vec::new(),
            margins: Margins::default(),
            base_margins: Margins::default(),
            layout: DesktopLayout::single_row(count),
            width,
            height,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn previous(&self) -> u32 {
        self.previous
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn base_margins(&self) -> Margins {
        self.base_margins
    }

    pub fn layout(&self) -> &DesktopLayout {
        &self.layout
    }

    /// Screen size as `(width, height)`.
    pub fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Text shown in the popup for workspace `n`.
    pub fn label(&self, n: u32) -> String {
        match self.names.get(n as usize) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Workspace {}", n + 1),
        }
    }

    /// Whether `n` names an existing workspace.
    pub fn contains(&self, n: i64) -> bool {
        n >= 0 && n < self.count as i64
    }
}
