//! Commands and types used throughout vdesk.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every request the workspace core accepts,
//! and [`Direction`] / [`MonitorInfo`] / [`ClientId`] provide the
//! supporting data types.
//!
//! Direction strings are parsed leniently ("right", "up-left", "UpLeft").

use crate::geometry::Rect;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction for grid navigation (cardinal and diagonal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// One grid step in this direction as `(Δrow, Δcol)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::UpLeft => write!(f, "up-left"),
            Direction::UpRight => write!(f, "up-right"),
            Direction::DownLeft => write!(f, "down-left"),
            Direction::DownRight => write!(f, "down-right"),
        }
    }
}

/// Parse a direction string (case-insensitive; accepts "right", "up-left", "UpLeft", etc.).
fn parse_direction(s: &str) -> Option<Direction> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "upleft" => Some(Direction::UpLeft),
        "upright" => Some(Direction::UpRight),
        "downleft" => Some(Direction::DownLeft),
        "downright" => Some(Direction::DownRight),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Every request the workspace core accepts.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by [`Workspaces::handle`](crate::switcher::Workspaces::handle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Move one grid cell in the given direction.
    Go(Direction),

    /// Move by an arbitrary grid offset.  Each axis advances at most one
    /// grid width.
    Move { rows: i32, cols: i32 },

    /// Switch to workspace `n` (0-based).
    SwitchTo(u32),

    /// Replace every workspace name.
    SetNames(Vec<String>),

    /// Grow or shrink the workspace set to `n` workspaces.
    SetCount(u32),

    /// Insert a workspace at the given index, shifting later ones up.
    Insert(u32),

    /// Delete the workspace at the given index, shifting later ones down.
    Delete(u32),

    /// Recompute the work area from every client's struts.
    UpdateArea,
}

/// A physical monitor as reported by the monitor provider.
///
/// Fetched fresh for every switch; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorInfo {
    /// Output name (e.g. `"DP-1"`).
    pub name: String,
    #[serde(flatten)]
    pub geometry: Rect,
    #[serde(default)]
    pub primary: bool,
}

/// Opaque handle to a managed client window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub u32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Pick the primary monitor from a monitor list.
pub fn primary_monitor(monitors: &[MonitorInfo]) -> Option<&MonitorInfo> {
    monitors.iter().find(|m| m.primary)
}
