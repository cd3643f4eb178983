//! Directional navigation across the workspace grid.
//!
//! Moving happens in two layers.  [`step_axis`] wraps or clamps each axis
//! inside the grid; when the resulting cell is one of the unused trailing
//! cells (`rows * cols > count`), [`overflow_target`] picks a real
//! workspace to land on instead.

use crate::layout::DesktopLayout;

/// Advance `value` by `by` along an axis of length `limit`.
///
/// A single step never travels more than one grid width.  With `wrap`
/// the result wraps around, otherwise it is clamped to `[0, limit)`.
pub fn step_axis(value: i64, by: i64, limit: i64, wrap: bool) -> i64 {
    let limit = limit.max(1);
    let by = by.clamp(-(limit - 1), limit - 1);
    let value = value + by;
    if value >= limit {
        if wrap {
            value % limit
        } else {
            limit - 1
        }
    } else if value < 0 {
        if wrap {
            (value + limit) % limit
        } else {
            0
        }
    } else {
        value
    }
}

/// Where a move lands before range checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub row: i64,
    pub col: i64,
    /// Workspace number of `(row, col)`; may be past the last workspace.
    pub n: i64,
}

/// Compute the cell a `(Δrow, Δcol)` move from workspace `current` lands on.
pub fn land(layout: &DesktopLayout, current: u32, drow: i32, dcol: i32, wrap: bool) -> Landing {
    let (row, col) = layout.position_of(current);
    let row = step_axis(row, drow as i64, layout.rows as i64, wrap);
    let col = step_axis(col, dcol as i64, layout.cols as i64, wrap);
    Landing {
        row,
        col,
        n: layout.number_of(row, col),
    }
}

/// Resolve a landing in an unused cell to a workspace to switch to.
///
/// Moving left falls back to the last workspace; moving right restarts the
/// row at column 0; moving down restarts the column at row 0; moving up
/// steps one more row up.  A move with no direction has no fallback.
pub fn overflow_target(
    layout: &DesktopLayout,
    landing: Landing,
    drow: i32,
    dcol: i32,
    count: u32,
) -> Option<i64> {
    let Landing { mut row, mut col, .. } = landing;
    if dcol < 0 {
        return Some(count as i64 - 1);
    }
    if dcol > 0 {
        col = 0;
    } else if drow > 0 {
        row = 0;
    } else if drow < 0 {
        row -= 1;
    } else {
        return None;
    }
    Some(layout.number_of(row, col))
}
