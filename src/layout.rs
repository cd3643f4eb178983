//! Desktop layout: mapping a linear workspace index onto a 2-D grid.
//!
//! A [`DesktopLayout`] describes a `rows × cols` grid, the axis along which
//! workspaces are numbered ([`Orientation`]) and the corner workspace `0`
//! sits in ([`Corner`]).  The grid may contain more cells than there are
//! workspaces; trailing cells are simply unused.
//!
//! The pager-facing side of layouts lives in [`LayoutRequest`], which turns
//! a possibly incomplete request (`0` rows or columns meaning "pick for
//! me") into a concrete layout for a given workspace count.

use serde::{Deserialize, Serialize};

/// Axis along which consecutive workspace numbers advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Numbers run along a row first (row-major).
    #[default]
    Horizontal,
    /// Numbers run down a column first (column-major).
    Vertical,
}

/// Corner holding workspace `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// A concrete workspace grid.
///
/// Invariant: `rows * cols >= workspace_count` for the count it was built
/// for.  Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopLayout {
    pub rows: u32,
    pub cols: u32,
    pub orientation: Orientation,
    pub start: Corner,
}

impl DesktopLayout {
    /// One row holding `count` workspaces, numbered left to right.
    pub fn single_row(count: u32) -> Self {
        Self {
            rows: 1,
            cols: count.max(1),
            orientation: Orientation::Horizontal,
            start: Corner::TopLeft,
        }
    }

    /// `(major, minor)` axis lengths: the axis numbers run along first, then
    /// the other one.
    fn axes(&self) -> (i64, i64) {
        match self.orientation {
            Orientation::Horizontal => (self.cols as i64, self.rows as i64),
            Orientation::Vertical => (self.rows as i64, self.cols as i64),
        }
    }

    /// Grid position `(row, col)` of workspace `n`.
    pub fn position_of(&self, n: u32) -> (i64, i64) {
        let (major, minor) = self.axes();
        let n = n as i64;
        let mut row = n / major;
        let mut col = n % major;

        match self.start {
            Corner::TopLeft => {}
            Corner::TopRight => col = major - col - 1,
            Corner::BottomLeft => row = minor - row - 1,
            Corner::BottomRight => {
                col = major - col - 1;
                row = minor - row - 1;
            }
        }

        if self.orientation == Orientation::Vertical {
            std::mem::swap(&mut row, &mut col);
            // Mirrors against the raw grid dimensions, not major/minor.
            if matches!(self.start, Corner::TopRight | Corner::BottomLeft) {
                row = self.rows as i64 - row - 1;
                col = self.cols as i64 - col - 1;
            }
        }

        (row, col)
    }

    /// Workspace number at grid position `(row, col)`; the inverse of
    /// [`position_of`](Self::position_of).
    ///
    /// The result is not range-checked: positions in unused trailing cells
    /// yield numbers `>= workspace_count`.
    pub fn number_of(&self, row: i64, col: i64) -> i64 {
        let (major, minor) = self.axes();
        let (mut row, mut col) = (row, col);

        if self.orientation == Orientation::Vertical {
            std::mem::swap(&mut row, &mut col);
            if matches!(self.start, Corner::TopRight | Corner::BottomLeft) {
                row = minor - row - 1;
                col = major - col - 1;
            }
        }

        match self.start {
            Corner::TopLeft => {}
            Corner::TopRight => col = major - col - 1,
            Corner::BottomLeft => row = minor - row - 1,
            Corner::BottomRight => {
                col = major - col - 1;
                row = minor - row - 1;
            }
        }

        row * major + col
    }
}

/// A layout as requested by a pager, before it is fitted to a workspace
/// count.  `0` in `rows` or `cols` means "derive from the other one".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRequest {
    pub orientation: Orientation,
    pub rows: u32,
    pub cols: u32,
    pub start: Corner,
}

impl LayoutRequest {
    /// Fit the request to `count` workspaces.
    ///
    /// With both dimensions unset the result is a single row.  When the
    /// requested grid is too small, the axis numbering does not run along
    /// (the minor axis) grows until every workspace has a cell.
    pub fn resolve(&self, count: u32) -> DesktopLayout {
        let count = count.max(1);
        let (mut rows, mut cols) = match (self.rows, self.cols) {
            (0, 0) => (1, count),
            (0, c) => (count.div_ceil(c), c),
            (r, 0) => (r, count.div_ceil(r)),
            (r, c) => (r, c),
        };

        if rows.saturating_mul(cols) < count {
            match self.orientation {
                Orientation::Horizontal => rows = count.div_ceil(cols),
                Orientation::Vertical => cols = count.div_ceil(rows),
            }
        }

        DesktopLayout {
            rows,
            cols,
            orientation: self.orientation,
            start: self.start,
        }
    }
}
