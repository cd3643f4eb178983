//! Screen geometry shared by the work-area aggregator, the monitor provider
//! and the workspace-name popup.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// An axis-aligned rectangle in root-window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// One past the rightmost column, saturating at `i32::MAX`.
    fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// One past the bottom row, saturating at `i32::MAX`.
    fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the point `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Centre point, rounded towards the origin.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// The overlapping region, or `None` when the rectangles do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        let r = Rect::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1));
        (!r.is_empty()).then_some(r)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }
}

/// One edge of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

/// Reserved pixels per screen edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Margins {
    pub const fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

impl Index<Side> for Margins {
    type Output = i32;

    fn index(&self, side: Side) -> &i32 {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl IndexMut<Side> for Margins {
    fn index_mut(&mut self, side: Side) -> &mut i32 {
        match side {
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Inclusive pixel range along the edge a strut is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: i32,
    pub end: i32,
}

impl Span {
    /// Number of pixels covered; zero or negative when `end < start`.
    pub fn length(&self) -> i32 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }
}

/// A client's screen-edge reservation, `_NET_WM_STRUT_PARTIAL` style.
///
/// `reserve` holds the thickness per edge; the spans restrict each
/// reservation to a stretch of that edge (left/right spans run along y,
/// top/bottom spans along x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Struts {
    pub reserve: Margins,
    pub left: Span,
    pub right: Span,
    pub top: Span,
    pub bottom: Span,
}

/// The four per-edge rectangles a [`Struts`] covers on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrutRects {
    pub top: Rect,
    pub bottom: Rect,
    pub left: Rect,
    pub right: Rect,
}

impl StrutRects {
    pub fn get(&self, side: Side) -> Rect {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

impl Struts {
    /// A strut spanning the whole of each edge of a `width × height` screen.
    pub fn full(reserve: Margins, width: i32, height: i32) -> Self {
        let along_y = Span {
            start: 0,
            end: height - 1,
        };
        let along_x = Span {
            start: 0,
            end: width - 1,
        };
        Self {
            reserve,
            left: along_y,
            right: along_y,
            top: along_x,
            bottom: along_x,
        }
    }

    /// Whether any edge reserves space at all.
    pub fn is_set(&self) -> bool {
        Side::ALL.iter().any(|&s| self.reserve[s] > 0)
    }

    /// Convert to on-screen rectangles for a `width × height` root window.
    ///
    /// Values come straight from clients: a reversed span yields an empty
    /// rectangle and out-of-range values saturate instead of wrapping.
    pub fn to_rects(&self, width: i32, height: i32) -> StrutRects {
        let r = &self.reserve;
        StrutRects {
            left: Rect::new(0, self.left.start, r.left, self.left.length()),
            right: Rect::new(
                width.saturating_sub(r.right),
                self.right.start,
                r.right,
                self.right.length(),
            ),
            top: Rect::new(self.top.start, 0, self.top.length(), r.top),
            bottom: Rect::new(
                self.bottom.start,
                height.saturating_sub(r.bottom),
                self.bottom.length(),
                r.bottom,
            ),
        }
    }
}
