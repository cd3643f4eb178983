//! Work-area aggregation: folding every client's screen-edge reservation
//! into one set of margins.

use crate::geometry::{Rect, Side};
use crate::switcher::Workspaces;
use crate::traits::{Backend, Notifier};
use log::{debug, trace, warn};

/// Whether a strut rectangle on `side` is plausible for the `primary`
/// region: non-empty, and no thicker than half the region along the axis it
/// reserves.
pub fn valid_strut(rect: Rect, primary: Rect, side: Side) -> bool {
    if rect.is_empty() {
        return false;
    }
    match side {
        Side::Top | Side::Bottom => rect.height <= primary.height / 2,
        Side::Left | Side::Right => rect.width <= primary.width / 2,
    }
}

impl<B: Backend, N: Notifier> Workspaces<B, N> {
    /// Recompute the margins from the base margins and every client's struts.
    ///
    /// Publishes the work area and re-fits clients only when a margin
    /// changed.
    pub fn update_work_area(&mut self) {
        let before = self.state.margins;
        let mut margins = self.state.base_margins;

        let monitors = self.fetch_monitors();
        let primary = self.primary_region(&monitors);
        let (w, h) = self.state.screen_size();

        for c in self.backend.stack() {
            let Some(struts) = self.backend.struts(c) else {
                continue;
            };
            if !struts.is_set() {
                continue;
            }
            let rects = struts.to_rects(w, h);
            for side in Side::ALL {
                let rect = rects.get(side);
                if valid_strut(rect, primary, side) && rect.intersects(&primary) {
                    margins[side] = margins[side].max(struts.reserve[side]);
                } else if struts.reserve[side] > 0 {
                    trace!("{} strut of {} ignored: {:?}", side_name(side), c, rect);
                }
            }
        }

        self.state.margins = margins;
        if margins == before {
            return;
        }

        debug!("work area margins {:?} -> {:?}", before, margins);
        if let Err(e) = self
            .backend
            .publish_work_area(self.state.count, w, h, margins)
        {
            warn!("failed to publish work area: {}", e);
        }
        self.backend.resize_for_work_area();
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Top => "top",
        Side::Bottom => "bottom",
        Side::Left => "left",
        Side::Right => "right",
    }
}
