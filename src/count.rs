//! Growing and shrinking the workspace set.
//!
//! Every count change is published as a hint, pulls clients stranded past
//! the last workspace back onto it, and refreshes the work-area hint and the
//! grid layout (both depend on the count).

use crate::switcher::Workspaces;
use crate::traits::{Backend, Notifier};
use log::{debug, warn};

impl<B: Backend, N: Notifier> Workspaces<B, N> {
    /// Set the number of workspaces.  Values below 1 are raised to 1.
    pub fn set_count(&mut self, n: u32) {
        let n = n.max(1);
        if n == self.state.count {
            return;
        }
        debug!("workspace count {} -> {}", self.state.count, n);
        self.state.count = n;

        if let Err(e) = self.backend.publish_desktop_count(n) {
            warn!("failed to publish desktop count: {}", e);
        }

        let last = n - 1;
        for c in self.backend.stack() {
            if self.backend.workspace(c) > last {
                self.backend.set_workspace(c, last, true);
            }
        }

        if self.state.current > last {
            let ts = self.backend.current_time();
            self.switch_to(last as i64, None, true, ts);
        }

        let (w, h) = self.state.screen_size();
        if let Err(e) = self
            .backend
            .publish_work_area(n, w, h, self.state.margins)
        {
            warn!("failed to publish work area: {}", e);
        }
        self.refresh_layout();
    }

    /// Add a workspace at `position`, shifting later workspaces up by one.
    ///
    /// A position past the end appends without moving any client.  Nothing
    /// happens once the count can no longer grow.
    pub fn insert(&mut self, position: u32) {
        let count = self.state.count;
        let Some(grown) = count.checked_add(1) else {
            debug!("cannot insert a workspace past {}", count);
            return;
        };
        self.set_count(grown);
        if position > count {
            return;
        }

        for c in self.backend.stack() {
            let ws = self.backend.workspace(c);
            if ws >= position {
                self.backend.set_workspace(c, ws + 1, true);
            }
        }
    }

    /// Remove the workspace at `position`, shifting later workspaces down.
    ///
    /// Clients on the removed workspace stay on `position`, joining the ones
    /// shifted down from the next workspace.
    pub fn delete(&mut self, position: u32) {
        let count = self.state.count;
        if count < 1 || position > count {
            return;
        }

        for c in self.backend.stack() {
            let ws = self.backend.workspace(c);
            if ws > position {
                self.backend.set_workspace(c, ws - 1, true);
            }
        }

        self.set_count(count - 1);
    }
}
