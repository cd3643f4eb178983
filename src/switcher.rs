//! The orchestrator that ties workspace state, the client stack and the
//! external collaborators together.
//!
//! [`Workspaces`] owns the [`WorkspaceState`] and reacts to [`Command`]s by
//! navigating the grid, switching workspaces, resizing the workspace set
//! and recomputing the work area.  Workspace-count changes live in
//! [`count`](crate::count), the work-area pass in
//! [`workarea`](crate::workarea).
//!
//! # Switching
//!
//! A switch is one synchronous transition over the whole stacking list in
//! three passes, so that no client is touched before both the old and the
//! new workspace membership of every client is known:
//!
//! 1. **reveal**, top to bottom: sticky clients follow the switch, clients
//!    of the destination are shown;
//! 2. **withdraw**, bottom to top: clients of other workspaces are hidden,
//!    and the focused one remembers it had focus;
//! 3. **elect**, top to bottom: pick the client that gets focus.

use crate::command::{primary_monitor, ClientId, Command, MonitorInfo};
use crate::geometry::{Margins, Rect};
use crate::layout::DesktopLayout;
use crate::navigator;
use crate::state::{Policy, WorkspaceState};
use crate::traits::{Backend, Clients, FocusMode, Layer, Notifier};
use log::{debug, info, trace, warn};

/// Decides whether a client follows every switch.
///
/// A client sticks when it is flagged sticky, or when the first monitor
/// containing it is the configured sticky monitor.
struct StickyRule<'a> {
    monitors: &'a [MonitorInfo],
    sticky_monitor: Option<usize>,
}

impl<'a> StickyRule<'a> {
    fn new(monitors: &'a [MonitorInfo], name: Option<&str>) -> Self {
        let sticky_monitor = name.and_then(|name| monitors.iter().position(|m| m.name == name));
        Self {
            monitors,
            sticky_monitor,
        }
    }

    fn sticks<C: Clients + ?Sized>(&self, clients: &C, c: ClientId) -> bool {
        if clients.flags(c).sticky {
            return true;
        }
        let Some(sticky) = self.sticky_monitor else {
            return false;
        };
        self.monitors
            .iter()
            .position(|m| clients.in_monitor(c, m))
            .is_some_and(|i| i == sticky)
    }
}

/// Whether a transient/modal's visibility on `ws` is handled through its
/// ancestor rather than directly.
fn follows_ancestor<C: Clients + ?Sized>(clients: &C, c: ClientId, ws: u32) -> bool {
    clients.is_transient_or_modal(c) && clients.has_ancestor_on(c, ws)
}

/// Virtual workspace manager for one screen.
///
/// Generic over the display-side [`Backend`] and the popup [`Notifier`], so
/// it runs unchanged against a real display or the in-memory
/// [`SimDisplay`](crate::sim::SimDisplay).
///
/// # Typical usage
///
/// ```ignore
/// let state = WorkspaceState::new(4, 1920, 1080);
/// let mut ws = Workspaces::new(display, notifier, Policy::default(), state);
/// ws.handle(Command::Go(Direction::Right));
/// ```
pub struct Workspaces<B: Backend, N: Notifier> {
    pub(crate) backend: B,
    pub(crate) notifier: N,
    pub(crate) policy: Policy,
    pub(crate) state: WorkspaceState,
}

impl<B: Backend, N: Notifier> Workspaces<B, N> {
    /// Create a manager and fetch the layout for the initial count.
    pub fn new(backend: B, notifier: N, policy: Policy, state: WorkspaceState) -> Self {
        let mut ws = Self {
            backend,
            notifier,
            policy,
            state,
        };
        ws.refresh_layout();
        ws
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Go(dir) => {
                info!("go {}", dir);
                let (drow, dcol) = dir.delta();
                let ts = self.backend.current_time();
                self.move_by(drow, dcol, None, ts);
            }

            Command::Move { rows, cols } => {
                info!("move by ({}, {})", rows, cols);
                let ts = self.backend.current_time();
                self.move_by(rows, cols, None, ts);
            }

            Command::SwitchTo(n) => {
                info!("switch to {}", n);
                let ts = self.backend.current_time();
                self.switch_to(n as i64, None, true, ts);
            }

            Command::SetNames(names) => {
                info!("set {} workspace name(s)", names.len());
                self.set_names(names);
            }

            Command::SetCount(n) => {
                info!("set workspace count to {}", n);
                self.set_count(n);
            }

            Command::Insert(pos) => {
                info!("insert workspace at {}", pos);
                self.insert(pos);
            }

            Command::Delete(pos) => {
                info!("delete workspace at {}", pos);
                self.delete(pos);
            }

            Command::UpdateArea => {
                info!("update work area");
                self.update_work_area();
            }
        }
    }

    /// Replace every workspace name.
    pub fn set_names(&mut self, names: Vec<String>) {
        self.state.names = names;
    }

    /// Set the externally supplied edge reservations that floor the work
    /// area.  Takes effect on the next [`update_work_area`](Self::update_work_area).
    pub fn set_base_margins(&mut self, margins: Margins) {
        self.state.base_margins = margins;
    }

    //  Navigation

    /// Move `(drow, dcol)` cells across the grid, carrying `anchor` along.
    ///
    /// Returns whether the current workspace changed.
    pub fn move_by(
        &mut self,
        drow: i32,
        dcol: i32,
        anchor: Option<ClientId>,
        timestamp: u32,
    ) -> bool {
        let before = self.state.current;
        let layout = self.state.layout;
        let wrap = self.policy.wrap_layout;
        let landing = navigator::land(&layout, before, drow, dcol, wrap);
        trace!("move ({}, {}) from {} lands on {:?}", drow, dcol, before, landing);

        if landing.n == before as i64 {
            return false;
        }

        if self.state.contains(landing.n) {
            self.switch_to(landing.n, anchor, true, timestamp);
        } else if wrap {
            match navigator::overflow_target(&layout, landing, drow, dcol, self.state.count) {
                Some(n) => {
                    debug!("cell {} is unused, falling back to {}", landing.n, n);
                    self.switch_to(n, anchor, true, timestamp);
                }
                None => return false,
            }
        }

        self.state.current != before
    }

    //  Switching

    /// Switch to workspace `target`.
    ///
    /// `anchor` is forced onto the destination (used when a window is
    /// carried along).  With `update_focus` the elected client is focused
    /// afterwards.  Returns whether a switch happened.
    pub fn switch_to(
        &mut self,
        target: i64,
        anchor: Option<ClientId>,
        update_focus: bool,
        timestamp: u32,
    ) -> bool {
        let current = self.state.current as i64;
        let mut target = target;

        if target == current && self.policy.toggle_workspaces {
            target = self.state.previous as i64;
        }
        if target == current {
            return false;
        }

        let count = self.state.count as i64;
        if self.policy.wrap_cycle {
            if target > count - 1 {
                target = 0;
            } else if target < 0 {
                target = count - 1;
            }
        } else if !self.state.contains(target) {
            debug!("workspace {} out of range (have {})", target, count);
            return false;
        }
        if target == current {
            return false;
        }

        self.transition(target as u32, anchor, update_focus, timestamp);
        true
    }

    fn transition(&mut self, ws: u32, anchor: Option<ClientId>, update_focus: bool, timestamp: u32) {
        debug!("workspace {} -> {} at {}", self.state.current, ws, timestamp);
        self.state.previous = self.state.current;
        self.state.current = ws;

        let monitors = self.fetch_monitors();
        let rule = StickyRule::new(&monitors, self.policy.sticky_monitor.as_deref());
        let b = &mut self.backend;

        if let Some(a) = anchor {
            b.set_workspace(a, ws, false);
        }

        let focused = b.focused();
        let previous = focused.filter(|&c| b.is_focusable(c));
        let mut new_focus = anchor.filter(|&a| focused == Some(a));

        let stack = b.stack();

        // Reveal, top to bottom.
        for &c in stack.iter().rev() {
            if rule.sticks(b, c) {
                b.set_workspace(c, ws, true);
            } else if b.workspace(c) == ws {
                let flags = b.flags(c);
                if !flags.iconified && !flags.visible && !follows_ancestor(b, c, ws) {
                    trace!("reveal {}", c);
                    b.show(c);
                }
            }
        }

        // Withdraw, bottom to top.
        for &c in &stack {
            if b.workspace(c) == ws {
                continue;
            }
            if Some(c) == previous {
                b.set_pending_focus(c, true);
                b.set_focus(None, timestamp, FocusMode::IgnoreModal);
            }
            if b.flags(c).visible && !rule.sticks(b, c) && !follows_ancestor(b, c, ws) {
                trace!("withdraw {}", c);
                b.withdraw(c, ws);
            }
        }

        // Elect focus, top to bottom.
        for &c in stack.iter().rev() {
            if rule.sticks(b, c) {
                if new_focus.is_none() && Some(c) == previous && b.accepts_focus(c) {
                    new_focus = Some(c);
                }
                b.set_pending_focus(c, false);
            } else if b.workspace(c) == ws {
                if new_focus.is_none() && b.flags(c).pending_focus {
                    new_focus = Some(c);
                }
                b.set_pending_focus(c, false);
            }
        }

        if let Err(e) = b.publish_current_desktop(ws) {
            warn!("failed to publish current desktop: {}", e);
        }

        if !self.policy.click_to_focus && anchor.is_none() {
            if let Some(c) = b.pointer().and_then(|(x, y)| b.client_at(x, y)) {
                trace!("pointer is over {}", c);
                new_focus = Some(c);
            }
        }

        if update_focus {
            match new_focus {
                Some(c) => {
                    let p = &self.policy;
                    if p.click_to_focus && p.raise_on_click && !p.raise_on_focus && !b.is_topmost(c)
                    {
                        b.raise(c);
                    }
                    b.set_focus(Some(c), timestamp, FocusMode::Sort);
                }
                None => b.focus_top(Layer::Fullscreen, timestamp),
            }
        }

        let anchor_region = self.popup_anchor(&monitors);
        drop(monitors);

        let label = self.state.label(ws);
        self.notifier.notify(&label, anchor_region);
    }

    //  Helpers

    /// Current monitor list; empty when the provider fails.
    pub(crate) fn fetch_monitors(&self) -> Vec<MonitorInfo> {
        match self.backend.monitors() {
            Ok(m) => m,
            Err(e) => {
                warn!("monitor query failed, continuing without monitors: {}", e);
                Vec::new()
            }
        }
    }

    /// The primary monitor's geometry, or the whole screen.
    pub(crate) fn primary_region(&self, monitors: &[MonitorInfo]) -> Rect {
        primary_monitor(monitors)
            .map(|m| m.geometry)
            .unwrap_or_else(|| Rect::new(0, 0, self.state.width, self.state.height))
    }

    fn popup_anchor(&self, monitors: &[MonitorInfo]) -> Rect {
        self.primary_region(monitors)
    }

    /// Fetch the layout for the current count from the layout provider.
    pub(crate) fn refresh_layout(&mut self) {
        let count = self.state.count;
        self.state.layout = match self.backend.layout(count) {
            Ok(layout) => layout,
            Err(e) => {
                warn!("layout query failed, using a single row: {}", e);
                DesktopLayout::single_row(count)
            }
        };
        debug!("layout for {} workspace(s): {:?}", count, self.state.layout);
    }
}

//  Tests

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::command::Direction;
    use crate::layout::LayoutRequest;
    use crate::sim::{Hint, SimClient, SimDisplay};

    /// Notifier double that records every popup request.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) shown: Vec<(String, Rect)>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, text: &str, anchor: Rect) {
            self.shown.push((text.to_string(), anchor));
        }
    }

    pub(crate) type TestWorkspaces = Workspaces<SimDisplay, RecordingNotifier>;

    pub(crate) fn policy() -> Policy {
        Policy {
            wrap_layout: true,
            click_to_focus: true,
            raise_on_click: true,
            ..Default::default()
        }
    }

    pub(crate) fn make(display: SimDisplay, count: u32, policy: Policy) -> TestWorkspaces {
        let (w, h) = display.screen_size();
        Workspaces::new(
            display,
            RecordingNotifier::default(),
            policy,
            WorkspaceState::new(count, w, h),
        )
    }

    fn client(ws: &TestWorkspaces, id: u32) -> &SimClient {
        ws.backend().client(id).expect("client exists")
    }

    /// Visibility rule after a switch, ignoring transient exceptions.
    fn assert_visibility(ws: &TestWorkspaces) {
        let current = ws.state().current();
        for c in ws.backend().clients() {
            let expected = c.flags.sticky || (c.workspace == current && !c.flags.iconified);
            assert_eq!(c.flags.visible, expected, "client {} on {}", c.id, c.workspace);
        }
    }

    //  Guards

    #[test]
    fn switch_to_current_is_noop() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        assert!(!ws.switch_to(0, None, true, 1));
        assert_eq!(ws.state().current(), 0);
        assert!(ws.backend().hints().is_empty());
        assert!(ws.notifier().shown.is_empty());
    }

    #[test]
    fn toggle_returns_to_previous_workspace() {
        let p = Policy {
            toggle_workspaces: true,
            ..policy()
        };
        let mut ws = make(SimDisplay::single(1920, 1080), 4, p);
        ws.switch_to(2, None, true, 1);
        ws.switch_to(3, None, true, 1);
        assert!(ws.switch_to(3, None, true, 1));
        assert_eq!(ws.state().current(), 2);
        assert!(ws.switch_to(2, None, true, 1));
        assert_eq!(ws.state().current(), 3);
    }

    #[test]
    fn toggle_on_fresh_state_is_noop() {
        let p = Policy {
            toggle_workspaces: true,
            ..policy()
        };
        let mut ws = make(SimDisplay::single(1920, 1080), 4, p);
        assert!(!ws.switch_to(0, None, true, 1));
    }

    #[test]
    fn out_of_range_is_rejected_without_cycling() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        assert!(!ws.switch_to(4, None, true, 1));
        assert!(!ws.switch_to(-1, None, true, 1));
        assert_eq!(ws.state().current(), 0);
    }

    #[test]
    fn out_of_range_wraps_with_cycling() {
        let p = Policy {
            wrap_cycle: true,
            ..policy()
        };
        let mut ws = make(SimDisplay::single(1920, 1080), 4, p);
        assert!(ws.switch_to(-1, None, true, 1));
        assert_eq!(ws.state().current(), 3);
        assert!(ws.switch_to(4, None, true, 1));
        assert_eq!(ws.state().current(), 0);
    }

    #[test]
    fn previous_tracks_last_distinct_workspace() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        ws.switch_to(1, None, true, 1);
        ws.switch_to(1, None, true, 1);
        ws.switch_to(3, None, true, 1);
        assert_eq!(ws.state().previous(), 1);
    }

    //  Passes

    #[test]
    fn switch_shows_destination_and_hides_the_rest() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible());
        d.push(SimClient::new(2, 1));
        d.push(SimClient::new(3, 1).iconified());
        d.push(SimClient::new(4, 2));
        d.push(SimClient::new(5, 0).visible().sticky());
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        assert!(!client(&ws, 1).flags.visible);
        assert!(client(&ws, 2).flags.visible);
        assert!(!client(&ws, 3).flags.visible);
        assert!(!client(&ws, 4).flags.visible);
        assert!(client(&ws, 5).flags.visible);
        assert_visibility(&ws);
    }

    #[test]
    fn sticky_clients_follow_every_switch() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible().sticky());
        d.push(SimClient::new(2, 3).sticky());
        let mut ws = make(d, 4, policy());

        for target in [2, 1, 3, 0] {
            ws.switch_to(target, None, true, 1);
            for c in ws.backend().clients() {
                assert_eq!(c.workspace, target as u32);
            }
        }
    }

    #[test]
    fn sticky_monitor_clients_follow_switch() {
        let mons = vec![
            MonitorInfo {
                name: "DP-1".into(),
                geometry: Rect::new(0, 0, 1920, 1080),
                primary: true,
            },
            MonitorInfo {
                name: "HDMI-A-1".into(),
                geometry: Rect::new(1920, 0, 1920, 1080),
                primary: false,
            },
        ];
        let mut d = SimDisplay::new(3840, 1080, mons);
        d.push(SimClient::new(1, 0).visible().at(Rect::new(100, 100, 400, 300)));
        d.push(SimClient::new(2, 0).visible().at(Rect::new(2000, 100, 400, 300)));
        let p = Policy {
            sticky_monitor: Some("HDMI-A-1".into()),
            ..policy()
        };
        let mut ws = make(d, 4, p);

        ws.switch_to(2, None, true, 1);

        assert!(!client(&ws, 1).flags.visible);
        assert!(client(&ws, 2).flags.visible);
        assert_eq!(client(&ws, 2).workspace, 2);
        assert_eq!(client(&ws, 1).workspace, 0);
    }

    #[test]
    fn monitors_are_fetched_fresh_for_every_switch() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        ws.switch_to(1, None, true, 1);

        ws.backend_mut().set_monitors(vec![
            MonitorInfo {
                name: "DP-1".into(),
                geometry: Rect::new(0, 0, 1920, 1080),
                primary: false,
            },
            MonitorInfo {
                name: "DP-2".into(),
                geometry: Rect::new(1920, 0, 2560, 1440),
                primary: true,
            },
        ]);
        ws.switch_to(2, None, true, 1);

        let anchors: Vec<Rect> = ws.notifier().shown.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            anchors,
            vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 2560, 1440)]
        );
    }

        #[test]
    fn unknown_sticky_monitor_is_ignored() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible());
        let p = Policy {
            sticky_monitor: Some("NOPE".into()),
            ..policy()
        };
        let mut ws = make(d, 4, p);
        ws.switch_to(1, None, true, 1);
        assert!(!client(&ws, 1).flags.visible);
    }

    #[test]
    fn monitor_failure_degrades_to_no_sticky_monitor() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible());
        d.fail_monitors(true);
        let p = Policy {
            sticky_monitor: Some("SIM-1".into()),
            ..policy()
        };
        let mut ws = make(d, 4, p);
        assert!(ws.switch_to(1, None, true, 1));
        assert!(!client(&ws, 1).flags.visible);
        // The popup falls back to the whole screen.
        assert_eq!(ws.notifier().shown[0].1, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn transient_with_ancestor_on_destination_is_left_to_its_parent() {
        let mut d = SimDisplay::single(1920, 1080);
        // Parent on 1, dialog for it left behind on 0 but still mapped.
        d.push(SimClient::new(1, 1));
        d.push(SimClient::new(2, 0).visible().transient_for(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        // Not withdrawn: its parent owns it on workspace 1.
        assert!(client(&ws, 2).flags.visible);
        assert!(client(&ws, 1).flags.visible);
    }

    #[test]
    fn transient_is_revealed_through_its_parent() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1));
        d.push(SimClient::new(2, 1).transient_for(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        assert!(client(&ws, 1).flags.visible);
        assert!(client(&ws, 2).flags.visible);
        assert_visibility(&ws);
    }

    #[test]
    fn group_modal_with_leader_on_destination_stays_mapped() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1));
        d.push(SimClient::new(2, 0).visible().group_modal(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        assert!(client(&ws, 1).flags.visible);
        assert!(client(&ws, 2).flags.visible);
    }

    #[test]
    fn group_modal_without_leader_on_destination_is_withdrawn() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible());
        d.push(SimClient::new(2, 0).visible().group_modal(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        assert!(!client(&ws, 1).flags.visible);
        assert!(!client(&ws, 2).flags.visible);
    }

        #[test]
    fn anchor_is_carried_along_without_hard_move() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible());
        d.focus_client(Some(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(2, Some(ClientId(1)), true, 1);

        assert_eq!(client(&ws, 1).workspace, 2);
        assert!(client(&ws, 1).flags.visible);
        assert!(ws.backend().hard_moves().is_empty());
        assert_eq!(ws.backend().focused(), Some(ClientId(1)));
    }

    //  Focus

    #[test]
    fn focus_is_remembered_per_workspace() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible());
        d.push(SimClient::new(2, 0).visible());
        d.push(SimClient::new(3, 1));
        d.focus_client(Some(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);
        assert!(client(&ws, 1).flags.pending_focus);
        // Nothing pending on 1: fall back to the top client there.
        assert_eq!(ws.backend().focused(), Some(ClientId(3)));

        ws.switch_to(0, None, true, 1);
        assert_eq!(ws.backend().focused(), Some(ClientId(1)));
        assert!(!client(&ws, 1).flags.pending_focus);
    }

    #[test]
    fn focused_sticky_client_keeps_focus() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible().sticky());
        d.push(SimClient::new(2, 1));
        d.focus_client(Some(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);
        assert_eq!(ws.backend().focused(), Some(ClientId(1)));
    }

    #[test]
    fn unfocusable_client_is_not_remembered() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible().unfocusable());
        d.focus_client(Some(1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);
        assert!(!client(&ws, 1).flags.pending_focus);
    }

    #[test]
    fn elected_focus_is_raised_under_click_to_focus() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1));
        d.push(SimClient::new(2, 1));
        d.push(SimClient::new(3, 0).visible());
        d.client_mut(1).unwrap().flags.pending_focus = true;
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        assert_eq!(ws.backend().focused(), Some(ClientId(1)));
        assert_eq!(ws.backend().raised(), &[ClientId(1)]);
    }

    #[test]
    fn no_raise_when_raise_on_focus_handles_it() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1));
        d.push(SimClient::new(2, 1));
        d.client_mut(1).unwrap().flags.pending_focus = true;
        let p = Policy {
            raise_on_focus: true,
            ..policy()
        };
        let mut ws = make(d, 4, p);

        ws.switch_to(1, None, true, 1);
        assert!(ws.backend().raised().is_empty());
    }

    #[test]
    fn pointer_decides_focus_without_click_to_focus() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1).at(Rect::new(0, 0, 500, 500)));
        d.push(SimClient::new(2, 1).at(Rect::new(1000, 0, 500, 500)));
        d.client_mut(1).unwrap().flags.pending_focus = true;
        d.set_pointer(Some((1200, 200)));
        let p = Policy {
            click_to_focus: false,
            ..policy()
        };
        let mut ws = make(d, 4, p);

        ws.switch_to(1, None, true, 1);
        assert_eq!(ws.backend().focused(), Some(ClientId(2)));
    }

    #[test]
    fn anchor_suppresses_pointer_focus() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 0).visible().at(Rect::new(0, 0, 500, 500)));
        d.push(SimClient::new(2, 1).at(Rect::new(1000, 0, 500, 500)));
        d.focus_client(Some(1));
        d.set_pointer(Some((1200, 200)));
        let p = Policy {
            click_to_focus: false,
            ..policy()
        };
        let mut ws = make(d, 4, p);

        ws.switch_to(1, Some(ClientId(1)), true, 1);

        // Client 2 is under the pointer, but the carried window keeps focus.
        assert!(client(&ws, 2).flags.visible);
        assert_eq!(ws.backend().focused(), Some(ClientId(1)));
    }

    #[test]
    fn topmost_elected_client_is_not_raised() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1));
        d.push(SimClient::new(2, 1));
        d.client_mut(2).unwrap().flags.pending_focus = true;
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, true, 1);

        assert_eq!(ws.backend().focused(), Some(ClientId(2)));
        assert!(ws.backend().raised().is_empty());
    }

        #[test]
    fn focus_left_alone_without_update_focus() {
        let mut d = SimDisplay::single(1920, 1080);
        d.push(SimClient::new(1, 1));
        let mut ws = make(d, 4, policy());

        ws.switch_to(1, None, false, 1);
        assert_eq!(ws.backend().focused(), None);
    }

    //  Side effects

    #[test]
    fn switch_publishes_current_desktop_and_shows_name() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        ws.set_names(vec!["web".into(), "code".into()]);

        ws.switch_to(1, None, true, 1);
        ws.switch_to(3, None, true, 1);

        assert_eq!(
            ws.backend().hints(),
            &[Hint::CurrentDesktop(1), Hint::CurrentDesktop(3)]
        );
        let labels: Vec<&str> = ws.notifier().shown.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(labels, vec!["code", "Workspace 4"]);
    }

    //  Navigation

    #[test]
    fn move_zero_never_changes_workspace() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        for target in 0..4 {
            ws.switch_to(target, None, true, 1);
            let before = ws.state().current();
            assert!(!ws.move_by(0, 0, None, 1));
            assert_eq!(ws.state().current(), before);
        }
    }

    #[test]
    fn move_right_from_last_wraps_in_single_row() {
        let mut ws = make(SimDisplay::single(1920, 1080), 4, policy());
        ws.switch_to(3, None, true, 1);
        assert!(ws.move_by(0, 1, None, 1));
        assert_eq!(ws.state().current(), 0);
    }

    #[test]
    fn move_right_from_last_is_noop_without_wrap() {
        let p = Policy {
            wrap_layout: false,
            ..policy()
        };
        let mut ws = make(SimDisplay::single(1920, 1080), 4, p);
        ws.switch_to(3, None, true, 1);
        assert!(!ws.move_by(0, 1, None, 1));
        assert_eq!(ws.state().current(), 3);
    }

    fn grid_of_five(p: Policy) -> TestWorkspaces {
        // 5 workspaces in a 2x3 grid; cell (1, 2) is unused.
        let mut d = SimDisplay::single(1920, 1080);
        d.set_layout_request(LayoutRequest {
            cols: 3,
            ..Default::default()
        });
        make(d, 5, p)
    }

    #[test]
    fn moving_into_unused_cell_falls_back() {
        let mut ws = grid_of_five(policy());
        assert_eq!((ws.state().layout().rows, ws.state().layout().cols), (2, 3));

        // Right from 4 lands on the empty cell; restart the row.
        ws.switch_to(4, None, true, 1);
        assert!(ws.move_by(0, 1, None, 1));
        assert_eq!(ws.state().current(), 3);

        // Down from 2 lands on the empty cell; restarting the column comes
        // back to 2 itself.
        ws.switch_to(2, None, true, 1);
        assert!(!ws.move_by(1, 0, None, 1));
        assert_eq!(ws.state().current(), 2);
    }

    #[test]
    fn moving_down_into_unused_cell_restarts_column() {
        // 5 workspaces in 3x2; cell (2, 1) is unused.
        let mut d = SimDisplay::single(1920, 1080);
        d.set_layout_request(LayoutRequest {
            cols: 2,
            ..Default::default()
        });
        let mut ws = make(d, 5, policy());
        ws.switch_to(3, None, true, 1);
        assert!(ws.move_by(1, 0, None, 1));
        assert_eq!(ws.state().current(), 1);
    }

    #[test]
    fn moving_left_into_unused_cell_goes_to_last() {
        let mut ws = grid_of_five(policy());
        // Left from 3 wraps to column 2 of row 1, which is unused.
        ws.switch_to(3, None, true, 1);
        assert!(ws.move_by(0, -1, None, 1));
        assert_eq!(ws.state().current(), 4);
    }

    #[test]
    fn unused_cell_without_wrap_is_noop() {
        let p = Policy {
            wrap_layout: false,
            ..policy()
        };
        let mut ws = grid_of_five(p);
        ws.switch_to(2, None, true, 1);
        assert!(!ws.move_by(1, 0, None, 1));
        assert_eq!(ws.state().current(), 2);
    }

    #[test]
    fn go_command_uses_direction_delta() {
        let mut d = SimDisplay::single(1920, 1080);
        d.set_layout_request(LayoutRequest {
            rows: 2,
            cols: 2,
            ..Default::default()
        });
        let mut ws = make(d, 4, policy());
        ws.handle(Command::Go(Direction::Down));
        assert_eq!(ws.state().current(), 2);
        ws.handle(Command::Go(Direction::UpRight));
        assert_eq!(ws.state().current(), 1);
    }

    #[test]
    fn layout_failure_falls_back_to_single_row() {
        let mut d = SimDisplay::single(1920, 1080);
        d.fail_layout(true);
        let ws = make(d, 3, policy());
        assert_eq!(*ws.state().layout(), DesktopLayout::single_row(3));
    }
}
