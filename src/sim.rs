//! Headless in-memory backend.
//!
//! [`SimDisplay`] implements every backend trait without a display server:
//! it keeps a stacking list of [`SimClient`]s, a fixed monitor list, the
//! pager's layout request, and a log of every hint published.  The daemon
//! runs on it when no real display is attached, and the test-suite uses it
//! to observe what a switch did to each client.
//!
//! [`LogSurface`] is the matching popup surface: it "draws" by logging.

use crate::command::{ClientId, MonitorInfo};
use crate::geometry::{Margins, Rect, Struts};
use crate::layout::{DesktopLayout, LayoutRequest};
use crate::notifier::{Image, OsdError, OsdSurface};
use crate::traits::{
    BackendError, ClientFlags, Clients, FocusMode, HintSink, Layer, LayoutProvider,
    MonitorProvider,
};
use log::{debug, trace, warn};

/// A hint published through [`HintSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    CurrentDesktop(u32),
    WorkArea {
        count: u32,
        width: i32,
        height: i32,
        margins: Margins,
    },
    DesktopCount(u32),
}

/// A simulated client window.
#[derive(Debug, Clone)]
pub struct SimClient {
    pub id: ClientId,
    pub workspace: u32,
    pub flags: ClientFlags,
    pub focusable: bool,
    pub accepts_focus: bool,
    pub transient_for: Option<ClientId>,
    pub modal: bool,
    /// Window group leader; a modal without `transient_for` belongs to it.
    pub group: Option<ClientId>,
    pub geometry: Rect,
    pub layer: Layer,
    pub struts: Option<Struts>,
}

impl SimClient {
    /// A regular, focusable, unmapped window on `workspace`.
    pub fn new(id: u32, workspace: u32) -> Self {
        Self {
            id: ClientId(id),
            workspace,
            flags: ClientFlags::default(),
            focusable: true,
            accepts_focus: true,
            transient_for: None,
            modal: false,
            group: None,
            geometry: Rect::new(100, 100, 640, 480),
            layer: Layer::Normal,
            struts: None,
        }
    }

    pub fn visible(mut self) -> Self {
        self.flags.visible = true;
        self
    }

    pub fn sticky(mut self) -> Self {
        self.flags.sticky = true;
        self
    }

    pub fn iconified(mut self) -> Self {
        self.flags.iconified = true;
        self
    }

    pub fn unfocusable(mut self) -> Self {
        self.focusable = false;
        self.accepts_focus = false;
        self
    }

    pub fn transient_for(mut self, parent: u32) -> Self {
        self.transient_for = Some(ClientId(parent));
        self
    }

    /// A modal dialog for the whole window group led by `leader`.
    pub fn group_modal(mut self, leader: u32) -> Self {
        self.modal = true;
        self.group = Some(ClientId(leader));
        self
    }

    /// The window this one is subordinate to: its transient parent, or the
    /// group leader for a group modal.
    fn owner(&self) -> Option<ClientId> {
        match self.transient_for {
            Some(parent) => Some(parent),
            None if self.modal => self.group.filter(|&g| g != self.id),
            None => None,
        }
    }

    pub fn at(mut self, geometry: Rect) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_struts(mut self, struts: Struts) -> Self {
        self.struts = Some(struts);
        self
    }
}

/// In-memory display: clients, monitors, focus, pointer and hint log.
#[derive(Debug)]
pub struct SimDisplay {
    /// Stacking list, bottom first.
    clients: Vec<SimClient>,
    monitors: Vec<MonitorInfo>,
    width: i32,
    height: i32,
    focus: Option<ClientId>,
    pointer: Option<(i32, i32)>,
    layout_request: LayoutRequest,
    hints: Vec<Hint>,
    hard_moves: Vec<(ClientId, u32)>,
    raised: Vec<ClientId>,
    resizes: u32,
    time: u32,
    fail_monitors: bool,
    fail_layout: bool,
}

impl SimDisplay {
    pub fn new(width: i32, height: i32, monitors: Vec<MonitorInfo>) -> Self {
        Self {
            clients: Vec::new(),
            monitors,
            width,
            height,
            focus: None,
            pointer: None,
            layout_request: LayoutRequest::default(),
            hints: Vec::new(),
            hard_moves: Vec::new(),
            raised: Vec::new(),
            resizes: 0,
            time: 1,
            fail_monitors: false,
            fail_layout: false,
        }
    }

    /// A single primary monitor covering the whole screen.
    pub fn single(width: i32, height: i32) -> Self {
        Self::new(
            width,
            height,
            vec![MonitorInfo {
                name: "SIM-1".into(),
                geometry: Rect::new(0, 0, width, height),
                primary: true,
            }],
        )
    }

    pub fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Map a client on top of the stack.
    pub fn push(&mut self, client: SimClient) {
        self.clients.push(client);
    }

    pub fn client(&self, id: u32) -> Option<&SimClient> {
        self.find(ClientId(id))
    }

    pub fn client_mut(&mut self, id: u32) -> Option<&mut SimClient> {
        self.find_mut(ClientId(id))
    }

    pub fn clients(&self) -> &[SimClient] {
        &self.clients
    }

    pub fn focus_client(&mut self, id: Option<u32>) {
        self.focus = id.map(ClientId);
    }

    pub fn set_pointer(&mut self, pos: Option<(i32, i32)>) {
        self.pointer = pos;
    }

    pub fn set_layout_request(&mut self, req: LayoutRequest) {
        self.layout_request = req;
    }

    pub fn set_monitors(&mut self, monitors: Vec<MonitorInfo>) {
        self.monitors = monitors;
    }

    pub fn set_time(&mut self, time: u32) {
        self.time = time;
    }

    /// Make the next monitor queries fail.
    pub fn fail_monitors(&mut self, fail: bool) {
        self.fail_monitors = fail;
    }

    /// Make the next layout queries fail.
    pub fn fail_layout(&mut self, fail: bool) {
        self.fail_layout = fail;
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn take_hints(&mut self) -> Vec<Hint> {
        std::mem::take(&mut self.hints)
    }

    /// Every hard workspace reassignment, in order.
    pub fn hard_moves(&self) -> &[(ClientId, u32)] {
        &self.hard_moves
    }

    pub fn raised(&self) -> &[ClientId] {
        &self.raised
    }

    /// How many times clients were re-validated against the work area.
    pub fn resizes(&self) -> u32 {
        self.resizes
    }

    fn find(&self, c: ClientId) -> Option<&SimClient> {
        self.clients.iter().find(|sc| sc.id == c)
    }

    fn find_mut(&mut self, c: ClientId) -> Option<&mut SimClient> {
        self.clients.iter_mut().find(|sc| sc.id == c)
    }

    /// `c` and every transient or group modal below it, transitively.
    fn family(&self, c: ClientId) -> Vec<ClientId> {
        let mut out = vec![c];
        let mut i = 0;
        while i < out.len() {
            let parent = out[i];
            for sc in &self.clients {
                if sc.owner() == Some(parent) && !out.contains(&sc.id) {
                    out.push(sc.id);
                }
            }
            i += 1;
        }
        out
    }
}

impl Clients for SimDisplay {
    fn stack(&self) -> Vec<ClientId> {
        self.clients.iter().map(|c| c.id).collect()
    }

    fn workspace(&self, c: ClientId) -> u32 {
        self.find(c).map(|sc| sc.workspace).unwrap_or_default()
    }

    fn set_workspace(&mut self, c: ClientId, ws: u32, hard: bool) {
        if let Some(sc) = self.find_mut(c) {
            trace!("{} -> workspace {} (hard: {})", c, ws, hard);
            sc.workspace = ws;
            if hard {
                self.hard_moves.push((c, ws));
            }
        }
    }

    fn flags(&self, c: ClientId) -> ClientFlags {
        self.find(c).map(|sc| sc.flags).unwrap_or_default()
    }

    fn set_pending_focus(&mut self, c: ClientId, pending: bool) {
        if let Some(sc) = self.find_mut(c) {
            sc.flags.pending_focus = pending;
        }
    }

    fn is_focusable(&self, c: ClientId) -> bool {
        self.find(c).is_some_and(|sc| sc.focusable)
    }

    fn accepts_focus(&self, c: ClientId) -> bool {
        self.find(c)
            .is_some_and(|sc| sc.focusable && sc.accepts_focus && !sc.flags.iconified)
    }

    fn is_transient_or_modal(&self, c: ClientId) -> bool {
        self.find(c)
            .is_some_and(|sc| sc.transient_for.is_some() || sc.modal)
    }

    fn has_ancestor_on(&self, c: ClientId, ws: u32) -> bool {
        let mut parent = self.find(c).and_then(SimClient::owner);
        // Bounded walk; a malformed cycle cannot hang the switch.
        for _ in 0..self.clients.len() {
            let Some(p) = parent.and_then(|p| self.find(p)) else {
                return false;
            };
            if p.workspace == ws || p.flags.sticky {
                return true;
            }
            parent = p.owner();
        }
        false
    }

    fn in_monitor(&self, c: ClientId, monitor: &MonitorInfo) -> bool {
        self.find(c).is_some_and(|sc| {
            let (x, y) = sc.geometry.center();
            monitor.geometry.contains(x, y)
        })
    }

    fn show(&mut self, c: ClientId) {
        for id in self.family(c) {
            if let Some(sc) = self.find_mut(id) {
                if !sc.flags.iconified {
                    trace!("show {}", id);
                    sc.flags.visible = true;
                }
            }
        }
    }

    fn withdraw(&mut self, c: ClientId, _ws: u32) {
        for id in self.family(c) {
            if let Some(sc) = self.find_mut(id) {
                trace!("withdraw {}", id);
                sc.flags.visible = false;
            }
        }
    }

    fn raise(&mut self, c: ClientId) {
        let Some(pos) = self.clients.iter().position(|sc| sc.id == c) else {
            return;
        };
        let client = self.clients.remove(pos);
        let at = self
            .clients
            .iter()
            .rposition(|sc| sc.layer <= client.layer)
            .map_or(0, |i| i + 1);
        self.clients.insert(at, client);
        self.raised.push(c);
    }

    fn is_topmost(&self, c: ClientId) -> bool {
        self.clients
            .iter()
            .rev()
            .find(|sc| sc.flags.visible)
            .is_some_and(|sc| sc.id == c)
    }

    fn focused(&self) -> Option<ClientId> {
        self.focus
    }

    fn set_focus(&mut self, c: Option<ClientId>, timestamp: u32, mode: FocusMode) {
        debug!("focus {:?} at {} ({:?})", c, timestamp, mode);
        self.focus = c;
    }

    fn focus_top(&mut self, layer: Layer, timestamp: u32) {
        let top = self
            .clients
            .iter()
            .rev()
            .find(|sc| {
                sc.layer <= layer && sc.flags.visible && sc.focusable && sc.accepts_focus
            })
            .map(|sc| sc.id);
        debug!("focus top {:?} at {}", top, timestamp);
        self.focus = top;
    }

    fn pointer(&self) -> Option<(i32, i32)> {
        self.pointer
    }

    fn client_at(&self, x: i32, y: i32) -> Option<ClientId> {
        self.clients
            .iter()
            .rev()
            .find(|sc| sc.flags.visible && sc.geometry.contains(x, y))
            .map(|sc| sc.id)
    }

    fn struts(&self, c: ClientId) -> Option<Struts> {
        self.find(c).and_then(|sc| sc.struts)
    }

    fn resize_for_work_area(&mut self) {
        self.resizes += 1;
    }

    fn current_time(&self) -> u32 {
        self.time
    }
}

impl MonitorProvider for SimDisplay {
    fn monitors(&self) -> Result<Vec<MonitorInfo>, BackendError> {
        if self.fail_monitors {
            return Err(BackendError("monitor query failed".into()));
        }
        Ok(self.monitors.clone())
    }
}

impl LayoutProvider for SimDisplay {
    fn layout(&self, count: u32) -> Result<DesktopLayout, BackendError> {
        if self.fail_layout {
            return Err(BackendError("layout query failed".into()));
        }
        Ok(self.layout_request.resolve(count))
    }
}

impl HintSink for SimDisplay {
    fn publish_current_desktop(&mut self, n: u32) -> Result<(), BackendError> {
        debug!("hint: current desktop {}", n);
        self.hints.push(Hint::CurrentDesktop(n));
        Ok(())
    }

    fn publish_work_area(
        &mut self,
        count: u32,
        width: i32,
        height: i32,
        margins: Margins,
    ) -> Result<(), BackendError> {
        debug!(
            "hint: work area {}x{} over {} desktop(s), margins {:?}",
            width, height, count, margins
        );
        self.hints.push(Hint::WorkArea {
            count,
            width,
            height,
            margins,
        });
        Ok(())
    }

    fn publish_desktop_count(&mut self, n: u32) -> Result<(), BackendError> {
        debug!("hint: {} desktop(s)", n);
        self.hints.push(Hint::DesktopCount(n));
        Ok(())
    }
}

/// Popup surface that logs instead of drawing.
///
/// Text is measured as an 8×16 monospace grid.
#[derive(Debug, Default)]
pub struct LogSurface {
    next_id: u64,
    live: usize,
    mapped: bool,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Images created and not yet released.
    pub fn live_images(&self) -> usize {
        self.live
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    fn image(&mut self, geometry: Rect) -> Image {
        self.next_id += 1;
        self.live += 1;
        Image {
            id: self.next_id,
            geometry,
        }
    }
}

impl OsdSurface for LogSurface {
    fn measure(&self, text: &str) -> (i32, i32) {
        (text.chars().count() as i32 * 8, 16)
    }

    fn render_text(&mut self, text: &str, geometry: Rect) -> Result<Image, OsdError> {
        if geometry.is_empty() {
            return Err(OsdError::Render(format!("empty popup for {:?}", text)));
        }
        debug!("popup {:?} at {:?}", text, geometry);
        self.mapped = true;
        Ok(self.image(geometry))
    }

    fn capture_backdrop(&mut self, geometry: Rect) -> Result<Image, OsdError> {
        Ok(self.image(geometry))
    }

    fn compose(&mut self, back: &Image, text: &Image, opacity: u8) {
        trace!("popup frame: text {} over {} at opacity {}", text.id, back.id, opacity);
    }

    fn hide(&mut self) {
        debug!("popup hidden");
        self.mapped = false;
    }

    fn release(&mut self, image: Image) {
        match self.live.checked_sub(1) {
            Some(n) => self.live = n,
            None => warn!("released image {} twice", image.id),
        }
    }
}
