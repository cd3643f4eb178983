//! Collaborator seams that decouple the workspace core from any specific
//! display server, client bookkeeping or transport.
//!
//! The [`Workspaces`](crate::switcher::Workspaces) orchestrator only depends
//! on these abstractions.  [`sim::SimDisplay`](crate::sim::SimDisplay)
//! implements every backend trait in memory.

use crate::command::{ClientId, Command, MonitorInfo};
use crate::geometry::{Margins, Rect, Struts};
use crate::layout::DesktopLayout;
use std::sync::mpsc;

/// Failure reported by a backend collaborator.
///
/// The core never propagates these; it logs them and degrades.
#[derive(Debug, thiserror::Error)]
#[error("backend error: {0}")]
pub struct BackendError(pub String);

/// Per-client state flags the core reads and writes during a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientFlags {
    /// Shown on every workspace.
    pub sticky: bool,
    /// Minimised; never revealed by a switch.
    pub iconified: bool,
    /// Currently mapped on screen.
    pub visible: bool,
    /// Should receive focus when its workspace becomes current again.
    pub pending_focus: bool,
}

/// How a focus change treats modal dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Focus exactly the given client, even if a modal would normally win.
    IgnoreModal,
    /// Focus the client and move it to the front of the focus order.
    Sort,
}

/// Stacking layers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Layer {
    Desktop,
    Below,
    #[default]
    Normal,
    OnTop,
    Fullscreen,
    Above,
}

/// Client-management collaborator.
///
/// Owns every client and the stacking list.  The core only reads the
/// listed fields, reassigns a client's workspace and flags, and asks for
/// show/withdraw/raise/focus; it never reorders the stack itself.
pub trait Clients {
    /// Every managed client in stacking order, bottom first.
    fn stack(&self) -> Vec<ClientId>;

    fn workspace(&self, c: ClientId) -> u32;

    /// Move `c` to workspace `ws`.  A `hard` move overrides per-client
    /// placement rules.
    fn set_workspace(&mut self, c: ClientId, ws: u32, hard: bool);

    fn flags(&self, c: ClientId) -> ClientFlags;

    fn set_pending_focus(&mut self, c: ClientId, pending: bool);

    /// Whether the client's type is a regular, focusable window.
    fn is_focusable(&self, c: ClientId) -> bool;

    /// Whether the client can currently be selected for focus.
    fn accepts_focus(&self, c: ClientId) -> bool;

    fn is_transient_or_modal(&self, c: ClientId) -> bool;

    /// Whether a transient/modal has an ancestor on workspace `ws` that
    /// governs its visibility there.
    fn has_ancestor_on(&self, c: ClientId, ws: u32) -> bool;

    /// Whether `c` lies on `monitor`.
    fn in_monitor(&self, c: ClientId, monitor: &MonitorInfo) -> bool;

    fn show(&mut self, c: ClientId);

    /// Unmap `c`; `ws` is the workspace being switched to.
    fn withdraw(&mut self, c: ClientId, ws: u32);

    fn raise(&mut self, c: ClientId);

    fn is_topmost(&self, c: ClientId) -> bool;

    fn focused(&self) -> Option<ClientId>;

    fn set_focus(&mut self, c: Option<ClientId>, timestamp: u32, mode: FocusMode);

    /// Focus the topmost client at or below `layer`.
    fn focus_top(&mut self, layer: Layer, timestamp: u32);

    /// Pointer position in root coordinates, if it is on this screen.
    fn pointer(&self) -> Option<(i32, i32)>;

    fn client_at(&self, x: i32, y: i32) -> Option<ClientId>;

    /// The client's edge reservations, if it declares any.
    fn struts(&self, c: ClientId) -> Option<Struts>;

    /// Re-validate every client's position and size against the work area.
    fn resize_for_work_area(&mut self);

    /// Current server timestamp.
    fn current_time(&self) -> u32;
}

/// Source of the physical monitor layout.
pub trait MonitorProvider {
    fn monitors(&self) -> Result<Vec<MonitorInfo>, BackendError>;
}

/// Source of the desktop grid for a given workspace count.
pub trait LayoutProvider {
    fn layout(&self, count: u32) -> Result<DesktopLayout, BackendError>;
}

/// Sink for desktop-protocol hints.
pub trait HintSink {
    fn publish_current_desktop(&mut self, n: u32) -> Result<(), BackendError>;

    fn publish_work_area(
        &mut self,
        count: u32,
        width: i32,
        height: i32,
        margins: Margins,
    ) -> Result<(), BackendError>;

    fn publish_desktop_count(&mut self, n: u32) -> Result<(), BackendError>;
}

/// Everything the core needs from the display side.
pub trait Backend: Clients + MonitorProvider + LayoutProvider + HintSink {}

impl<T: Clients + MonitorProvider + LayoutProvider + HintSink> Backend for T {}

/// Workspace-name popup.
///
/// Fire-and-forget: the notifier owns its own fade-out lifecycle.
pub trait Notifier {
    fn notify(&mut self, text: &str, anchor: Rect);
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport and forward parsed commands
/// into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
