//! **vdesk**: virtual workspaces for a window manager.
//!
//! Workspaces are numbered `0..count` and laid out on a `rows × cols` grid
//! whose orientation and starting corner come from the pager.  The crate
//! maps numbers to grid cells and back, navigates the grid with optional
//! wraparound, and switches the whole client stack from one workspace to
//! another in a single pass over it, keeping focus, visibility and sticky
//! windows consistent.  It also folds every client's screen-edge
//! reservations ("struts") into one work area.
//!
//! # Architecture
//!
//! [`switcher::Workspaces`] is the core.  It talks to the outside world only
//! through the seams in [`traits`]:
//!
//! * [`traits::Clients`], [`traits::MonitorProvider`],
//!   [`traits::LayoutProvider`] and [`traits::HintSink`], bundled as
//!   [`traits::Backend`], stand for the display side;
//! * [`traits::Notifier`] shows the workspace name after a switch;
//! * [`traits::CommandSource`] delivers [`command::Command`]s to the main
//!   loop.
//!
//! [`sim`] implements the backend in memory, [`notifier`] the popup state
//! machine, and [`ipc`] the Unix-socket command source.

pub mod command;
pub mod config;
pub mod count;
pub mod geometry;
pub mod ipc;
pub mod layout;
pub mod navigator;
pub mod notifier;
pub mod sim;
pub mod state;
pub mod switcher;
pub mod traits;
pub mod workarea;
