//! Entry point for the **vdesk** daemon.
//!
//! Runs the workspace core on the headless backend described by the
//! `screen` section of the configuration, accepts commands over a Unix
//! socket on a background thread, and handles them on the main thread.
//! While the workspace-name popup is fading, the main loop wakes up when
//! the next fade frame is due and advances it.

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Instant;

use log::{error, info};
use vdesk::command::Command;
use vdesk::config::Config;
use vdesk::ipc::listener::UnixSocketListener;
use vdesk::notifier::NameNotifier;
use vdesk::sim::{LogSurface, SimDisplay};
use vdesk::state::{Policy, WorkspaceState};
use vdesk::switcher::Workspaces;
use vdesk::traits::CommandSource;

type Daemon = Workspaces<SimDisplay, NameNotifier<LogSurface>>;

/// Default socket path for the command listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("vdesk.sock")
}

/// `$XDG_CONFIG_HOME/vdesk`, falling back to `~/.config/vdesk`.
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("vdesk")
}

fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn build(config: &Config) -> Daemon {
    let screen = &config.screen;
    let monitors = screen.monitors_or_default();
    info!(
        "screen {}x{} with {} monitor(s)",
        screen.width,
        screen.height,
        monitors.len()
    );

    let mut display = SimDisplay::new(screen.width, screen.height, monitors);
    display.set_layout_request(screen.layout);

    let notifier = NameNotifier::new(LogSurface::new(), config.notifier.clone());
    let policy = Policy::from(&config.workspaces);
    let state = WorkspaceState::new(config.workspaces.count, screen.width, screen.height);

    let mut workspaces = Workspaces::new(display, notifier, policy, state);
    workspaces.set_names(config.workspaces.names.clone());
    workspaces.update_work_area();
    workspaces
}

fn main() {
    env_logger::init();

    let config = load_config();
    let mut workspaces = build(&config);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    info!("vdesk running");
    run(&mut workspaces, &cmd_rx);
    info!("all command sources closed, exiting");
}

fn run(workspaces: &mut Daemon, cmd_rx: &mpsc::Receiver<Command>) {
    loop {
        let cmd = match workspaces.notifier().next_tick_in(Instant::now()) {
            Some(wait) => match cmd_rx.recv_timeout(wait) {
                Ok(cmd) => Some(cmd),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            },
            None => match cmd_rx.recv() {
                Ok(cmd) => Some(cmd),
                Err(_) => return,
            },
        };
        if let Some(cmd) = cmd {
            workspaces.handle(cmd);
        }
        // Commands arriving faster than the fade interval must not stall it.
        workspaces.notifier_mut().poll(Instant::now());
    }
}

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
