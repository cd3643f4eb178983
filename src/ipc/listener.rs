//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and serves one connection at a time.  Every
//! line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! One JSON value per line:
//!
//! ```json
//! {"Go":"up-left"}
//! {"Move":{"rows":0,"cols":2}}
//! {"SwitchTo":3}
//! {"SetNames":["web","code","mail"]}
//! {"SetCount":6}
//! {"Insert":1}
//! {"Delete":1}
//! "UpdateArea"
//! ```
//!
//! Malformed lines are logged and skipped; the connection stays open.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, Read};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] reading JSON commands from a Unix stream socket.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one line of the wire format.  Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, UnixSocketError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Forward every command read from `reader` into `sink`.
///
/// Returns `false` once the sink has hung up.
fn forward<R: Read>(reader: R, sink: &mpsc::Sender<Command>) -> bool {
    for line in BufReader::new(reader).lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        };
        match parse_line(&text) {
            Ok(Some(cmd)) => {
                debug!("received {:?}", cmd);
                if sink.send(cmd).is_err() {
                    return false;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("bad command {:?}: {}", text, e),
        }
    }
    true
}

impl UnixSocketListener {
    /// The socket file is created by [`run`](CommandSource::run), replacing
    /// any stale one at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and serve connections.  Blocks; run it on its own
    /// thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed stale socket {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    if !forward(stream, &sink) {
                        info!("sink closed, shutting down");
                        break;
                    }
                    debug!("client disconnected");
                }
                Err(e) => error!("accept error: {}", e),
            }
        }

        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}
