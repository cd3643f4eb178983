//! Command transport over a Unix socket.
//!
//! Key-bind helpers, pagers and scripts connect to the socket and send
//! newline-delimited JSON [`Command`](crate::command::Command)s.

pub mod listener;
