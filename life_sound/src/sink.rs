//! Message sinks: where encoded voices go.
//!
//! The real sink is a fire-and-forget UDP socket: no acknowledgement, no
//! retry, and a datagram that cannot be sent right now is dropped.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::osc::OscMessage;

/// Anything that accepts outgoing OSC messages.
pub trait MessageSink {
    fn send(&mut self, msg: &OscMessage);
}

// ── UDP backend ───────────────────────────────────────────────────────────

/// Non-blocking UDP sink bound to an ephemeral local port.
pub struct UdpSink {
    socket:  UdpSocket,
    target:  SocketAddr,
    /// Datagrams the OS refused (would block, unreachable, …).
    pub dropped: u64,
}

impl UdpSink {
    pub fn connect(target: &str) -> io::Result<Self> {
        let target = target.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("no address for {target}"))
        })?;
        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;
        Ok(UdpSink { socket, target, dropped: 0 })
    }

    pub fn target(&self) -> SocketAddr { self.target }
}

impl MessageSink for UdpSink {
    fn send(&mut self, msg: &OscMessage) {
        if let Err(e) = self.socket.send_to(&msg.to_bytes(), self.target) {
            self.dropped += 1;
            log::debug!("dropped {} → {}: {}", msg.addr, self.target, e);
        }
    }
}

// ── null backend (used when the socket cannot be opened) ──────────────────

pub struct NullSink;

impl MessageSink for NullSink {
    fn send(&mut self, _msg: &OscMessage) {}
}

// ── in-memory backend ─────────────────────────────────────────────────────

/// Records every message; handy for dry runs and tests.
#[derive(Default, Debug)]
pub struct MemorySink {
    pub messages: Vec<OscMessage>,
}

impl MemorySink {
    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<OscMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Messages whose address is exactly `addr`.
    pub fn by_addr<'a>(&'a self, addr: &'a str) -> impl Iterator<Item = &'a OscMessage> + 'a {
        self.messages.iter().filter(move |m| m.addr == addr)
    }
}

impl MessageSink for MemorySink {
    fn send(&mut self, msg: &OscMessage) {
        self.messages.push(msg.clone());
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_sink — UDP if possible, otherwise silence
// ════════════════════════════════════════════════════════════════════════════

/// Open a UDP sink to `target`.  Falls back to [`NullSink`] with a warning.
pub fn open_sink(target: &str) -> Box<dyn MessageSink> {
    match UdpSink::connect(target) {
        Ok(sink) => {
            log::info!("sending OSC to {}", sink.target());
            Box::new(sink)
        }
        Err(e) => {
            log::warn!("cannot open OSC socket to {target}: {e}; sound output disabled");
            Box::new(NullSink)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
