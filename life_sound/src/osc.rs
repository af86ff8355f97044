//! Minimal OSC 1.0 message encoding, float arguments only.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┬─────────────────────────┐
//! │ address  "/life/…\0" │ type tags  ",fff\0"  │ big-endian f32 × n      │
//! │ padded to 4 bytes    │ padded to 4 bytes    │                         │
//! └──────────────────────┴──────────────────────┴─────────────────────────┘
//! ```
//!
//! A message with several float arguments is read by trowaSoft cvOSCcv as a
//! polyphonic signal, one channel per argument.

/// One OSC message: an address pattern and its float arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct OscMessage {
    pub addr: String,
    pub args: Vec<f32>,
}

impl OscMessage {
    pub fn new(addr: impl Into<String>, args: Vec<f32>) -> Self {
        OscMessage { addr: addr.into(), args }
    }

    /// Serialise to the bytes of a single OSC packet.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut b = Vec::with_capacity(self.encoded_len());
        write_padded_str(&mut b, &self.addr);

        let mut tags = String::with_capacity(self.args.len() + 1);
        tags.push(',');
        for _ in &self.args { tags.push('f'); }
        write_padded_str(&mut b, &tags);

        for v in &self.args {
            b.extend_from_slice(&v.to_be_bytes());
        }
        b
    }

    /// Exact size of [`to_bytes`](Self::to_bytes).
    pub fn encoded_len(&self) -> usize {
        padded_len(self.addr.len()) + padded_len(self.args.len() + 1) + 4 * self.args.len()
    }
}

/// String length including the terminating NUL, rounded up to 4.
fn padded_len(n: usize) -> usize {
    (n + 4) & !3
}

/// Write `s`, a NUL terminator, and zero padding up to a 4-byte boundary.
fn write_padded_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    let pad = padded_len(s.len()) - s.len();
    buf.extend(std::iter::repeat(0u8).take(pad));
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
