//! `spec.md` §9 "Lifetime of buffered transcript": "Source keeps a
//! running hash buffer then discards it after Finished. In the rewrite,
//! model it as an owned buffer wrapped in an `Option` that is taken at
//! Finished; forbid further extension after take."

/// Every handshake message body, concatenated in wire order, feeding the
/// Finished and CertificateVerify digests (`spec.md` §3.1 "a buffered
/// handshake-message log used to compute Finished and CertificateVerify
/// MACs").
#[derive(Default)]
pub struct Transcript {
    buf: Option<Vec<u8>>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript { buf: Some(Vec::new()) }
    }

    /// Appends one handshake message's wire bytes (type ‖ length ‖ body,
    /// i.e. exactly what was read or written on the wire, never the raw
    /// record-layer framing around it). Panics if called after
    /// [`Transcript::take`] — a caller that still has handshake messages
    /// to log after Finished has a logic error, not a recoverable one.
    pub fn extend(&mut self, message: &[u8]) {
        self.buf.as_mut().expect("transcript extended after being taken").extend_from_slice(message);
    }

    pub fn current(&self) -> &[u8] {
        self.buf.as_deref().expect("transcript read after being taken")
    }

    /// Takes ownership of the buffered log, after which `extend`/`current`
    /// panic. Called once Finished on both sides has been verified.
    pub fn take(&mut self) -> Vec<u8> {
        self.buf.take().expect("transcript taken twice")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_in_order() {
        let mut t = Transcript::new();
        t.extend(b"client_hello");
        t.extend(b"server_hello");
        assert_eq!(t.current(), b"client_helloserver_hello");
    }

    #[test]
    #[should_panic(expected = "taken")]
    fn extend_after_take_panics() {
        let mut t = Transcript::new();
        t.extend(b"a");
        let _ = t.take();
        t.extend(b"b");
    }
}
