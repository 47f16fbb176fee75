//! Mock transport for unit testing.
//!
//! Records every transmitted frame and lets tests toggle the connected flag
//! and inject write failures, without requiring a radio link.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use camtrig_core::{decode_message, Message};

use super::{Transport, TransportError};

/// An in-memory [`Transport`] that records transmitted frames.
pub struct MockTransport {
    connected: AtomicBool,
    fail_writes: AtomicBool,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockTransport {
    /// Creates a mock transport that starts out connected.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            fail_writes: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock transport with the link down.
    pub fn disconnected() -> Self {
        let transport = Self::new();
        transport.set_connected(false);
        transport
    }

    /// Raises or drops the link.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    /// When set, every transmit fails with [`TransportError::WriteFailed`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Returns a copy of every frame transmitted so far, oldest first.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    /// Returns the transmitted frames decoded back into messages.
    ///
    /// Panics on a malformed frame; the device logic only transmits frames
    /// produced by the codec.
    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent_frames()
            .iter()
            .map(|frame| decode_message(frame).expect("transmitted frame must decode"))
            .collect()
    }

    /// Clears the recorded frames.
    pub fn clear_sent(&self) {
        self.sent.lock().expect("lock poisoned").clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn transmit(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(TransportError::WriteFailed("injected failure".to_string()));
        }
        self.sent.lock().expect("lock poisoned").push(bytes.to_vec());
        Ok(())
    }
}
