//! Transport boundary between the device logic and the wireless link.
//!
//! CamTrig boards are reached over a BLE UART-style service: the host writes
//! whole frames to one characteristic and receives notification chunks of
//! arbitrary size on another. Everything link-specific (scanning, connecting,
//! characteristic discovery) lives behind this seam; the device logic only
//! ever transmits bytes and consumes a notification channel handed over at
//! attach time.
//!
//! # Testability
//!
//! The `Transport` trait lets tests drive the device logic with
//! [`mock::MockTransport`] instead of real radio hardware.

use thiserror::Error;

pub mod mock;

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport link is down")]
    NotConnected,
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Trait abstracting the outbound half of the wireless link.
///
/// Inbound bytes are not part of the trait: implementations forward each
/// received notification chunk into the `tokio::sync::mpsc` channel given to
/// [`Device::attach`](crate::application::device::Device::attach).
pub trait Transport: Send + Sync {
    /// Reports whether the link is currently established.
    fn is_connected(&self) -> bool;

    /// Writes one encoded frame to the device.
    fn transmit(&self, bytes: &[u8]) -> Result<(), TransportError>;
}
