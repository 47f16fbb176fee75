//! Host-side control plane for CamTrig boards.
//!
//! A CamTrig deployment pairs a motion-sensing board with light and camera
//! trigger boards, reachable over a low-bandwidth serial-over-wireless link
//! that delivers inbound bytes as arbitrarily-chunked notifications. This
//! crate turns that link into a typed handle:
//!
//! 1. Establish the link however the platform does it and wrap it in a
//!    [`Transport`] plus a notification channel.
//! 2. [`Device::attach`] the link; a background pump reassembles and
//!    dispatches incoming messages.
//! 3. Use the facet handles ([`Device::motion`], [`Device::light`],
//!    [`Device::camera`]) to read reported state and stage configuration,
//!    and the device itself for logs, clock setting and parameter RPCs.
//!
//! Framing and message codecs live in the `camtrig-core` crate.

pub mod application;
pub mod infrastructure;

pub use application::camera::CameraBoard;
pub use application::device::{Device, DeviceError, DeviceEvent};
pub use application::light::LightBoard;
pub use application::motion::MotionSensor;
pub use application::rpc::RequestKind;
pub use infrastructure::storage::config::{load_config, save_config, HostConfig};
pub use infrastructure::transport::mock::MockTransport;
pub use infrastructure::transport::{Transport, TransportError};
