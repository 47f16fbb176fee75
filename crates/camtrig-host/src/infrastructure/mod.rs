//! Infrastructure layer for the host.
//!
//! Contains the outward-facing adapters: the transport seam to the wireless
//! link and configuration file storage.
//!
//! **Dependency rule**: this layer may depend on `camtrig_core`, but the
//! transport and storage modules never import from `application`.

pub mod storage;
pub mod transport;
