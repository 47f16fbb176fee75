//! Application layer: the device handle and its per-board facets.
//!
//! This layer owns all protocol-aware behaviour above the codec. It talks to
//! the link only through the [`Transport`](crate::infrastructure::transport::Transport)
//! trait, so everything here is exercised in tests against an in-memory mock.
//!
//! # Sub-modules
//!
//! - **`device`** – The [`Device`](device::Device) handle: owns the receive
//!   pump, dispatches incoming messages, and exposes one-way sends and
//!   request/response calls.
//!
//! - **`motion`**, **`light`**, **`camera`** – Facet handles for each board
//!   role. Each tracks the last reported configuration, stages local changes,
//!   and pushes them with a single config message on `sync`.
//!
//! - **`rpc`** – Correlates parameter request/response pairs. The wire
//!   carries no request ids, so correlation is by request kind with one
//!   in-flight slot per kind.

pub mod camera;
pub mod device;
pub mod light;
pub mod motion;
pub mod rpc;

/// Float comparison used when matching a reported value against a staged one.
///
/// The boards round-trip `f32` values through their own arithmetic, so
/// confirmation uses an epsilon rather than bit equality.
pub(crate) fn float_equals(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::float_equals;

    #[test]
    fn test_float_equals_within_epsilon() {
        assert!(float_equals(1.0, 1.0 + 1e-7, 1e-6));
        assert!(!float_equals(1.0, 1.01, 1e-6));
    }

    #[test]
    fn test_float_equals_is_symmetric() {
        assert!(float_equals(2.5, 2.5, 1e-6));
        assert!(float_equals(-3.0, -3.0 - 1e-8, 1e-6));
    }
}
