//! Camera board facet: shutter duration configuration plus manual triggering.

use std::sync::{Arc, Mutex, Weak};

use camtrig_core::protocol::messages::{
    CameraConfigMessage, CameraStatusMessage, Message, MotionTriggerMessage,
};

use crate::application::device::{DeviceError, DeviceShared};
use crate::application::float_equals;

/// Mutable facet state shared between the receive pump and every
/// [`CameraBoard`] handle.
#[derive(Debug, Default)]
pub(crate) struct CameraState {
    last: CameraStatusMessage,
    desired: CameraConfigMessage,
    duration_pending: bool,
}

impl CameraState {
    fn is_synced(&self) -> bool {
        !self.duration_pending
    }

    fn staged_config(&mut self) -> CameraConfigMessage {
        if !self.duration_pending {
            self.desired.duration = self.last.duration;
        }
        self.desired
    }

    pub(crate) fn observe(&mut self, status: &CameraStatusMessage, epsilon: f32) {
        self.last = *status;

        if self.duration_pending && float_equals(self.last.duration, self.desired.duration, epsilon)
        {
            self.duration_pending = false;
        }
    }
}

/// Handle to the camera facet of an attached device.
#[derive(Clone)]
pub struct CameraBoard {
    state: Arc<Mutex<CameraState>>,
    device: Weak<DeviceShared>,
}

impl CameraBoard {
    pub(crate) fn new(state: Arc<Mutex<CameraState>>, device: Weak<DeviceShared>) -> Self {
        Self { state, device }
    }

    pub fn duration(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.duration
    }

    pub fn temperature(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.temperature
    }

    pub fn log_entries(&self) -> u16 {
        self.state.lock().expect("lock poisoned").last.log_entries
    }

    /// The full last status message.
    pub fn last_status(&self) -> CameraStatusMessage {
        self.state.lock().expect("lock poisoned").last
    }

    /// Stages a shutter duration; transmits immediately when `sync_now`.
    pub fn set_duration(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.duration = value;
            state.duration_pending = true;
        }
        if sync_now {
            self.sync()
        } else {
            Ok(())
        }
    }

    /// True when no staged value awaits confirmation from the board.
    pub fn is_synced(&self) -> bool {
        self.state.lock().expect("lock poisoned").is_synced()
    }

    /// Transmits one config message carrying the staged duration.
    pub fn sync(&self) -> Result<(), DeviceError> {
        let config = {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.is_synced() {
                return Ok(());
            }
            state.staged_config()
        };
        let device = self.device.upgrade().ok_or(DeviceError::NotConnected)?;
        device.transmit_message(&Message::CameraConfig(config))
    }

    /// Fires the shutter manually by sending a motion trigger.
    ///
    /// Refused with [`DeviceError::NotSynced`] while a duration change is
    /// unconfirmed.
    pub fn trigger(&self, motion: u16, lux: f32) -> Result<(), DeviceError> {
        if !self.is_synced() {
            return Err(DeviceError::NotSynced);
        }
        let device = self.device.upgrade().ok_or(DeviceError::NotConnected)?;
        device.transmit_message(&Message::MotionTrigger(MotionTriggerMessage { motion, lux }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_confirms_staged_duration() {
        let mut state = CameraState::default();
        state.desired.duration = 0.25;
        state.duration_pending = true;

        state.observe(
            &CameraStatusMessage {
                duration: 0.25,
                ..Default::default()
            },
            1e-6,
        );

        assert!(state.is_synced());
        assert_eq!(state.last.duration, 0.25);
    }

    #[test]
    fn test_observe_keeps_pending_until_duration_matches() {
        let mut state = CameraState::default();
        state.desired.duration = 0.25;
        state.duration_pending = true;

        state.observe(
            &CameraStatusMessage {
                duration: 1.5,
                ..Default::default()
            },
            1e-6,
        );

        assert!(!state.is_synced());
    }

    #[test]
    fn test_staged_config_reflects_desired_duration() {
        let mut state = CameraState::default();
        state.observe(
            &CameraStatusMessage {
                duration: 1.5,
                ..Default::default()
            },
            1e-6,
        );
        state.desired.duration = 0.5;
        state.duration_pending = true;

        assert_eq!(state.staged_config().duration, 0.5);
    }
}
