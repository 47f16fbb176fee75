//! Light board facet: envelope configuration plus manual triggering.

use std::sync::{Arc, Mutex, Weak};

use camtrig_core::protocol::messages::{
    LightConfigMessage, LightStatusMessage, Message, MotionTriggerMessage,
};

use crate::application::device::{DeviceError, DeviceShared};
use crate::application::float_equals;

/// Mutable facet state shared between the receive pump and every
/// [`LightBoard`] handle.
#[derive(Debug, Default)]
pub(crate) struct LightState {
    last: LightStatusMessage,
    desired: LightConfigMessage,
    level_pending: bool,
    delay_pending: bool,
    attack_pending: bool,
    sustain_pending: bool,
    release_pending: bool,
}

impl LightState {
    fn is_synced(&self) -> bool {
        !(self.level_pending
            || self.delay_pending
            || self.attack_pending
            || self.sustain_pending
            || self.release_pending)
    }

    fn staged_config(&mut self) -> LightConfigMessage {
        if !self.level_pending {
            self.desired.level = self.last.level;
        }
        if !self.delay_pending {
            self.desired.delay = self.last.delay;
        }
        if !self.attack_pending {
            self.desired.attack = self.last.attack;
        }
        if !self.sustain_pending {
            self.desired.sustain = self.last.sustain;
        }
        if !self.release_pending {
            self.desired.release = self.last.release;
        }
        self.desired
    }

    pub(crate) fn observe(&mut self, status: &LightStatusMessage, epsilon: f32) {
        self.last = *status;

        if self.level_pending && float_equals(self.last.level, self.desired.level, epsilon) {
            self.level_pending = false;
        }
        if self.delay_pending && float_equals(self.last.delay, self.desired.delay, epsilon) {
            self.delay_pending = false;
        }
        if self.attack_pending && float_equals(self.last.attack, self.desired.attack, epsilon) {
            self.attack_pending = false;
        }
        if self.sustain_pending && float_equals(self.last.sustain, self.desired.sustain, epsilon) {
            self.sustain_pending = false;
        }
        if self.release_pending && float_equals(self.last.release, self.desired.release, epsilon) {
            self.release_pending = false;
        }
    }
}

/// Handle to the light facet of an attached device.
#[derive(Clone)]
pub struct LightBoard {
    state: Arc<Mutex<LightState>>,
    device: Weak<DeviceShared>,
}

impl LightBoard {
    pub(crate) fn new(state: Arc<Mutex<LightState>>, device: Weak<DeviceShared>) -> Self {
        Self { state, device }
    }

    // ── Observed values ───────────────────────────────────────────────────────

    pub fn level(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.level
    }

    pub fn delay(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.delay
    }

    pub fn attack(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.attack
    }

    pub fn sustain(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.sustain
    }

    pub fn release(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.release
    }

    pub fn temperature(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.temperature
    }

    pub fn log_entries(&self) -> u16 {
        self.state.lock().expect("lock poisoned").last.log_entries
    }

    /// The full last status message.
    pub fn last_status(&self) -> LightStatusMessage {
        self.state.lock().expect("lock poisoned").last
    }

    // ── Staged configuration ──────────────────────────────────────────────────

    pub fn set_level(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.level = value;
            state.level_pending = true;
        }
        self.sync_if(sync_now)
    }

    pub fn set_delay(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.delay = value;
            state.delay_pending = true;
        }
        self.sync_if(sync_now)
    }

    pub fn set_attack(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.attack = value;
            state.attack_pending = true;
        }
        self.sync_if(sync_now)
    }

    pub fn set_sustain(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.sustain = value;
            state.sustain_pending = true;
        }
        self.sync_if(sync_now)
    }

    pub fn set_release(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.release = value;
            state.release_pending = true;
        }
        self.sync_if(sync_now)
    }

    /// True when no staged value awaits confirmation from the board.
    pub fn is_synced(&self) -> bool {
        self.state.lock().expect("lock poisoned").is_synced()
    }

    /// Transmits one config message carrying all staged envelope values.
    pub fn sync(&self) -> Result<(), DeviceError> {
        let config = {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.is_synced() {
                return Ok(());
            }
            state.staged_config()
        };
        let device = self.device.upgrade().ok_or(DeviceError::NotConnected)?;
        device.transmit_message(&Message::LightConfig(config))
    }

    /// Fires the light manually by sending a motion trigger.
    ///
    /// Refused with [`DeviceError::NotSynced`] while configuration changes
    /// are unconfirmed, so the flash runs the intended envelope.
    pub fn trigger(&self, motion: u16, lux: f32) -> Result<(), DeviceError> {
        if !self.is_synced() {
            return Err(DeviceError::NotSynced);
        }
        let device = self.device.upgrade().ok_or(DeviceError::NotConnected)?;
        device.transmit_message(&Message::MotionTrigger(MotionTriggerMessage { motion, lux }))
    }

    fn sync_if(&self, sync_now: bool) -> Result<(), DeviceError> {
        if sync_now {
            self.sync()
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(level: f32, delay: f32, attack: f32, sustain: f32, release: f32) -> LightStatusMessage {
        LightStatusMessage {
            level,
            delay,
            attack,
            sustain,
            release,
            ..Default::default()
        }
    }

    #[test]
    fn test_staged_config_mixes_desired_and_last_values() {
        // Arrange
        let mut state = LightState::default();
        state.observe(&status(0.5, 1.0, 2.0, 3.0, 4.0), 1e-6);
        state.desired.level = 0.9;
        state.level_pending = true;
        state.desired.release = 6.0;
        state.release_pending = true;

        // Act
        let config = state.staged_config();

        // Assert
        assert_eq!(config.level, 0.9);
        assert_eq!(config.release, 6.0);
        assert_eq!(config.delay, 1.0);
        assert_eq!(config.attack, 2.0);
        assert_eq!(config.sustain, 3.0);
    }

    #[test]
    fn test_observe_clears_only_confirmed_fields() {
        // Arrange: two fields staged, the board confirms one
        let mut state = LightState::default();
        state.desired.level = 0.9;
        state.level_pending = true;
        state.desired.attack = 2.5;
        state.attack_pending = true;

        // Act
        state.observe(&status(0.9, 0.0, 1.0, 0.0, 0.0), 1e-6);

        // Assert
        assert!(!state.level_pending);
        assert!(state.attack_pending);
        assert!(!state.is_synced());
    }

    #[test]
    fn test_observe_confirms_all_fields_after_full_match() {
        let mut state = LightState::default();
        state.desired = LightConfigMessage {
            level: 0.9,
            delay: 0.0,
            attack: 1.0,
            sustain: 2.0,
            release: 3.0,
        };
        state.level_pending = true;
        state.delay_pending = true;
        state.attack_pending = true;
        state.sustain_pending = true;
        state.release_pending = true;

        state.observe(&status(0.9, 0.0, 1.0, 2.0, 3.0), 1e-6);

        assert!(state.is_synced());
    }
}
