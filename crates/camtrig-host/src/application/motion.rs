//! Motion sensor facet: staged configuration kept in sync with the board.
//!
//! The board is the source of truth for its own configuration; the host only
//! learns values from status messages. Setters therefore stage values as
//! *desired* and mark them pending; [`MotionSensor::sync`] transmits one
//! config message carrying the staged values plus the last observed values
//! for untouched fields, and a pending flag clears only when a later status
//! reports the value the host asked for.

use std::sync::{Arc, Mutex, Weak};

use camtrig_core::protocol::messages::{Message, MotionConfigMessage, MotionStatusMessage};

use crate::application::device::{DeviceError, DeviceShared};
use crate::application::float_equals;

/// Mutable facet state shared between the device's receive pump and every
/// [`MotionSensor`] handle.
#[derive(Debug, Default)]
pub(crate) struct MotionState {
    last: MotionStatusMessage,
    desired: MotionConfigMessage,
    threshold_pending: bool,
    lux_low_pending: bool,
    lux_high_pending: bool,
    cooldown_pending: bool,
}

impl MotionState {
    fn is_synced(&self) -> bool {
        !(self.threshold_pending
            || self.lux_low_pending
            || self.lux_high_pending
            || self.cooldown_pending)
    }

    /// Builds the config message for a sync: untouched fields carry the last
    /// observed values so the transmit never clobbers them.
    fn staged_config(&mut self) -> MotionConfigMessage {
        if !self.threshold_pending {
            self.desired.motion_threshold = self.last.motion_threshold;
        }
        if !self.lux_low_pending {
            self.desired.lux_low_threshold = self.last.lux_low_threshold;
        }
        if !self.lux_high_pending {
            self.desired.lux_high_threshold = self.last.lux_high_threshold;
        }
        if !self.cooldown_pending {
            self.desired.cooldown = self.last.cooldown;
        }
        self.desired
    }

    /// Records a status message and clears every pending flag whose desired
    /// value the board now reports.
    pub(crate) fn observe(&mut self, status: &MotionStatusMessage, epsilon: f32) {
        self.last = *status;

        if self.threshold_pending && self.last.motion_threshold == self.desired.motion_threshold {
            self.threshold_pending = false;
        }
        if self.lux_low_pending
            && float_equals(self.last.lux_low_threshold, self.desired.lux_low_threshold, epsilon)
        {
            self.lux_low_pending = false;
        }
        if self.lux_high_pending
            && float_equals(
                self.last.lux_high_threshold,
                self.desired.lux_high_threshold,
                epsilon,
            )
        {
            self.lux_high_pending = false;
        }
        if self.cooldown_pending && float_equals(self.last.cooldown, self.desired.cooldown, epsilon)
        {
            self.cooldown_pending = false;
        }
    }
}

/// Handle to the motion-sensor facet of an attached device.
///
/// Cheap to clone; reads keep working after the device is dropped, mutating
/// operations then fail with [`DeviceError::NotConnected`].
#[derive(Clone)]
pub struct MotionSensor {
    state: Arc<Mutex<MotionState>>,
    device: Weak<DeviceShared>,
}

impl MotionSensor {
    pub(crate) fn new(state: Arc<Mutex<MotionState>>, device: Weak<DeviceShared>) -> Self {
        Self { state, device }
    }

    // ── Observed values (from the last status message) ────────────────────────

    /// Most recent raw motion reading.
    pub fn motion(&self) -> u16 {
        self.state.lock().expect("lock poisoned").last.motion
    }

    /// Motion level above which the board fires.
    pub fn motion_threshold(&self) -> u16 {
        self.state.lock().expect("lock poisoned").last.motion_threshold
    }

    /// Most recent ambient light reading.
    pub fn lux(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.lux
    }

    pub fn lux_low_threshold(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.lux_low_threshold
    }

    pub fn lux_high_threshold(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.lux_high_threshold
    }

    /// Seconds the board stays quiet after a trigger.
    pub fn cooldown(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.cooldown
    }

    pub fn temperature(&self) -> f32 {
        self.state.lock().expect("lock poisoned").last.temperature
    }

    pub fn log_entries(&self) -> u16 {
        self.state.lock().expect("lock poisoned").last.log_entries
    }

    /// The full last status message.
    pub fn last_status(&self) -> MotionStatusMessage {
        self.state.lock().expect("lock poisoned").last
    }

    // ── Staged configuration ──────────────────────────────────────────────────

    /// Stages a motion threshold; transmits immediately when `sync_now`.
    pub fn set_motion_threshold(&self, value: u16, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.motion_threshold = value;
            state.threshold_pending = true;
        }
        self.sync_if(sync_now)
    }

    /// Stages a lux low threshold; transmits immediately when `sync_now`.
    pub fn set_lux_low_threshold(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.lux_low_threshold = value;
            state.lux_low_pending = true;
        }
        self.sync_if(sync_now)
    }

    /// Stages a lux high threshold; transmits immediately when `sync_now`.
    pub fn set_lux_high_threshold(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.lux_high_threshold = value;
            state.lux_high_pending = true;
        }
        self.sync_if(sync_now)
    }

    /// Stages a cooldown period; transmits immediately when `sync_now`.
    pub fn set_cooldown(&self, value: f32, sync_now: bool) -> Result<(), DeviceError> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            state.desired.cooldown = value;
            state.cooldown_pending = true;
        }
        self.sync_if(sync_now)
    }

    /// True when no staged value awaits confirmation from the board.
    pub fn is_synced(&self) -> bool {
        self.state.lock().expect("lock poisoned").is_synced()
    }

    /// Transmits one config message carrying all staged values.
    ///
    /// A no-op when nothing is pending. Pending flags stay set until a status
    /// message confirms the values.
    pub fn sync(&self) -> Result<(), DeviceError> {
        let config = {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.is_synced() {
                return Ok(());
            }
            state.staged_config()
        };
        let device = self.device.upgrade().ok_or(DeviceError::NotConnected)?;
        device.transmit_message(&Message::MotionConfig(config))
    }

    fn sync_if(&self, sync_now: bool) -> Result<(), DeviceError> {
        if sync_now {
            self.sync()
        } else {
            Ok(())
        }
    }
}
