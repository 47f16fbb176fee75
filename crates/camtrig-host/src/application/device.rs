//! Device handle: receive pump, dispatch, facets, and request/response calls.
//!
//! A [`Device`] is attached to an already-established link: the caller hands
//! over a [`Transport`] for outbound frames and an `mpsc` receiver on which
//! the link delivers notification chunks. A spawned pump task reassembles
//! messages from the chunks and dispatches them: status messages update their
//! facet, log entries accumulate in an in-memory store, RPC responses
//! complete the broker, and everything observed is surfaced on the
//! [`DeviceEvent`] channel.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use camtrig_core::protocol::messages::{
    CameraStatusMessage, GetFloatRequestMessage, GetFloatResponseMessage, GetUint16RequestMessage,
    GetUint16ResponseMessage, LightStatusMessage, LogRequestMessage, LogResponseMessage, Message,
    MotionStatusMessage, MotionTriggerMessage, SetFloatRequestMessage, SetFloatResponseMessage,
    SetTimeMessage, SetUint16RequestMessage, SetUint16ResponseMessage,
};
use camtrig_core::{encode_message, Calendar, DecodeError, StreamDecoder};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::application::camera::{CameraBoard, CameraState};
use crate::application::light::{LightBoard, LightState};
use crate::application::motion::{MotionSensor, MotionState};
use crate::application::rpc::{RequestKind, RpcBroker};
use crate::infrastructure::storage::config::HostConfig;
use crate::infrastructure::transport::{Transport, TransportError};

/// Error type for device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device is not connected")]
    NotConnected,
    #[error("board configuration has unconfirmed changes")]
    NotSynced,
    #[error("{kind:?} request timed out")]
    Timeout { kind: RequestKind },
    #[error("{kind:?} request completed with a mismatched response")]
    UnexpectedResponse { kind: RequestKind },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Events emitted by the receive pump to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    MotionStatus(MotionStatusMessage),
    LightStatus(LightStatusMessage),
    CameraStatus(CameraStatusMessage),
    /// The board fired on its own.
    MotionTriggered(MotionTriggerMessage),
    /// A requested log entry arrived (also appended to [`Device::log`]).
    LogEntry(LogResponseMessage),
    /// A notification chunk could not be decoded; the stream has resynced.
    DecodeFailed(DecodeError),
}

/// State shared between the device handle, its facets, and the receive pump.
pub(crate) struct DeviceShared {
    transport: Arc<dyn Transport>,
    config: HostConfig,
    motion: Arc<Mutex<MotionState>>,
    light: Arc<Mutex<LightState>>,
    camera: Arc<Mutex<CameraState>>,
    broker: RpcBroker,
    log: Mutex<Vec<LogResponseMessage>>,
    events: mpsc::UnboundedSender<DeviceEvent>,
}

impl DeviceShared {
    /// Encodes and writes one message, with an up-front connection check.
    pub(crate) fn transmit_message(&self, msg: &Message) -> Result<(), DeviceError> {
        if !self.transport.is_connected() {
            return Err(DeviceError::NotConnected);
        }
        let bytes = encode_message(msg);
        if self.config.wire.debug {
            trace!("tx {} bytes: {}", bytes.len(), hex_dump(&bytes));
        }
        self.transport.transmit(&bytes)?;
        Ok(())
    }

    /// Runs one parameter RPC: register a completion slot, transmit, await
    /// the response within the configured budget.
    async fn call(&self, kind: RequestKind, request: &Message) -> Result<Message, DeviceError> {
        if !self.transport.is_connected() {
            return Err(DeviceError::NotConnected);
        }

        let (generation, rx) = self.broker.register(kind);
        if let Err(err) = self.transmit_message(request) {
            self.broker.cancel(kind, generation);
            return Err(err);
        }

        match tokio::time::timeout(self.config.response.budget(), rx).await {
            Ok(Ok(msg)) => Ok(msg),
            // The sender dropped: a newer call superseded this one.
            Ok(Err(_)) => Err(DeviceError::Timeout { kind }),
            Err(_) => {
                self.broker.cancel(kind, generation);
                Err(DeviceError::Timeout { kind })
            }
        }
    }

    fn dispatch(&self, msg: Message) {
        debug!("received {:?}", msg.message_type());
        match msg {
            Message::MotionStatus(m) => {
                self.motion
                    .lock()
                    .expect("lock poisoned")
                    .observe(&m, self.config.sync.epsilon);
                self.emit(DeviceEvent::MotionStatus(m));
            }
            Message::LightStatus(m) => {
                self.light
                    .lock()
                    .expect("lock poisoned")
                    .observe(&m, self.config.sync.epsilon);
                self.emit(DeviceEvent::LightStatus(m));
            }
            Message::CameraStatus(m) => {
                self.camera
                    .lock()
                    .expect("lock poisoned")
                    .observe(&m, self.config.sync.epsilon);
                self.emit(DeviceEvent::CameraStatus(m));
            }
            Message::MotionTrigger(m) => self.emit(DeviceEvent::MotionTriggered(m)),
            Message::LogResponse(m) => {
                self.log.lock().expect("lock poisoned").push(m);
                self.emit(DeviceEvent::LogEntry(m));
            }
            Message::GetUint16Response(_)
            | Message::SetUint16Response(_)
            | Message::GetFloatResponse(_)
            | Message::SetFloatResponse(_) => {
                if !self.broker.complete(&msg) {
                    debug!("dropping unsolicited {:?}", msg.message_type());
                }
            }
            other => {
                warn!("ignoring {:?} sent by the device", other.message_type());
            }
        }
    }

    fn emit(&self, event: DeviceEvent) {
        // The consumer may have dropped the event receiver.
        let _ = self.events.send(event);
    }
}

/// Handle to one attached CamTrig board.
///
/// Dropping the handle stops the receive pump. Facet handles obtained from
/// [`motion`](Self::motion), [`light`](Self::light) and
/// [`camera`](Self::camera) keep answering reads afterwards.
pub struct Device {
    shared: Arc<DeviceShared>,
    pump: JoinHandle<()>,
}

impl Device {
    /// Attaches to an established link and spawns the receive pump.
    ///
    /// `notifications` delivers raw received chunks in arrival order; the
    /// chunking is arbitrary and carries no message-boundary guarantee.
    /// Returns the device together with the event receiver.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn attach(
        transport: Arc<dyn Transport>,
        notifications: mpsc::UnboundedReceiver<Vec<u8>>,
        config: HostConfig,
    ) -> (Self, mpsc::UnboundedReceiver<DeviceEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(DeviceShared {
            transport,
            config,
            motion: Arc::new(Mutex::new(MotionState::default())),
            light: Arc::new(Mutex::new(LightState::default())),
            camera: Arc::new(Mutex::new(CameraState::default())),
            broker: RpcBroker::new(),
            log: Mutex::new(Vec::new()),
            events: event_tx,
        });

        let pump = tokio::spawn(run_pump(Arc::downgrade(&shared), notifications));
        (Self { shared, pump }, event_rx)
    }

    /// Reports whether the transport link is currently up.
    pub fn is_connected(&self) -> bool {
        self.shared.transport.is_connected()
    }

    /// Polls the link until it is up, bounded by `timeout`.
    ///
    /// Returns `true` when the link came up in time.
    pub async fn wait_connected(&self, timeout: Duration) -> bool {
        let poll = self.shared.config.device.connect_poll();
        tokio::time::timeout(timeout, async {
            while !self.shared.transport.is_connected() {
                tokio::time::sleep(poll).await;
            }
        })
        .await
        .is_ok()
    }

    // ── Facets ────────────────────────────────────────────────────────────────

    /// Motion-sensor facet handle.
    pub fn motion(&self) -> MotionSensor {
        MotionSensor::new(Arc::clone(&self.shared.motion), Arc::downgrade(&self.shared))
    }

    /// Light facet handle.
    pub fn light(&self) -> LightBoard {
        LightBoard::new(Arc::clone(&self.shared.light), Arc::downgrade(&self.shared))
    }

    /// Camera facet handle.
    pub fn camera(&self) -> CameraBoard {
        CameraBoard::new(Arc::clone(&self.shared.camera), Arc::downgrade(&self.shared))
    }

    // ── One-way operations ────────────────────────────────────────────────────

    /// Asks the board to send the log entry at `index`.
    ///
    /// The entry arrives later as [`DeviceEvent::LogEntry`].
    pub fn request_log(&self, index: u16) -> Result<(), DeviceError> {
        self.shared
            .transmit_message(&Message::LogRequest(LogRequestMessage { index }))
    }

    /// Clears the board's stored log.
    pub fn reset_log(&self) -> Result<(), DeviceError> {
        self.shared.transmit_message(&Message::LogReset)
    }

    /// Sets the board's clock.
    pub fn set_time(&self, time: Calendar) -> Result<(), DeviceError> {
        self.shared
            .transmit_message(&Message::SetTime(SetTimeMessage { time }))
    }

    /// Sends a motion trigger, firing downstream boards as if the sensor had
    /// seen motion.
    pub fn trigger(&self, motion: u16, lux: f32) -> Result<(), DeviceError> {
        self.shared
            .transmit_message(&Message::MotionTrigger(MotionTriggerMessage { motion, lux }))
    }

    /// Copy of the log entries collected since attach.
    pub fn log(&self) -> Vec<LogResponseMessage> {
        self.shared.log.lock().expect("lock poisoned").clone()
    }

    // ── Parameter RPCs ────────────────────────────────────────────────────────

    /// Reads a uint16 parameter by id.
    pub async fn get_uint16(
        &self,
        id: u16,
        persist: bool,
    ) -> Result<GetUint16ResponseMessage, DeviceError> {
        let request = Message::GetUint16Request(GetUint16RequestMessage { id, persist });
        match self.shared.call(RequestKind::GetUint16, &request).await? {
            Message::GetUint16Response(m) => Ok(m),
            _ => Err(DeviceError::UnexpectedResponse {
                kind: RequestKind::GetUint16,
            }),
        }
    }

    /// Writes a uint16 parameter by id.
    pub async fn set_uint16(
        &self,
        id: u16,
        persist: bool,
        value: u16,
    ) -> Result<SetUint16ResponseMessage, DeviceError> {
        let request = Message::SetUint16Request(SetUint16RequestMessage { id, persist, value });
        match self.shared.call(RequestKind::SetUint16, &request).await? {
            Message::SetUint16Response(m) => Ok(m),
            _ => Err(DeviceError::UnexpectedResponse {
                kind: RequestKind::SetUint16,
            }),
        }
    }

    /// Reads a float parameter by id.
    pub async fn get_float(
        &self,
        id: u16,
        persist: bool,
    ) -> Result<GetFloatResponseMessage, DeviceError> {
        let request = Message::GetFloatRequest(GetFloatRequestMessage { id, persist });
        match self.shared.call(RequestKind::GetFloat, &request).await? {
            Message::GetFloatResponse(m) => Ok(m),
            _ => Err(DeviceError::UnexpectedResponse {
                kind: RequestKind::GetFloat,
            }),
        }
    }

    /// Writes a float parameter by id.
    pub async fn set_float(
        &self,
        id: u16,
        persist: bool,
        value: f32,
    ) -> Result<SetFloatResponseMessage, DeviceError> {
        let request = Message::SetFloatRequest(SetFloatRequestMessage { id, persist, value });
        match self.shared.call(RequestKind::SetFloat, &request).await? {
            Message::SetFloatResponse(m) => Ok(m),
            _ => Err(DeviceError::UnexpectedResponse {
                kind: RequestKind::SetFloat,
            }),
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Receive pump: reassembles messages from notification chunks and
/// dispatches them until the channel closes or the device is dropped.
async fn run_pump(shared: Weak<DeviceShared>, mut notifications: mpsc::UnboundedReceiver<Vec<u8>>) {
    let mut decoder = StreamDecoder::new();

    while let Some(chunk) = notifications.recv().await {
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if shared.config.wire.debug {
            trace!("rx {} bytes: {}", chunk.len(), hex_dump(&chunk));
        }

        decoder.feed(&chunk);
        loop {
            match decoder.try_decode() {
                Ok(Some(msg)) => shared.dispatch(msg),
                Ok(None) => break,
                Err(err) => {
                    warn!("notification stream decode error: {err}");
                    shared.emit(DeviceEvent::DecodeFailed(err));
                }
            }
        }
    }
}

fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
