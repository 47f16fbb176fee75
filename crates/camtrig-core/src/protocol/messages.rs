//! All CamTrig wire message types.
//!
//! Every message is a fixed-size big-endian record prefixed by a two-byte
//! header: the type code and the total encoded length (header included).
//! The length is a static property of the type; there are no variable-length
//! fields anywhere on this wire.

use crate::protocol::calendar::Calendar;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Size of the common `[type, length]` header in bytes.
pub const HEADER_SIZE: usize = 2;

// ── Message type codes ────────────────────────────────────────────────────────

/// All message type codes understood by host and boards.
///
/// The high nibble groups codes by facet: `0x0_` board-generic, `0x1_` motion,
/// `0x2_` light, `0x3_` camera, `0x4_` parameter get/set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    // Board-generic (0x00–0x0F)
    LogRequest = 0x01,
    LogResponse = 0x02,
    LogReset = 0x03,
    SetTime = 0x04,
    // Motion board (0x10–0x1F)
    MotionConfig = 0x10,
    MotionStatus = 0x11,
    MotionTrigger = 0x12,
    // Light board (0x20–0x2F)
    LightConfig = 0x20,
    LightStatus = 0x21,
    // Camera board (0x30–0x3F)
    CameraConfig = 0x30,
    CameraStatus = 0x31,
    // Parameter access (0x40–0x4F)
    GetFloatRequest = 0x40,
    GetFloatResponse = 0x41,
    SetFloatRequest = 0x42,
    SetFloatResponse = 0x43,
    GetUint16Request = 0x44,
    GetUint16Response = 0x45,
    SetUint16Request = 0x46,
    SetUint16Response = 0x47,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x01 => Ok(MessageType::LogRequest),
            0x02 => Ok(MessageType::LogResponse),
            0x03 => Ok(MessageType::LogReset),
            0x04 => Ok(MessageType::SetTime),
            0x10 => Ok(MessageType::MotionConfig),
            0x11 => Ok(MessageType::MotionStatus),
            0x12 => Ok(MessageType::MotionTrigger),
            0x20 => Ok(MessageType::LightConfig),
            0x21 => Ok(MessageType::LightStatus),
            0x30 => Ok(MessageType::CameraConfig),
            0x31 => Ok(MessageType::CameraStatus),
            0x40 => Ok(MessageType::GetFloatRequest),
            0x41 => Ok(MessageType::GetFloatResponse),
            0x42 => Ok(MessageType::SetFloatRequest),
            0x43 => Ok(MessageType::SetFloatResponse),
            0x44 => Ok(MessageType::GetUint16Request),
            0x45 => Ok(MessageType::GetUint16Response),
            0x46 => Ok(MessageType::SetUint16Request),
            0x47 => Ok(MessageType::SetUint16Response),
            _ => Err(()),
        }
    }
}

impl MessageType {
    /// Total encoded size of a message of this type, header included.
    ///
    /// Byte 1 of every well-formed message equals this value; the stream
    /// decoder rejects headers where it does not.
    pub const fn wire_size(self) -> usize {
        match self {
            MessageType::LogRequest => 4,
            MessageType::LogResponse => 22,
            MessageType::LogReset => 2,
            MessageType::SetTime => 10,
            MessageType::MotionConfig => 16,
            MessageType::MotionStatus => 36,
            MessageType::MotionTrigger => 8,
            MessageType::LightConfig => 22,
            MessageType::LightStatus => 36,
            MessageType::CameraConfig => 6,
            MessageType::CameraStatus => 20,
            MessageType::GetFloatRequest => 5,
            MessageType::GetFloatResponse => 9,
            MessageType::SetFloatRequest => 9,
            MessageType::SetFloatResponse => 9,
            MessageType::GetUint16Request => 5,
            MessageType::GetUint16Response => 7,
            MessageType::SetUint16Request => 7,
            MessageType::SetUint16Response => 7,
        }
    }
}

// ── Board-generic messages ────────────────────────────────────────────────────

/// LOG_REQUEST (0x01): host asks the board for one stored log entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogRequestMessage {
    /// Zero-based index into the board's log ring.
    pub index: u16,
}

/// LOG_RESPONSE (0x02): one stored log entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogResponseMessage {
    /// Index of this entry in the board's log ring.
    pub index: u16,
    /// Board-local time the entry was recorded.
    pub timestamp: Calendar,
    /// Ambient light at record time, in lux.
    pub lux: f32,
    /// Motion sensor reading at record time (raw ADC counts).
    pub motion: u16,
    /// Board temperature at record time, in degrees Celsius.
    pub temperature: f32,
}

/// SET_TIME (0x04): host pushes wall-clock time to the board.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetTimeMessage {
    /// New board-local time.
    pub time: Calendar,
}

// ── Motion board messages ─────────────────────────────────────────────────────

/// MOTION_CONFIG (0x10): host sets the motion board's trigger parameters.
///
/// A config message always carries every field; the facet layer fills
/// untouched fields from the last observed status before transmitting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionConfigMessage {
    /// Motion reading above which the board triggers (raw ADC counts).
    pub motion_threshold: u16,
    /// Lux below which triggering is armed (dusk gate).
    pub lux_low_threshold: f32,
    /// Lux above which triggering is armed again (dawn gate).
    pub lux_high_threshold: f32,
    /// Seconds the board stays quiet after a trigger.
    pub cooldown: f32,
}

/// MOTION_STATUS (0x11): periodic motion board telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionStatusMessage {
    /// Board-local time the status was generated.
    pub timestamp: Calendar,
    /// Current ambient light, in lux.
    pub lux: f32,
    /// Active dusk gate threshold.
    pub lux_low_threshold: f32,
    /// Active dawn gate threshold.
    pub lux_high_threshold: f32,
    /// Board temperature in degrees Celsius.
    pub temperature: f32,
    /// Latest motion sensor reading (raw ADC counts).
    pub motion: u16,
    /// Active trigger threshold.
    pub motion_threshold: u16,
    /// Active cooldown in seconds.
    pub cooldown: f32,
    /// Number of entries in the board's log ring.
    pub log_entries: u16,
}

/// MOTION_TRIGGER (0x12): a trigger event.
///
/// Sent by the motion board when it fires, and by the host to fire boards
/// manually.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionTriggerMessage {
    /// Motion reading that caused the trigger (raw ADC counts).
    pub motion: u16,
    /// Ambient light at trigger time, in lux.
    pub lux: f32,
}

// ── Light board messages ──────────────────────────────────────────────────────

/// LIGHT_CONFIG (0x20): host sets the light board's envelope parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightConfigMessage {
    /// Peak brightness, 0.0–1.0.
    pub level: f32,
    /// Seconds between trigger and ramp start.
    pub delay: f32,
    /// Ramp-up time in seconds.
    pub attack: f32,
    /// Hold time at peak in seconds.
    pub sustain: f32,
    /// Ramp-down time in seconds.
    pub release: f32,
}

/// LIGHT_STATUS (0x21): periodic light board telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightStatusMessage {
    /// Board-local time the status was generated.
    pub timestamp: Calendar,
    /// Active peak brightness, 0.0–1.0.
    pub level: f32,
    /// Active pre-ramp delay in seconds.
    pub delay: f32,
    /// Active ramp-up time in seconds.
    pub attack: f32,
    /// Active hold time in seconds.
    pub sustain: f32,
    /// Active ramp-down time in seconds.
    pub release: f32,
    /// Board temperature in degrees Celsius.
    pub temperature: f32,
    /// Number of entries in the board's log ring.
    pub log_entries: u16,
}

// ── Camera board messages ─────────────────────────────────────────────────────

/// CAMERA_CONFIG (0x30): host sets the camera board's shutter duration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraConfigMessage {
    /// Seconds the shutter output is held active per trigger.
    pub duration: f32,
}

/// CAMERA_STATUS (0x31): periodic camera board telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraStatusMessage {
    /// Board-local time the status was generated.
    pub timestamp: Calendar,
    /// Active shutter duration in seconds.
    pub duration: f32,
    /// Board temperature in degrees Celsius.
    pub temperature: f32,
    /// Number of entries in the board's log ring.
    pub log_entries: u16,
}

// ── Parameter access messages ─────────────────────────────────────────────────

/// GET_FLOAT_REQUEST (0x40): read a float parameter by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GetFloatRequestMessage {
    /// Board-defined parameter id.
    pub id: u16,
    /// When true, the board reads the persisted value instead of the live one.
    pub persist: bool,
}

/// GET_FLOAT_RESPONSE (0x41): acknowledgement for a float read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GetFloatResponseMessage {
    /// Parameter id being acknowledged.
    pub id: u16,
    /// Current parameter value.
    pub value: f32,
    /// Board-reported success flag, passed through uninterpreted.
    pub success: bool,
}

/// SET_FLOAT_REQUEST (0x42): write a float parameter by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetFloatRequestMessage {
    /// Board-defined parameter id.
    pub id: u16,
    /// When true, the board persists the value across power cycles.
    pub persist: bool,
    /// Value to write.
    pub value: f32,
}

/// SET_FLOAT_RESPONSE (0x43): acknowledgement for a float write.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetFloatResponseMessage {
    /// Parameter id being acknowledged.
    pub id: u16,
    /// Value the board actually applied.
    pub value: f32,
    /// Board-reported success flag, passed through uninterpreted.
    pub success: bool,
}

/// GET_UINT16_REQUEST (0x44): read a u16 parameter by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GetUint16RequestMessage {
    /// Board-defined parameter id.
    pub id: u16,
    /// When true, the board reads the persisted value instead of the live one.
    pub persist: bool,
}

/// GET_UINT16_RESPONSE (0x45): acknowledgement for a u16 read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GetUint16ResponseMessage {
    /// Parameter id being acknowledged.
    pub id: u16,
    /// Current parameter value.
    pub value: u16,
    /// Board-reported success flag, passed through uninterpreted.
    pub success: bool,
}

/// SET_UINT16_REQUEST (0x46): write a u16 parameter by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetUint16RequestMessage {
    /// Board-defined parameter id.
    pub id: u16,
    /// When true, the board persists the value across power cycles.
    pub persist: bool,
    /// Value to write.
    pub value: u16,
}

/// SET_UINT16_RESPONSE (0x47): acknowledgement for a u16 write.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetUint16ResponseMessage {
    /// Parameter id being acknowledged.
    pub id: u16,
    /// Value the board actually applied.
    pub value: u16,
    /// Board-reported success flag, passed through uninterpreted.
    pub success: bool,
}

// ── Top-level message enum ────────────────────────────────────────────────────

/// All valid CamTrig messages, discriminated by type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    LogRequest(LogRequestMessage),
    LogResponse(LogResponseMessage),
    LogReset,
    SetTime(SetTimeMessage),
    MotionConfig(MotionConfigMessage),
    MotionStatus(MotionStatusMessage),
    MotionTrigger(MotionTriggerMessage),
    LightConfig(LightConfigMessage),
    LightStatus(LightStatusMessage),
    CameraConfig(CameraConfigMessage),
    CameraStatus(CameraStatusMessage),
    GetFloatRequest(GetFloatRequestMessage),
    GetFloatResponse(GetFloatResponseMessage),
    SetFloatRequest(SetFloatRequestMessage),
    SetFloatResponse(SetFloatResponseMessage),
    GetUint16Request(GetUint16RequestMessage),
    GetUint16Response(GetUint16ResponseMessage),
    SetUint16Request(SetUint16RequestMessage),
    SetUint16Response(SetUint16ResponseMessage),
}

impl Message {
    /// Returns the [`MessageType`] discriminant for this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::LogRequest(_) => MessageType::LogRequest,
            Message::LogResponse(_) => MessageType::LogResponse,
            Message::LogReset => MessageType::LogReset,
            Message::SetTime(_) => MessageType::SetTime,
            Message::MotionConfig(_) => MessageType::MotionConfig,
            Message::MotionStatus(_) => MessageType::MotionStatus,
            Message::MotionTrigger(_) => MessageType::MotionTrigger,
            Message::LightConfig(_) => MessageType::LightConfig,
            Message::LightStatus(_) => MessageType::LightStatus,
            Message::CameraConfig(_) => MessageType::CameraConfig,
            Message::CameraStatus(_) => MessageType::CameraStatus,
            Message::GetFloatRequest(_) => MessageType::GetFloatRequest,
            Message::GetFloatResponse(_) => MessageType::GetFloatResponse,
            Message::SetFloatRequest(_) => MessageType::SetFloatRequest,
            Message::SetFloatResponse(_) => MessageType::SetFloatResponse,
            Message::GetUint16Request(_) => MessageType::GetUint16Request,
            Message::GetUint16Response(_) => MessageType::GetUint16Response,
            Message::SetUint16Request(_) => MessageType::SetUint16Request,
            Message::SetUint16Response(_) => MessageType::SetUint16Response,
        }
    }

    /// Total encoded size of this message, header included.
    pub fn wire_size(&self) -> usize {
        self.message_type().wire_size()
    }
}
