//! Binary codec for encoding and decoding CamTrig board messages.
//!
//! Wire format:
//! ```text
//! [type:1][length:1][fields:length-2]
//! ```
//! `length` counts the whole message including the two header bytes and is a
//! static property of the type. All multi-byte integers and floats are
//! big-endian; floats are IEEE-754 single precision; booleans are one byte
//! with zero meaning false.

use crate::protocol::calendar::Calendar;
use crate::protocol::messages::{
    CameraConfigMessage, CameraStatusMessage, GetFloatRequestMessage, GetFloatResponseMessage,
    GetUint16RequestMessage, GetUint16ResponseMessage, LightConfigMessage, LightStatusMessage,
    LogRequestMessage, LogResponseMessage, Message, MessageType, MotionConfigMessage,
    MotionStatusMessage, MotionTriggerMessage, SetFloatRequestMessage, SetFloatResponseMessage,
    SetTimeMessage, SetUint16RequestMessage, SetUint16ResponseMessage, HEADER_SIZE,
};
use thiserror::Error;

/// Errors that can occur while decoding a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte slice is shorter than the fixed size for this type.
    #[error("truncated frame: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// The type byte in the header has no known length definition.
    #[error("unknown message type 0x{code:02X}")]
    UnknownType { code: u8 },

    /// The length byte in the header does not match the type's fixed size.
    #[error("{msg_type:?} header declares {declared} bytes, wire size is {expected}")]
    LengthMismatch {
        msg_type: MessageType,
        declared: u8,
        expected: usize,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`Message`] into a byte vector including the two-byte header.
///
/// Encoding cannot fail: every message is a fixed-size record of plain
/// scalars.
///
/// # Examples
///
/// ```rust
/// use camtrig_core::protocol::codec::{decode_message, encode_message};
/// use camtrig_core::protocol::messages::{Message, MotionTriggerMessage};
///
/// let msg = Message::MotionTrigger(MotionTriggerMessage { motion: 900, lux: 12.5 });
/// let bytes = encode_message(&msg);
/// assert_eq!(bytes.len(), 8);
/// assert_eq!(decode_message(&bytes).unwrap(), msg);
/// ```
pub fn encode_message(msg: &Message) -> Vec<u8> {
    let msg_type = msg.message_type();
    let size = msg_type.wire_size();

    let mut buf = Vec::with_capacity(size);
    buf.push(msg_type as u8);
    buf.push(size as u8);

    match msg {
        Message::LogRequest(m) => encode_log_request(&mut buf, m),
        Message::LogResponse(m) => encode_log_response(&mut buf, m),
        Message::LogReset => {} // header only
        Message::SetTime(m) => encode_set_time(&mut buf, m),
        Message::MotionConfig(m) => encode_motion_config(&mut buf, m),
        Message::MotionStatus(m) => encode_motion_status(&mut buf, m),
        Message::MotionTrigger(m) => encode_motion_trigger(&mut buf, m),
        Message::LightConfig(m) => encode_light_config(&mut buf, m),
        Message::LightStatus(m) => encode_light_status(&mut buf, m),
        Message::CameraConfig(m) => encode_camera_config(&mut buf, m),
        Message::CameraStatus(m) => encode_camera_status(&mut buf, m),
        Message::GetFloatRequest(m) => encode_get_float_request(&mut buf, m),
        Message::GetFloatResponse(m) => encode_get_float_response(&mut buf, m),
        Message::SetFloatRequest(m) => encode_set_float_request(&mut buf, m),
        Message::SetFloatResponse(m) => encode_set_float_response(&mut buf, m),
        Message::GetUint16Request(m) => encode_get_uint16_request(&mut buf, m),
        Message::GetUint16Response(m) => encode_get_uint16_response(&mut buf, m),
        Message::SetUint16Request(m) => encode_set_uint16_request(&mut buf, m),
        Message::SetUint16Response(m) => encode_set_uint16_response(&mut buf, m),
    }

    debug_assert_eq!(buf.len(), size, "encoding must match the wire size table");
    buf
}

/// Decodes one [`Message`] from `frame`.
///
/// `frame` must start with the two-byte header and contain the full record;
/// the stream decoder always hands over exactly one message's bytes. Trailing
/// bytes beyond the declared record are not read.
///
/// # Errors
///
/// Returns [`DecodeError`] if the type is unknown, the declared length does
/// not match the type's fixed size, or the slice is too short.
///
/// # Examples
///
/// ```rust
/// use camtrig_core::protocol::codec::decode_message;
/// use camtrig_core::protocol::messages::Message;
///
/// let decoded = decode_message(&[0x03, 0x02]).unwrap();
/// assert_eq!(decoded, Message::LogReset);
/// ```
pub fn decode_message(frame: &[u8]) -> Result<Message, DecodeError> {
    if frame.len() < HEADER_SIZE {
        return Err(DecodeError::Truncated {
            needed: HEADER_SIZE,
            available: frame.len(),
        });
    }

    let code = frame[0];
    let msg_type = MessageType::try_from(code).map_err(|_| DecodeError::UnknownType { code })?;

    let expected = msg_type.wire_size();
    let declared = frame[1];
    if declared as usize != expected {
        return Err(DecodeError::LengthMismatch {
            msg_type,
            declared,
            expected,
        });
    }
    if frame.len() < expected {
        return Err(DecodeError::Truncated {
            needed: expected,
            available: frame.len(),
        });
    }

    let p = &frame[HEADER_SIZE..expected];
    let msg = match msg_type {
        MessageType::LogRequest => Message::LogRequest(decode_log_request(p)),
        MessageType::LogResponse => Message::LogResponse(decode_log_response(p)),
        MessageType::LogReset => Message::LogReset,
        MessageType::SetTime => Message::SetTime(decode_set_time(p)),
        MessageType::MotionConfig => Message::MotionConfig(decode_motion_config(p)),
        MessageType::MotionStatus => Message::MotionStatus(decode_motion_status(p)),
        MessageType::MotionTrigger => Message::MotionTrigger(decode_motion_trigger(p)),
        MessageType::LightConfig => Message::LightConfig(decode_light_config(p)),
        MessageType::LightStatus => Message::LightStatus(decode_light_status(p)),
        MessageType::CameraConfig => Message::CameraConfig(decode_camera_config(p)),
        MessageType::CameraStatus => Message::CameraStatus(decode_camera_status(p)),
        MessageType::GetFloatRequest => Message::GetFloatRequest(decode_get_float_request(p)),
        MessageType::GetFloatResponse => Message::GetFloatResponse(decode_get_float_response(p)),
        MessageType::SetFloatRequest => Message::SetFloatRequest(decode_set_float_request(p)),
        MessageType::SetFloatResponse => Message::SetFloatResponse(decode_set_float_response(p)),
        MessageType::GetUint16Request => Message::GetUint16Request(decode_get_uint16_request(p)),
        MessageType::GetUint16Response => {
            Message::GetUint16Response(decode_get_uint16_response(p))
        }
        MessageType::SetUint16Request => Message::SetUint16Request(decode_set_uint16_request(p)),
        MessageType::SetUint16Response => {
            Message::SetUint16Response(decode_set_uint16_response(p))
        }
    };
    Ok(msg)
}

// ── Per-message encode helpers ────────────────────────────────────────────────

fn encode_log_request(buf: &mut Vec<u8>, m: &LogRequestMessage) {
    buf.extend_from_slice(&m.index.to_be_bytes());
}

fn encode_log_response(buf: &mut Vec<u8>, m: &LogResponseMessage) {
    buf.extend_from_slice(&m.index.to_be_bytes());
    encode_calendar(buf, &m.timestamp);
    buf.extend_from_slice(&m.lux.to_be_bytes());
    buf.extend_from_slice(&m.motion.to_be_bytes());
    buf.extend_from_slice(&m.temperature.to_be_bytes());
}

fn encode_set_time(buf: &mut Vec<u8>, m: &SetTimeMessage) {
    encode_calendar(buf, &m.time);
}

fn encode_motion_config(buf: &mut Vec<u8>, m: &MotionConfigMessage) {
    buf.extend_from_slice(&m.motion_threshold.to_be_bytes());
    buf.extend_from_slice(&m.lux_low_threshold.to_be_bytes());
    buf.extend_from_slice(&m.lux_high_threshold.to_be_bytes());
    buf.extend_from_slice(&m.cooldown.to_be_bytes());
}

fn encode_motion_status(buf: &mut Vec<u8>, m: &MotionStatusMessage) {
    encode_calendar(buf, &m.timestamp);
    buf.extend_from_slice(&m.lux.to_be_bytes());
    buf.extend_from_slice(&m.lux_low_threshold.to_be_bytes());
    buf.extend_from_slice(&m.lux_high_threshold.to_be_bytes());
    buf.extend_from_slice(&m.temperature.to_be_bytes());
    buf.extend_from_slice(&m.motion.to_be_bytes());
    buf.extend_from_slice(&m.motion_threshold.to_be_bytes());
    buf.extend_from_slice(&m.cooldown.to_be_bytes());
    buf.extend_from_slice(&m.log_entries.to_be_bytes());
}

fn encode_motion_trigger(buf: &mut Vec<u8>, m: &MotionTriggerMessage) {
    buf.extend_from_slice(&m.motion.to_be_bytes());
    buf.extend_from_slice(&m.lux.to_be_bytes());
}

fn encode_light_config(buf: &mut Vec<u8>, m: &LightConfigMessage) {
    buf.extend_from_slice(&m.level.to_be_bytes());
    buf.extend_from_slice(&m.delay.to_be_bytes());
    buf.extend_from_slice(&m.attack.to_be_bytes());
    buf.extend_from_slice(&m.sustain.to_be_bytes());
    buf.extend_from_slice(&m.release.to_be_bytes());
}

fn encode_light_status(buf: &mut Vec<u8>, m: &LightStatusMessage) {
    encode_calendar(buf, &m.timestamp);
    buf.extend_from_slice(&m.level.to_be_bytes());
    buf.extend_from_slice(&m.delay.to_be_bytes());
    buf.extend_from_slice(&m.attack.to_be_bytes());
    buf.extend_from_slice(&m.sustain.to_be_bytes());
    buf.extend_from_slice(&m.release.to_be_bytes());
    buf.extend_from_slice(&m.temperature.to_be_bytes());
    buf.extend_from_slice(&m.log_entries.to_be_bytes());
}

fn encode_camera_config(buf: &mut Vec<u8>, m: &CameraConfigMessage) {
    buf.extend_from_slice(&m.duration.to_be_bytes());
}

fn encode_camera_status(buf: &mut Vec<u8>, m: &CameraStatusMessage) {
    encode_calendar(buf, &m.timestamp);
    buf.extend_from_slice(&m.duration.to_be_bytes());
    buf.extend_from_slice(&m.temperature.to_be_bytes());
    buf.extend_from_slice(&m.log_entries.to_be_bytes());
}

fn encode_get_float_request(buf: &mut Vec<u8>, m: &GetFloatRequestMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.push(if m.persist { 0x01 } else { 0x00 });
}

fn encode_get_float_response(buf: &mut Vec<u8>, m: &GetFloatResponseMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.extend_from_slice(&m.value.to_be_bytes());
    buf.push(if m.success { 0x01 } else { 0x00 });
}

fn encode_set_float_request(buf: &mut Vec<u8>, m: &SetFloatRequestMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.push(if m.persist { 0x01 } else { 0x00 });
    buf.extend_from_slice(&m.value.to_be_bytes());
}

fn encode_set_float_response(buf: &mut Vec<u8>, m: &SetFloatResponseMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.extend_from_slice(&m.value.to_be_bytes());
    buf.push(if m.success { 0x01 } else { 0x00 });
}

fn encode_get_uint16_request(buf: &mut Vec<u8>, m: &GetUint16RequestMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.push(if m.persist { 0x01 } else { 0x00 });
}

fn encode_get_uint16_response(buf: &mut Vec<u8>, m: &GetUint16ResponseMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.extend_from_slice(&m.value.to_be_bytes());
    buf.push(if m.success { 0x01 } else { 0x00 });
}

fn encode_set_uint16_request(buf: &mut Vec<u8>, m: &SetUint16RequestMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.push(if m.persist { 0x01 } else { 0x00 });
    buf.extend_from_slice(&m.value.to_be_bytes());
}

fn encode_set_uint16_response(buf: &mut Vec<u8>, m: &SetUint16ResponseMessage) {
    buf.extend_from_slice(&m.id.to_be_bytes());
    buf.extend_from_slice(&m.value.to_be_bytes());
    buf.push(if m.success { 0x01 } else { 0x00 });
}

fn encode_calendar(buf: &mut Vec<u8>, c: &Calendar) {
    buf.push(c.seconds);
    buf.push(c.minutes);
    buf.push(c.hours);
    buf.push(c.day_of_week);
    buf.push(c.day_of_month);
    buf.push(c.month);
    buf.extend_from_slice(&c.year.to_be_bytes());
}

// ── Per-message decode helpers ────────────────────────────────────────────────
//
// Each helper receives the payload slice after the header, already validated
// to the type's fixed size, so field reads index directly.

fn decode_log_request(p: &[u8]) -> LogRequestMessage {
    LogRequestMessage {
        index: read_u16(p, 0),
    }
}

fn decode_log_response(p: &[u8]) -> LogResponseMessage {
    LogResponseMessage {
        index: read_u16(p, 0),
        timestamp: read_calendar(p, 2),
        lux: read_f32(p, 10),
        motion: read_u16(p, 14),
        temperature: read_f32(p, 16),
    }
}

fn decode_set_time(p: &[u8]) -> SetTimeMessage {
    SetTimeMessage {
        time: read_calendar(p, 0),
    }
}

fn decode_motion_config(p: &[u8]) -> MotionConfigMessage {
    MotionConfigMessage {
        motion_threshold: read_u16(p, 0),
        lux_low_threshold: read_f32(p, 2),
        lux_high_threshold: read_f32(p, 6),
        cooldown: read_f32(p, 10),
    }
}

fn decode_motion_status(p: &[u8]) -> MotionStatusMessage {
    MotionStatusMessage {
        timestamp: read_calendar(p, 0),
        lux: read_f32(p, 8),
        lux_low_threshold: read_f32(p, 12),
        lux_high_threshold: read_f32(p, 16),
        temperature: read_f32(p, 20),
        motion: read_u16(p, 24),
        motion_threshold: read_u16(p, 26),
        cooldown: read_f32(p, 28),
        log_entries: read_u16(p, 32),
    }
}

fn decode_motion_trigger(p: &[u8]) -> MotionTriggerMessage {
    MotionTriggerMessage {
        motion: read_u16(p, 0),
        lux: read_f32(p, 2),
    }
}

fn decode_light_config(p: &[u8]) -> LightConfigMessage {
    LightConfigMessage {
        level: read_f32(p, 0),
        delay: read_f32(p, 4),
        attack: read_f32(p, 8),
        sustain: read_f32(p, 12),
        release: read_f32(p, 16),
    }
}

fn decode_light_status(p: &[u8]) -> LightStatusMessage {
    LightStatusMessage {
        timestamp: read_calendar(p, 0),
        level: read_f32(p, 8),
        delay: read_f32(p, 12),
        attack: read_f32(p, 16),
        sustain: read_f32(p, 20),
        release: read_f32(p, 24),
        temperature: read_f32(p, 28),
        log_entries: read_u16(p, 32),
    }
}

fn decode_camera_config(p: &[u8]) -> CameraConfigMessage {
    CameraConfigMessage {
        duration: read_f32(p, 0),
    }
}

fn decode_camera_status(p: &[u8]) -> CameraStatusMessage {
    CameraStatusMessage {
        timestamp: read_calendar(p, 0),
        duration: read_f32(p, 8),
        temperature: read_f32(p, 12),
        log_entries: read_u16(p, 16),
    }
}

fn decode_get_float_request(p: &[u8]) -> GetFloatRequestMessage {
    GetFloatRequestMessage {
        id: read_u16(p, 0),
        persist: p[2] != 0,
    }
}

fn decode_get_float_response(p: &[u8]) -> GetFloatResponseMessage {
    GetFloatResponseMessage {
        id: read_u16(p, 0),
        value: read_f32(p, 2),
        success: p[6] != 0,
    }
}

fn decode_set_float_request(p: &[u8]) -> SetFloatRequestMessage {
    SetFloatRequestMessage {
        id: read_u16(p, 0),
        persist: p[2] != 0,
        value: read_f32(p, 3),
    }
}

fn decode_set_float_response(p: &[u8]) -> SetFloatResponseMessage {
    SetFloatResponseMessage {
        id: read_u16(p, 0),
        value: read_f32(p, 2),
        success: p[6] != 0,
    }
}

fn decode_get_uint16_request(p: &[u8]) -> GetUint16RequestMessage {
    GetUint16RequestMessage {
        id: read_u16(p, 0),
        persist: p[2] != 0,
    }
}

fn decode_get_uint16_response(p: &[u8]) -> GetUint16ResponseMessage {
    GetUint16ResponseMessage {
        id: read_u16(p, 0),
        value: read_u16(p, 2),
        success: p[4] != 0,
    }
}

fn decode_set_uint16_request(p: &[u8]) -> SetUint16RequestMessage {
    SetUint16RequestMessage {
        id: read_u16(p, 0),
        persist: p[2] != 0,
        value: read_u16(p, 3),
    }
}

fn decode_set_uint16_response(p: &[u8]) -> SetUint16ResponseMessage {
    SetUint16ResponseMessage {
        id: read_u16(p, 0),
        value: read_u16(p, 2),
        success: p[4] != 0,
    }
}

// ── Field readers ─────────────────────────────────────────────────────────────

fn read_u16(p: &[u8], off: usize) -> u16 {
    u16::from_be_bytes([p[off], p[off + 1]])
}

fn read_f32(p: &[u8], off: usize) -> f32 {
    f32::from_be_bytes([p[off], p[off + 1], p[off + 2], p[off + 3]])
}

fn read_calendar(p: &[u8], off: usize) -> Calendar {
    Calendar {
        seconds: p[off],
        minutes: p[off + 1],
        hours: p[off + 2],
        day_of_week: p[off + 3],
        day_of_month: p[off + 4],
        month: p[off + 5],
        year: read_u16(p, off + 6),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
