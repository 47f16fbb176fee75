//! Round-trip tests exercising the public protocol API end to end: every
//! message variant is encoded, pushed through the stream decoder, and
//! compared with the original.

use camtrig_core::{encode_message, Calendar, Message, StreamDecoder};
use camtrig_core::protocol::messages::{
    CameraConfigMessage, CameraStatusMessage, GetFloatRequestMessage, GetFloatResponseMessage,
    GetUint16RequestMessage, GetUint16ResponseMessage, LightConfigMessage, LightStatusMessage,
    LogRequestMessage, LogResponseMessage, MotionConfigMessage, MotionStatusMessage,
    MotionTriggerMessage, SetFloatRequestMessage, SetFloatResponseMessage, SetTimeMessage,
    SetUint16RequestMessage, SetUint16ResponseMessage,
};

fn timestamp() -> Calendar {
    Calendar {
        seconds: 5,
        minutes: 20,
        hours: 23,
        day_of_week: 6,
        day_of_month: 31,
        month: 8,
        year: 2025,
    }
}

fn through_stream(msg: Message) -> Message {
    let mut decoder = StreamDecoder::new();
    decoder.feed(&encode_message(&msg));
    decoder
        .try_decode()
        .expect("decode must succeed")
        .expect("one full message was fed")
}

#[test]
fn test_roundtrip_log_request() {
    let msg = Message::LogRequest(LogRequestMessage { index: 17 });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_log_response() {
    let msg = Message::LogResponse(LogResponseMessage {
        index: 17,
        timestamp: timestamp(),
        lux: 312.5,
        motion: 1999,
        temperature: -4.25,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_log_reset() {
    assert_eq!(through_stream(Message::LogReset), Message::LogReset);
}

#[test]
fn test_roundtrip_set_time() {
    let msg = Message::SetTime(SetTimeMessage { time: timestamp() });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_motion_config() {
    let msg = Message::MotionConfig(MotionConfigMessage {
        motion_threshold: 768,
        lux_low_threshold: 2.5,
        lux_high_threshold: 120.0,
        cooldown: 45.0,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_motion_status() {
    let msg = Message::MotionStatus(MotionStatusMessage {
        timestamp: timestamp(),
        lux: 64.0,
        lux_low_threshold: 2.5,
        lux_high_threshold: 120.0,
        temperature: 31.25,
        motion: 640,
        motion_threshold: 768,
        cooldown: 45.0,
        log_entries: 250,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_motion_trigger() {
    let msg = Message::MotionTrigger(MotionTriggerMessage {
        motion: 4096,
        lux: 0.125,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_light_config() {
    let msg = Message::LightConfig(LightConfigMessage {
        level: 0.65,
        delay: 0.0,
        attack: 3.0,
        sustain: 10.0,
        release: 5.0,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_light_status() {
    let msg = Message::LightStatus(LightStatusMessage {
        timestamp: timestamp(),
        level: 0.65,
        delay: 0.0,
        attack: 3.0,
        sustain: 10.0,
        release: 5.0,
        temperature: 27.5,
        log_entries: 3,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_camera_config() {
    let msg = Message::CameraConfig(CameraConfigMessage { duration: 1.5 });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_camera_status() {
    let msg = Message::CameraStatus(CameraStatusMessage {
        timestamp: timestamp(),
        duration: 1.5,
        temperature: 22.0,
        log_entries: 65535,
    });
    assert_eq!(through_stream(msg), msg);
}

#[test]
fn test_roundtrip_float_rpc_messages() {
    let messages = [
        Message::GetFloatRequest(GetFloatRequestMessage {
            id: 300,
            persist: true,
        }),
        Message::GetFloatResponse(GetFloatResponseMessage {
            id: 300,
            value: 9.75,
            success: true,
        }),
        Message::SetFloatRequest(SetFloatRequestMessage {
            id: 301,
            persist: false,
            value: -9.75,
        }),
        Message::SetFloatResponse(SetFloatResponseMessage {
            id: 301,
            value: -9.75,
            success: false,
        }),
    ];
    for msg in messages {
        assert_eq!(through_stream(msg), msg);
    }
}

#[test]
fn test_roundtrip_uint16_rpc_messages() {
    let messages = [
        Message::GetUint16Request(GetUint16RequestMessage {
            id: 40,
            persist: false,
        }),
        Message::GetUint16Response(GetUint16ResponseMessage {
            id: 40,
            value: 0xBEEF,
            success: true,
        }),
        Message::SetUint16Request(SetUint16RequestMessage {
            id: 41,
            persist: true,
            value: 0,
        }),
        Message::SetUint16Response(SetUint16ResponseMessage {
            id: 41,
            value: 0,
            success: true,
        }),
    ];
    for msg in messages {
        assert_eq!(through_stream(msg), msg);
    }
}

#[test]
fn test_mixed_stream_survives_notification_sized_chunks() {
    let messages = vec![
        Message::SetTime(SetTimeMessage { time: timestamp() }),
        Message::MotionConfig(MotionConfigMessage {
            motion_threshold: 768,
            lux_low_threshold: 2.5,
            lux_high_threshold: 120.0,
            cooldown: 45.0,
        }),
        Message::LogReset,
        Message::GetFloatRequest(GetFloatRequestMessage {
            id: 300,
            persist: true,
        }),
    ];
    let stream: Vec<u8> = messages.iter().flat_map(encode_message).collect();

    // 20 bytes is a typical BLE notification payload.
    let mut decoder = StreamDecoder::new();
    let mut decoded = Vec::new();
    for chunk in stream.chunks(20) {
        decoder.feed(chunk);
        while let Some(msg) = decoder.try_decode().expect("stream must stay clean") {
            decoded.push(msg);
        }
    }

    assert_eq!(decoded, messages);
}
