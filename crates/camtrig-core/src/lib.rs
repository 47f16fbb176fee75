//! Core protocol library for CamTrig sensor and camera-trigger boards.
//!
//! This crate defines the fixed-size binary messages the boards speak, a
//! codec for turning them into bytes and back, and a stream decoder that
//! reassembles messages from arbitrarily fragmented notification chunks.
//! Host-side device logic lives in the `camtrig-host` crate.

pub mod protocol;

pub use protocol::calendar::Calendar;
pub use protocol::codec::{decode_message, encode_message, DecodeError};
pub use protocol::decoder::StreamDecoder;
pub use protocol::messages::{Message, MessageType, HEADER_SIZE};
