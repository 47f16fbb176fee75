//! Wire protocol shared by every CamTrig board.

pub mod calendar;
pub mod codec;
pub mod decoder;
pub mod messages;

pub use calendar::Calendar;
pub use codec::{decode_message, encode_message, DecodeError};
pub use decoder::StreamDecoder;
pub use messages::{Message, MessageType, HEADER_SIZE};
