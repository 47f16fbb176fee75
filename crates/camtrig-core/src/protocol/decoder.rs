//! Incremental decoder for a notification byte stream.
//!
//! Transports deliver message bytes in arbitrary chunks: a notification may
//! carry half a message, exactly one, or several back to back. The
//! [`StreamDecoder`] buffers whatever arrives and yields complete messages
//! regardless of how the stream was fragmented.

use bytes::{Buf, BytesMut};
use tracing::warn;

use crate::protocol::codec::{decode_message, DecodeError};
use crate::protocol::messages::{Message, MessageType, HEADER_SIZE};

/// Reassembles [`Message`]s from a fragmented byte stream.
///
/// Feed raw chunks with [`feed`](Self::feed), then call
/// [`try_decode`](Self::try_decode) until it returns `Ok(None)`.
///
/// # Examples
///
/// ```rust
/// use camtrig_core::protocol::decoder::StreamDecoder;
/// use camtrig_core::protocol::messages::Message;
///
/// let mut decoder = StreamDecoder::new();
/// decoder.feed(&[0x03]);
/// assert_eq!(decoder.try_decode().unwrap(), None);
/// decoder.feed(&[0x02]);
/// assert_eq!(decoder.try_decode().unwrap(), Some(Message::LogReset));
/// ```
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buf: BytesMut,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Appends a received chunk to the internal buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Attempts to decode the next complete message from the buffer.
    ///
    /// Returns `Ok(None)` when the buffer holds no complete message yet.
    /// Call in a loop after each [`feed`](Self::feed): a single chunk can
    /// complete more than one message.
    ///
    /// A header whose type byte is unknown cannot be sized, so the whole
    /// buffer is flushed and [`DecodeError::UnknownType`] reported once; the
    /// stream recovers at the next fed message boundary. A known type whose
    /// length byte disagrees with the size table is treated as a misaligned
    /// read and the buffer is shifted by one byte to resynchronize.
    pub fn try_decode(&mut self) -> Result<Option<Message>, DecodeError> {
        loop {
            if self.buf.len() < HEADER_SIZE {
                return Ok(None);
            }

            let code = self.buf[0];
            let Ok(msg_type) = MessageType::try_from(code) else {
                let dropped = self.buf.len();
                self.buf.clear();
                warn!("flushing {dropped} buffered bytes on unknown message type 0x{code:02X}");
                return Err(DecodeError::UnknownType { code });
            };

            let expected = msg_type.wire_size();
            let declared = self.buf[1] as usize;
            if declared != expected {
                // A shift here could leave a bare header that never completes.
                // Hold until a third byte arrives to keep peeking possible.
                if self.buf.len() <= HEADER_SIZE + 1 {
                    return Ok(None);
                }
                self.buf.advance(1);
                continue;
            }

            if self.buf.len() < expected {
                return Ok(None);
            }

            let frame = self.buf.split_to(expected);
            return decode_message(&frame).map(Some);
        }
    }
}
