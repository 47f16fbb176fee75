//! Completion broker for parameter RPCs.
//!
//! Boards answer four request kinds: get/set of a uint16 or float parameter
//! addressed by id. The wire carries no correlation token beyond the kind, so
//! the broker keeps at most one in-flight call per kind: a slot holding the
//! oneshot sender that the receive pump completes when the matching response
//! arrives. Slots carry a generation tag so an expired or superseded call can
//! never cancel or complete a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use camtrig_core::Message;
use tokio::sync::oneshot;

/// The four parameter RPC kinds a board answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    GetUint16,
    SetUint16,
    GetFloat,
    SetFloat,
}

impl RequestKind {
    fn slot_index(self) -> usize {
        match self {
            RequestKind::GetUint16 => 0,
            RequestKind::SetUint16 => 1,
            RequestKind::GetFloat => 2,
            RequestKind::SetFloat => 3,
        }
    }

    /// Classifies an inbound message as the response to one of the kinds.
    pub(crate) fn of_response(msg: &Message) -> Option<Self> {
        match msg {
            Message::GetUint16Response(_) => Some(RequestKind::GetUint16),
            Message::SetUint16Response(_) => Some(RequestKind::SetUint16),
            Message::GetFloatResponse(_) => Some(RequestKind::GetFloat),
            Message::SetFloatResponse(_) => Some(RequestKind::SetFloat),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    tx: oneshot::Sender<Message>,
}

/// One completion slot per request kind.
#[derive(Debug, Default)]
pub(crate) struct RpcBroker {
    slots: Mutex<[Option<Slot>; 4]>,
    next_generation: AtomicU64,
}

impl RpcBroker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs a fresh completion slot for `kind` and returns its generation
    /// together with the receiver the caller awaits.
    ///
    /// Any slot a previous call left behind is superseded: its sender drops
    /// and the old waiter's channel closes.
    pub(crate) fn register(&self, kind: RequestKind) -> (u64, oneshot::Receiver<Message>) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        let mut slots = self.slots.lock().expect("lock poisoned");
        slots[kind.slot_index()] = Some(Slot { generation, tx });
        (generation, rx)
    }

    /// Removes the slot for `kind` if it still belongs to `generation`.
    ///
    /// Called when a call gives up (timeout or failed transmit) so that a
    /// late response finds no slot instead of completing a stranger.
    pub(crate) fn cancel(&self, kind: RequestKind, generation: u64) {
        let mut slots = self.slots.lock().expect("lock poisoned");
        let idx = kind.slot_index();
        if slots[idx]
            .as_ref()
            .map_or(false, |slot| slot.generation == generation)
        {
            slots[idx] = None;
        }
    }

    /// Completes the in-flight call awaiting this response, if any.
    ///
    /// Returns `false` when the message is not an RPC response, or no call is
    /// waiting for it (stale or unsolicited).
    pub(crate) fn complete(&self, msg: &Message) -> bool {
        let Some(kind) = RequestKind::of_response(msg) else {
            return false;
        };
        let slot = {
            let mut slots = self.slots.lock().expect("lock poisoned");
            slots[kind.slot_index()].take()
        };
        match slot {
            Some(slot) => slot.tx.send(*msg).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camtrig_core::protocol::messages::{GetUint16ResponseMessage, SetFloatResponseMessage};

    fn uint16_response(value: u16) -> Message {
        Message::GetUint16Response(GetUint16ResponseMessage {
            id: 1,
            value,
            success: true,
        })
    }

    #[tokio::test]
    async fn test_register_then_complete_delivers_response() {
        // Arrange
        let broker = RpcBroker::new();
        let (_generation, rx) = broker.register(RequestKind::GetUint16);

        // Act
        let delivered = broker.complete(&uint16_response(321));

        // Assert
        assert!(delivered);
        assert_eq!(rx.await.unwrap(), uint16_response(321));
    }

    #[test]
    fn test_complete_without_waiter_reports_stale() {
        let broker = RpcBroker::new();
        assert!(!broker.complete(&uint16_response(1)));
    }

    #[test]
    fn test_complete_ignores_non_response_messages() {
        let broker = RpcBroker::new();
        let (_generation, _rx) = broker.register(RequestKind::GetUint16);

        assert!(!broker.complete(&Message::LogReset));
    }

    #[test]
    fn test_cancel_removes_slot_for_matching_generation() {
        // Arrange
        let broker = RpcBroker::new();
        let (generation, _rx) = broker.register(RequestKind::SetFloat);

        // Act
        broker.cancel(RequestKind::SetFloat, generation);

        // Assert: the late response finds no slot
        let response = Message::SetFloatResponse(SetFloatResponseMessage {
            id: 4,
            value: 1.5,
            success: true,
        });
        assert!(!broker.complete(&response));
    }

    #[tokio::test]
    async fn test_cancel_with_stale_generation_keeps_newer_slot() {
        // Arrange: first call expires after a second call has registered
        let broker = RpcBroker::new();
        let (old_generation, _old_rx) = broker.register(RequestKind::GetUint16);
        let (_new_generation, new_rx) = broker.register(RequestKind::GetUint16);

        // Act
        broker.cancel(RequestKind::GetUint16, old_generation);

        // Assert: the newer call still completes
        assert!(broker.complete(&uint16_response(55)));
        assert_eq!(new_rx.await.unwrap(), uint16_response(55));
    }

    #[tokio::test]
    async fn test_register_supersedes_previous_waiter() {
        let broker = RpcBroker::new();
        let (_g1, old_rx) = broker.register(RequestKind::GetUint16);
        let (_g2, _new_rx) = broker.register(RequestKind::GetUint16);

        // The superseded waiter's channel closes without a value.
        assert!(old_rx.await.is_err());
    }

    #[tokio::test]
    async fn test_kinds_complete_independently() {
        // Arrange
        let broker = RpcBroker::new();
        let (_gu, uint_rx) = broker.register(RequestKind::GetUint16);
        let (_gf, float_rx) = broker.register(RequestKind::SetFloat);

        // Act: only the uint16 response arrives
        assert!(broker.complete(&uint16_response(9)));

        // Assert
        assert_eq!(uint_rx.await.unwrap(), uint16_response(9));
        // The float slot is still armed; dropping the broker closes it.
        drop(broker);
        assert!(float_rx.await.is_err());
    }
}
