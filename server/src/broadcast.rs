//! Best-effort delivery of events to admitted sessions
//!
//! Events are encoded to JSON once per fan-out and pushed onto each session's
//! bounded outbox with `try_send`, so the authority task never waits on a
//! slow socket. A closed or saturated recipient never stops delivery to the
//! others. Its id is reported back so the caller can disconnect it, since a
//! peer that missed an event can no longer mirror the game.

use crate::client_manager::{ClientManager, Outbox, SessionId};
use log::{debug, error, warn};
use shared::ServerMessage;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("session transport is closed")]
    Closed,

    #[error("session outbox is full")]
    Backpressure,

    #[error("session {0} is not registered")]
    UnknownSession(SessionId),

    #[error("event could not be encoded")]
    Encode,
}

impl DeliveryError {
    /// True when the session can no longer receive events in order
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DeliveryError::Closed | DeliveryError::Backpressure)
    }
}

/// Per-fan-out delivery counts
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
    /// Sessions whose outbox was closed or full
    pub unreachable: Vec<SessionId>,
}

/// Encodes an event as a single text frame
pub fn encode(event: &ServerMessage) -> Result<Message, DeliveryError> {
    match serde_json::to_string(event) {
        Ok(json) => Ok(Message::Text(json)),
        Err(e) => {
            error!("Failed to encode {} event: {}", event.kind(), e);
            Err(DeliveryError::Encode)
        }
    }
}

fn push(outbox: &Outbox, frame: Message) -> Result<(), DeliveryError> {
    outbox.try_send(frame).map_err(|e| match e {
        TrySendError::Closed(_) => DeliveryError::Closed,
        TrySendError::Full(_) => DeliveryError::Backpressure,
    })
}

/// Sends an event straight to an outbox, for peers that were never registered
pub fn send_direct(outbox: &Outbox, event: &ServerMessage) -> Result<(), DeliveryError> {
    push(outbox, encode(event)?)
}

/// Delivers an event to one registered session
pub fn send_to(
    clients: &ClientManager,
    id: SessionId,
    event: &ServerMessage,
) -> Result<(), DeliveryError> {
    let session = clients
        .get(id)
        .ok_or(DeliveryError::UnknownSession(id))?;
    push(session.outbox(), encode(event)?)
}

/// Delivers an event to every registered session
pub fn broadcast(clients: &ClientManager, event: &ServerMessage) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    let Ok(frame) = encode(event) else {
        report.dropped = clients.len();
        return report;
    };

    for session in clients.sessions() {
        match push(session.outbox(), frame.clone()) {
            Ok(()) => report.delivered += 1,
            Err(DeliveryError::Closed) => {
                debug!(
                    "Dropped {} for closed session {}",
                    event.kind(),
                    session.id
                );
                report.dropped += 1;
                report.unreachable.push(session.id);
            }
            Err(e) => {
                warn!(
                    "Failed to deliver {} to session {}: {}",
                    event.kind(),
                    session.id,
                    e
                );
                report.dropped += 1;
                if e.is_unreachable() {
                    report.unreachable.push(session.id);
                }
            }
        }
    }

    report
}
