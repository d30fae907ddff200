use serde::Deserialize;
use serde_json::Value;

/// A decoded feed record, classified for routing.
///
/// The feed interleaves many record shapes; only direct messages addressed
/// to the bot carry work. Everything else (status updates, deletions,
/// friend lists, keep-alive noise) is `Other` and gets dropped by the
/// router.
#[derive(Clone, Debug)]
pub enum FeedEvent {
    DirectMessage(DirectMessage),
    Other,
}

/// An incoming direct message, flattened from the wire shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectMessage {
    pub id: i64,
    pub sender_id: i64,
    pub sender_screen_name: String,
    pub text: String,
    pub created_at: String,
}

// Wire shape: {"direct_message": {"id": .., "sender": {"id": .., "screen_name": ..},
// "text": .., "created_at": ..}, ...}
#[derive(Deserialize)]
struct DirectMessageEnvelope {
    direct_message: DirectMessagePayload,
}

#[derive(Deserialize)]
struct DirectMessagePayload {
    id: i64,
    sender: SenderPayload,
    text: String,
    created_at: String,
}

#[derive(Deserialize)]
struct SenderPayload {
    id: i64,
    screen_name: String,
}

impl FeedEvent {
    /// Classify a decoded record. A record without a well-formed
    /// `direct_message` payload is `Other`, as is a message the bot sent
    /// itself (`sender.id == self_user_id`): self-messages must never be
    /// routed or they would echo back through the pipeline forever.
    pub fn classify(record: Value, self_user_id: i64) -> Self {
        let Ok(envelope) = serde_json::from_value::<DirectMessageEnvelope>(record) else {
            return Self::Other;
        };

        let payload = envelope.direct_message;
        if payload.sender.id == self_user_id {
            return Self::Other;
        }

        Self::DirectMessage(DirectMessage {
            id: payload.id,
            sender_id: payload.sender.id,
            sender_screen_name: payload.sender.screen_name,
            text: payload.text,
            created_at: payload.created_at,
        })
    }

    pub fn is_direct_message(&self) -> bool {
        matches!(self, Self::DirectMessage(_))
    }
}
