use chrono::DateTime;

use crate::errors::AuditError;
use crate::events::DirectMessage;

/// Datetime format used by the feed in `created_at` fields,
/// e.g. "Mon Jan 01 00:00:00 +0000 2024".
pub const FEED_DATETIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Datetime format written to the audit database.
pub const STORE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One append-only audit row per accepted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditRecord {
    pub message_id: i64,
    pub sender_id: i64,
    pub sender_screen_name: String,
    pub text: String,
    pub timestamp: String,
}

impl AuditRecord {
    pub fn from_message(message: &DirectMessage) -> Self {
        Self {
            message_id: message.id,
            sender_id: message.sender_id,
            sender_screen_name: message.sender_screen_name.clone(),
            text: message.text.trim().to_string(),
            timestamp: normalize_timestamp(&message.created_at),
        }
    }
}

/// Convert a feed timestamp to the storage format. A timestamp that fails
/// to parse is stored raw; a malformed `created_at` must never cost us the
/// audit row, let alone the message.
pub fn normalize_timestamp(raw: &str) -> String {
    DateTime::parse_from_str(raw, FEED_DATETIME_FORMAT)
        .map(|dt| dt.format(STORE_DATETIME_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Best-effort append sink. Callers log failures and move on; an `Err`
/// here must never stall or crash the pipeline.
pub trait AuditStore: Send + Sync {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}
