/// SQL DDL for the audit database. Applied on every open: the sink holds
/// no long-lived connection, so the schema must be idempotent.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    message_id INTEGER NOT NULL,
    sender_id INTEGER NOT NULL,
    sender_screen_name TEXT NOT NULL,
    received_at TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender_id);
CREATE INDEX IF NOT EXISTS idx_messages_received ON messages(received_at);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
