pub mod audit;
pub mod config;
pub mod errors;
pub mod events;
pub mod outbound;
pub mod security;
pub mod source;

pub use audit::{AuditRecord, AuditStore};
pub use config::BridgeConfig;
pub use errors::{AuditError, OutboundError, SignError, StreamError};
pub use events::{DirectMessage, FeedEvent};
pub use outbound::{OutboundApi, OutboundNotification, OutboundPost};
pub use security::{BearerSigner, RequestSigner, SignedRequest};
pub use source::FeedSource;
