use std::time::Duration;

/// Errors terminating a streaming session. All variants are treated as
/// transient by the reconnect supervisor; only retry-budget exhaustion is
/// fatal, and that is the supervisor's call, not an error variant.
#[derive(Clone, Debug, thiserror::Error)]
pub enum StreamError {
    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),
    #[error("endpoint error {status}: {body}")]
    Endpoint { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("connection closed by peer")]
    Closed,
    #[error("stream stalled: no data for {0:?}")]
    Stalled(Duration),
    #[error("invalid session configuration: {0}")]
    Config(String),
}

impl StreamError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::AuthenticationRejected(_) => "authentication_rejected",
            Self::Endpoint { .. } => "endpoint_error",
            Self::Network(_) => "network_error",
            Self::Closed => "connection_closed",
            Self::Stalled(_) => "stream_stalled",
            Self::Config(_) => "invalid_config",
        }
    }

    /// Classify a non-success HTTP status from the streaming endpoint.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthenticationRejected(body),
            _ => Self::Endpoint { status, body },
        }
    }
}

/// Errors from the outbound publish/notify calls. Workers log these and
/// drop the item. At-most-once delivery, no retry.
#[derive(Clone, Debug, thiserror::Error)]
pub enum OutboundError {
    #[error("network error: {0}")]
    Network(String),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("request signing failed: {0}")]
    Sign(String),
}

impl OutboundError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_error",
            Self::Api { .. } => "api_error",
            Self::Sign(_) => "sign_error",
        }
    }
}

/// Error from the best-effort audit sink. Never propagated past the
/// message processor.
#[derive(Clone, Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit write failed: {0}")]
    Write(String),
}

/// Error from the injected request-signing capability.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SignError {
    #[error("signing failed: {0}")]
    Failed(String),
}

impl From<SignError> for OutboundError {
    fn from(e: SignError) -> Self {
        OutboundError::Sign(e.to_string())
    }
}

impl From<SignError> for StreamError {
    fn from(e: SignError) -> Self {
        StreamError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_mapping() {
        assert!(matches!(
            StreamError::from_status(401, "unauthorized".into()),
            StreamError::AuthenticationRejected(_)
        ));
        assert!(matches!(
            StreamError::from_status(403, "forbidden".into()),
            StreamError::AuthenticationRejected(_)
        ));
        assert!(matches!(
            StreamError::from_status(500, "internal".into()),
            StreamError::Endpoint { status: 500, .. }
        ));
        assert!(matches!(
            StreamError::from_status(420, "enhance your calm".into()),
            StreamError::Endpoint { status: 420, .. }
        ));
    }

    #[test]
    fn stream_error_kind_strings() {
        assert_eq!(StreamError::Closed.error_kind(), "connection_closed");
        assert_eq!(
            StreamError::Stalled(Duration::from_secs(90)).error_kind(),
            "stream_stalled"
        );
        assert_eq!(
            StreamError::Network("tcp reset".into()).error_kind(),
            "network_error"
        );
    }

    #[test]
    fn outbound_error_kind_strings() {
        assert_eq!(
            OutboundError::Api { status: 500, body: "err".into() }.error_kind(),
            "api_error"
        );
        assert_eq!(OutboundError::Network("dns".into()).error_kind(), "network_error");
    }

    #[test]
    fn sign_error_conversions() {
        let outbound: OutboundError = SignError::Failed("no token".into()).into();
        assert!(matches!(outbound, OutboundError::Sign(_)));

        let stream: StreamError = SignError::Failed("no token".into()).into();
        assert!(matches!(stream, StreamError::Config(_)));
    }
}
