use secrecy::{ExposeSecret, SecretString};

use crate::errors::SignError;

/// The output of the signing capability: headers to attach to an outgoing
/// request.
#[derive(Clone, Debug, Default)]
pub struct SignedRequest {
    pub headers: Vec<(String, String)>,
}

/// Opaque signed-request capability. The streaming session and the outbound
/// client both take one of these by injection, so the core logic never sees
/// credentials and tests can run with a fixed-header double.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, method: &str, url: &str) -> Result<SignedRequest, SignError>;
}

/// Signs every request with a static bearer token.
#[derive(Clone)]
pub struct BearerSigner {
    token: SecretString,
}

impl BearerSigner {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl std::fmt::Debug for BearerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerSigner([REDACTED])")
    }
}

impl RequestSigner for BearerSigner {
    fn sign(&self, _method: &str, _url: &str) -> Result<SignedRequest, SignError> {
        Ok(SignedRequest {
            headers: vec![(
                "authorization".to_string(),
                format!("Bearer {}", self.token.expose_secret()),
            )],
        })
    }
}

/// Test double that attaches fixed headers.
#[derive(Clone, Debug, Default)]
pub struct StaticSigner {
    headers: Vec<(String, String)>,
}

impl StaticSigner {
    pub fn new(headers: Vec<(String, String)>) -> Self {
        Self { headers }
    }
}

impl RequestSigner for StaticSigner {
    fn sign(&self, _method: &str, _url: &str) -> Result<SignedRequest, SignError> {
        Ok(SignedRequest {
            headers: self.headers.clone(),
        })
    }
}
