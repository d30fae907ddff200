use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use bridgebot_core::errors::OutboundError;
use bridgebot_core::outbound::OutboundApi;
use bridgebot_core::security::RequestSigner;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Endpoints for the two outbound publishing calls.
#[derive(Clone, Debug)]
pub struct OutboundConfig {
    pub publish_url: String,
    pub notify_url: String,
    pub user_agent: String,
}

/// HTTP implementation of the outbound capabilities: two signed,
/// form-encoded POSTs.
pub struct HttpOutbound {
    client: Client,
    config: OutboundConfig,
    signer: Arc<dyn RequestSigner>,
}

impl HttpOutbound {
    pub fn new(config: OutboundConfig, signer: Arc<dyn RequestSigner>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            config,
            signer,
        }
    }

    async fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<(), OutboundError> {
        let signed = self.signer.sign("POST", url)?;

        let mut req = self
            .client
            .post(url)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent);
        for (name, value) in &signed.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .form(form)
            .send()
            .await
            .map_err(|e| OutboundError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(OutboundError::Api { status, body });
        }
        Ok(())
    }
}

fn publish_form(text: &str) -> Vec<(&'static str, String)> {
    vec![("status", text.to_string())]
}

fn notify_form(text: &str, recipient_user_id: i64) -> Vec<(&'static str, String)> {
    vec![
        ("user_id", recipient_user_id.to_string()),
        ("text", text.to_string()),
    ]
}

#[async_trait]
impl OutboundApi for HttpOutbound {
    #[instrument(skip(self, text))]
    async fn publish(&self, text: &str) -> Result<(), OutboundError> {
        debug!("publishing status");
        self.post_form(&self.config.publish_url, &publish_form(text))
            .await
    }

    #[instrument(skip(self, text), fields(recipient = recipient_user_id))]
    async fn notify(&self, text: &str, recipient_user_id: i64) -> Result<(), OutboundError> {
        debug!("sending direct message");
        self.post_form(&self.config.notify_url, &notify_form(text, recipient_user_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridgebot_core::security::StaticSigner;

    #[test]
    fn publish_form_fields() {
        let form = publish_form("hello world");
        assert_eq!(form, vec![("status", "hello world".to_string())]);
    }

    #[test]
    fn notify_form_fields() {
        let form = notify_form("thanks!", 42);
        assert_eq!(
            form,
            vec![
                ("user_id", "42".to_string()),
                ("text", "thanks!".to_string()),
            ]
        );
    }

    #[test]
    fn builds_with_injected_signer() {
        let config = OutboundConfig {
            publish_url: "https://api.example.com/1/statuses/update.json".into(),
            notify_url: "https://api.example.com/1/direct_messages/new.json".into(),
            user_agent: "bridgebot-test".into(),
        };
        let outbound = HttpOutbound::new(config, Arc::new(StaticSigner::default()));
        assert_eq!(outbound.config.user_agent, "bridgebot-test");
    }
}
