use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

pub const MAILERLITE_SUBSCRIBERS_URL: &str = "https://connect.mailerlite.com/api/subscribers";
pub const SENDER_SUBSCRIBERS_URL: &str = "https://api.sender.net/v2/subscribers";

/// Group every new subscriber lands in when none is configured.
pub const DEFAULT_GROUP_ID: &str = "180587122481170115";

/// Which downstream email-marketing provider receives signups. Exactly one is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscribeProvider {
    Mailerlite,
    Sender,
}

impl Default for SubscribeProvider {
    fn default() -> Self {
        SubscribeProvider::Mailerlite
    }
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    /// The provider rejected the request as a client error; the message is
    /// safe to surface and the user may correct and resubmit.
    #[error("{0}")]
    Rejected(String),
    /// The provider errored out or was unreachable; resubmission may succeed.
    #[error("Subscription service unavailable")]
    Unavailable,
}

/// Basic `local@domain.tld` shape check; intentionally loose.
pub fn is_valid_email(raw: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    });
    re.is_match(raw)
}

/// Thin client for the provider's subscriber-creation API, authenticated with
/// a bearer token from process configuration.
#[derive(Clone)]
pub struct SubscribeClient {
    provider: SubscribeProvider,
    token: String,
    group_id: String,
    client: reqwest::Client,
}

impl SubscribeClient {
    pub fn new(provider: SubscribeProvider, token: String, group_id: String) -> Self {
        Self {
            provider,
            token,
            group_id,
            client: reqwest::Client::new(),
        }
    }

    pub async fn create_subscriber(
        &self,
        email: &str,
        firstname: Option<&str>,
    ) -> Result<(), SubscribeError> {
        let url = match self.provider {
            SubscribeProvider::Mailerlite => MAILERLITE_SUBSCRIBERS_URL,
            SubscribeProvider::Sender => SENDER_SUBSCRIBERS_URL,
        };
        let payload = subscriber_payload(self.provider, email, firstname, &self.group_id);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                tracing::error!("Subscribe request failed: {}", error);
                SubscribeError::Unavailable
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or_else(|_| json!({}));
        tracing::error!("Provider API error {}: {}", status, body);

        if status.is_server_error() {
            Err(SubscribeError::Unavailable)
        } else {
            Err(SubscribeError::Rejected(upstream_error_message(&body)))
        }
    }
}

/// Body shape differs per provider. MailerLite wants `status: "active"` so
/// join-group automations (e.g. the welcome email) still run.
fn subscriber_payload(
    provider: SubscribeProvider,
    email: &str,
    firstname: Option<&str>,
    group_id: &str,
) -> serde_json::Value {
    match provider {
        SubscribeProvider::Mailerlite => {
            let mut payload = json!({
                "email": email,
                "status": "active",
                "groups": [group_id],
            });
            if let Some(name) = firstname {
                payload["fields"] = json!({ "name": name });
            }
            payload
        }
        SubscribeProvider::Sender => {
            let mut payload = json!({
                "email": email,
                "groups": [group_id],
            });
            if let Some(name) = firstname {
                payload["firstname"] = json!(name);
            }
            payload
        }
    }
}

/// Dig a human-readable message out of a provider error body, trying the
/// shapes both providers are known to return.
fn upstream_error_message(body: &serde_json::Value) -> String {
    body.get("message")
        .and_then(|v| v.as_str())
        .or_else(|| {
            body.get("errors")
                .and_then(|v| v.get(0))
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
        })
        .or_else(|| body.get("error").and_then(|v| v.as_str()))
        .unwrap_or("Subscription failed")
        .to_string()
}
