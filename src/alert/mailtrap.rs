//! Mailtrap transactional send API client.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::time::Duration;

use super::{EmailAlert, Mailer};

pub const DEFAULT_MAILTRAP_API_URL: &str = "https://send.api.mailtrap.io/api/send";
const DEFAULT_SENDER_EMAIL: &str = "hello@demomailtrap.com";
const DEFAULT_SENDER_NAME: &str = "Mailtrap Test";
const DEFAULT_CATEGORY: &str = "Integration Test";
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Envelope settings for outgoing alerts. The API token is kept separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailSettings {
    pub api_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub category: String,
    /// Alert recipient (`EMAIL_TO`). Email is disabled when unset.
    pub recipient: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_MAILTRAP_API_URL.to_string(),
            sender_email: DEFAULT_SENDER_EMAIL.to_string(),
            sender_name: DEFAULT_SENDER_NAME.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            recipient: None,
        }
    }
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    text: &'a str,
    category: &'a str,
}

pub struct MailtrapMailer {
    settings: MailSettings,
    recipient: String,
    token: String,
    agent: ureq::Agent,
}

impl MailtrapMailer {
    pub fn new(settings: MailSettings, token: String) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(anyhow!("mailtrap api token is empty"));
        }
        let recipient = settings
            .recipient
            .clone()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| anyhow!("no alert recipient configured (EMAIL_TO)"))?;
        let agent = ureq::AgentBuilder::new().timeout(SEND_TIMEOUT).build();
        Ok(Self {
            settings,
            recipient,
            token,
            agent,
        })
    }

    /// JSON body for the send API.
    pub fn request_body(&self, alert: &EmailAlert) -> Result<String> {
        let request = SendRequest {
            from: Address {
                email: &self.settings.sender_email,
                name: Some(&self.settings.sender_name),
            },
            to: vec![Address {
                email: &self.recipient,
                name: None,
            }],
            subject: &alert.subject,
            text: &alert.body,
            category: &self.settings.category,
        };
        serde_json::to_string(&request).context("encode mailtrap request")
    }

    /// Send and return the raw API response body.
    pub fn send_with_response(&self, alert: &EmailAlert) -> Result<String> {
        let body = self.request_body(alert)?;
        let response = self
            .agent
            .post(&self.settings.api_url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Content-Type", "application/json")
            .send_string(&body);
        match response {
            Ok(response) => response
                .into_string()
                .context("read mailtrap response body"),
            Err(ureq::Error::Status(code, response)) => {
                let detail = response.into_string().unwrap_or_default();
                Err(anyhow!("mailtrap rejected message ({}): {}", code, detail))
            }
            Err(e) => Err(anyhow!("mailtrap request failed: {}", e)),
        }
    }
}

impl Mailer for MailtrapMailer {
    fn send(&self, alert: &EmailAlert) -> Result<()> {
        self.send_with_response(alert).map(|_| ())
    }
}

impl std::fmt::Debug for MailtrapMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailtrapMailer")
            .field("api_url", &self.settings.api_url)
            .field("recipient", &self.recipient)
            .field("token", &"<redacted>")
            .finish()
    }
}
