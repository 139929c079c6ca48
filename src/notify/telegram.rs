use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{MessagePayload, PublishError, Publisher};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramNotifier {
    api_base: String,
    token: String,
    chat_id: String,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token,
            chat_id,
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Point at a self-hosted Bot API server (or a test server).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<(), PublishError> {
        let rsp = self
            .client
            .post(self.method_url(method))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = rsp.status();
        // Telegram explains failures in the body; a non-JSON body still maps by status.
        let reply: Option<ApiReply> = rsp.json().await.ok();

        if !status.is_success() {
            return Err(PublishError::Status {
                status: status.as_u16(),
                description: reply
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            });
        }
        match reply {
            Some(ApiReply { ok: false, description }) => Err(PublishError::Rejected(
                description.unwrap_or_else(|| "ok=false".to_string()),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Publisher for TelegramNotifier {
    async fn publish(&self, payload: &MessagePayload) -> Result<(), PublishError> {
        match &payload.image_url {
            Some(photo) => {
                let body = SendPhoto {
                    chat_id: &self.chat_id,
                    photo,
                    caption: &payload.text,
                    parse_mode: PARSE_MODE,
                };
                self.call("sendPhoto", &body).await
            }
            None => {
                let body = SendMessage {
                    chat_id: &self.chat_id,
                    text: &payload.text,
                    parse_mode: PARSE_MODE,
                };
                self.call("sendMessage", &body).await
            }
        }
    }
}

const PARSE_MODE: &str = "HTML";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}
