//! LINE Messaging API push client.
//!
//! Blocking reqwest client (no Tokio runtime required). Delivery is a single
//! attempt; failures are reported back to the caller, never retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";

/// Credentials and recipient for one delivery.
#[derive(Debug, Clone)]
pub struct LineConfig {
    pub token: String,
    pub recipient: String,
    pub api_base: String,
}

/// Outcome of a delivery, in the shape the calling UI expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::Transport(self.error.unwrap_or_default()))
        }
    }
}

impl From<&AppError> for SendResult {
    fn from(e: &AppError) -> Self {
        Self::failed(e.to_string())
    }
}

pub trait Notifier {
    fn send(&self, text: &str) -> SendResult;
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    pub display_name: String,
    pub user_id: String,
}

pub struct LineClient {
    http: reqwest::blocking::Client,
    config: LineConfig,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("plnotify/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Fetch the bot profile; used to verify the access token.
    pub fn bot_info(&self) -> Result<BotInfo> {
        let resp = self
            .http
            .get(self.url("/v2/bot/info"))
            .bearer_auth(&self.config.token)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AppError::Transport(format!(
                "エラーコード: {}\n詳細: {body}",
                status.as_u16()
            )));
        }
        Ok(resp.json()?)
    }
}

impl Notifier for LineClient {
    fn send(&self, text: &str) -> SendResult {
        let payload = PushRequest {
            to: &self.config.recipient,
            messages: vec![TextMessage { kind: "text", text }],
        };
        let resp = self
            .http
            .post(self.url("/v2/bot/message/push"))
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send();
        match resp {
            Ok(resp) if resp.status().as_u16() == 200 => {
                info!("notification sent");
                SendResult::ok()
            }
            Ok(resp) => {
                let code = resp.status().as_u16();
                let body = resp.text().unwrap_or_default();
                error!(status = code, body = %body, "push rejected");
                SendResult::failed(format!("エラーコード: {code}"))
            }
            Err(e) => {
                error!(error = %e, "push failed");
                SendResult::failed(e.to_string())
            }
        }
    }
}

/// Prints the message instead of delivering it.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, text: &str) -> SendResult {
        println!("{text}");
        SendResult::ok()
    }
}
