//! HTTP implementation of the Telegram Bot API capability
//!
//! A thin reqwest client over `https://api.telegram.org/bot<token>`. The
//! base URL is configurable so tests can point it at a local mock server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::models::update::{ChatMemberPayload, UpdateEnvelope};
use crate::telegram::api::{InlineKeyboard, TelegramApi};
use crate::utils::errors::{TelegramError, TelegramResult};

/// Standard Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpTelegramApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTelegramApi {
    pub fn new(api_url: &str, token: &str, request_timeout: Duration) -> TelegramResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent("GroupGuard-Bot/1.0")
            .build()
            .map_err(|e| TelegramError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: serde_json::Value,
    ) -> TelegramResult<T> {
        debug!(method = method, "Calling Telegram Bot API");

        let response = self
            .client
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TelegramError::Timeout
                } else {
                    TelegramError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TelegramError::InvalidResponse(e.to_string()))?;

        if !body.ok {
            let description = body
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(TelegramError::ApiError(description));
        }

        body.result
            .ok_or_else(|| TelegramError::InvalidResponse("missing result field".to_string()))
    }
}

#[async_trait]
impl TelegramApi for HttpTelegramApi {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_seconds: u64,
        allowed_updates: &[&str],
    ) -> TelegramResult<Vec<UpdateEnvelope>> {
        let mut payload = json!({
            "timeout": timeout_seconds,
            "allowed_updates": allowed_updates,
        });
        if let Some(offset) = offset {
            payload["offset"] = json!(offset);
        }

        self.call("getUpdates", payload).await
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> TelegramResult<()> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] =
                serde_json::to_value(keyboard).map_err(|e| TelegramError::RequestFailed(e.to_string()))?;
        }

        // The returned Message payload is not needed
        self.call::<serde_json::Value>("sendMessage", payload)
            .await
            .map(|_| ())
    }

    async fn export_chat_invite_link(&self, chat_id: i64) -> TelegramResult<String> {
        self.call("exportChatInviteLink", json!({ "chat_id": chat_id }))
            .await
    }

    async fn get_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> TelegramResult<ChatMemberPayload> {
        self.call(
            "getChatMember",
            json!({ "chat_id": chat_id, "user_id": user_id }),
        )
        .await
    }

    async fn leave_chat(&self, chat_id: i64) -> TelegramResult<()> {
        self.call::<serde_json::Value>("leaveChat", json!({ "chat_id": chat_id }))
            .await
            .map(|_| ())
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> TelegramResult<()> {
        let mut payload = json!({ "callback_query_id": callback_query_id });
        if let Some(text) = text {
            payload["text"] = json!(text);
        }

        self.call::<serde_json::Value>("answerCallbackQuery", payload)
            .await
            .map(|_| ())
    }
}
