//! Telegram Bot API capability surface
//!
//! The pipeline consumes the remote bot API through this trait so the
//! services stay testable without a network; `HttpTelegramApi` is the
//! production implementation.

use async_trait::async_trait;
use serde::Serialize;

use crate::models::update::{ChatMemberPayload, UpdateEnvelope};
use crate::utils::errors::TelegramResult;

/// Inline keyboard markup for interactive messages
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

/// One callback button
#[derive(Debug, Clone, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    /// A keyboard with a single callback button
    pub fn single_button(text: &str, callback_data: &str) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineButton {
                text: text.to_string(),
                callback_data: callback_data.to_string(),
            }]],
        }
    }
}

/// The bot API operations the core consumes
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Long-poll for new updates starting at `offset`
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_seconds: u64,
        allowed_updates: &[&str],
    ) -> TelegramResult<Vec<UpdateEnvelope>>;

    /// Send a text message, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> TelegramResult<()>;

    /// Mint a fresh invite link for a chat
    async fn export_chat_invite_link(&self, chat_id: i64) -> TelegramResult<String>;

    /// Query one member's status in a chat
    async fn get_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> TelegramResult<ChatMemberPayload>;

    /// Depart a chat
    async fn leave_chat(&self, chat_id: i64) -> TelegramResult<()>;

    /// Acknowledge an inline button press
    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> TelegramResult<()>;
}
