//! Raw update envelopes from the Telegram Bot API
//!
//! These DTOs mirror the wire format of `getUpdates`. An envelope is
//! classified into the `UpdateEvent` tagged union before dispatch; shapes
//! the monitor does not understand classify as `Unsupported` and are
//! skipped silently.

use serde::{Deserialize, Serialize};

/// A Telegram user as it appears inside update payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl UserPayload {
    /// Display name: first + last joined by a single space (non-empty
    /// parts only), falling back to the username, then to "Unknown".
    pub fn display_name(&self) -> String {
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !joined.is_empty() {
            return joined;
        }

        match self.username.as_deref() {
            Some(username) if !username.is_empty() => username.to_string(),
            _ => "Unknown".to_string(),
        }
    }
}

/// A chat as it appears inside update payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ChatPayload {
    /// Messages are only stored for group-typed chats
    pub fn is_group_chat(&self) -> bool {
        matches!(self.chat_type.as_str(), "group" | "supergroup")
    }
}

/// A message or channel post payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<UserPayload>,
    pub chat: ChatPayload,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<serde_json::Value>,
    #[serde(default)]
    pub new_chat_members: Option<Vec<UserPayload>>,
    #[serde(default)]
    pub left_chat_member: Option<UserPayload>,
}

impl MessagePayload {
    /// Message body: `text`, else `caption`, else empty
    pub fn body(&self) -> String {
        self.text
            .clone()
            .or_else(|| self.caption.clone())
            .unwrap_or_default()
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_message.is_some()
    }
}

/// One side of a chat-member status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberPayload {
    pub user: UserPayload,
    pub status: String,
}

impl ChatMemberPayload {
    pub fn is_present(&self) -> bool {
        matches!(
            self.status.as_str(),
            "creator" | "administrator" | "member" | "restricted"
        )
    }

    pub fn is_gone(&self) -> bool {
        matches!(self.status.as_str(), "left" | "kicked")
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self.status.as_str(), "creator" | "administrator")
    }
}

/// A `my_chat_member` / `chat_member` status-change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMemberUpdatedPayload {
    pub chat: ChatPayload,
    pub from: UserPayload,
    pub old_chat_member: ChatMemberPayload,
    pub new_chat_member: ChatMemberPayload,
}

/// A callback (inline button) interaction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQueryPayload {
    pub id: String,
    pub from: UserPayload,
    #[serde(default)]
    pub message: Option<MessagePayload>,
    #[serde(default)]
    pub data: Option<String>,
}

/// One raw update envelope as delivered by `getUpdates`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEnvelope {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<MessagePayload>,
    #[serde(default)]
    pub channel_post: Option<MessagePayload>,
    #[serde(default)]
    pub callback_query: Option<CallbackQueryPayload>,
    #[serde(default)]
    pub my_chat_member: Option<ChatMemberUpdatedPayload>,
    #[serde(default)]
    pub chat_member: Option<ChatMemberUpdatedPayload>,
}

/// The finite envelope kinds the dispatcher routes on
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    /// Inline button interaction
    Callback(CallbackQueryPayload),
    /// The bot's own membership-status change in a chat
    BotStatusChange(ChatMemberUpdatedPayload),
    /// A tracked member's status change
    MemberStatusChange(ChatMemberUpdatedPayload),
    /// A chat message or channel post
    ChatMessage(MessagePayload),
    /// Anything else; skipped silently
    Unsupported,
}

impl UpdateEnvelope {
    /// Classify the envelope; exactly one classification applies, checked
    /// in priority order.
    pub fn classify(self) -> UpdateEvent {
        if let Some(callback) = self.callback_query {
            return UpdateEvent::Callback(callback);
        }
        if let Some(change) = self.my_chat_member {
            return UpdateEvent::BotStatusChange(change);
        }
        if let Some(change) = self.chat_member {
            return UpdateEvent::MemberStatusChange(change);
        }
        if let Some(message) = self.message.or(self.channel_post) {
            return UpdateEvent::ChatMessage(message);
        }
        UpdateEvent::Unsupported
    }
}
