//! Telegram Bot API transport
//!
//! Capability trait plus the reqwest-based production client

pub mod api;
pub mod client;

pub use api::{InlineButton, InlineKeyboard, TelegramApi};
pub use client::HttpTelegramApi;

/// Update kinds the monitor subscribes to
pub const ALLOWED_UPDATES: &[&str] = &[
    "message",
    "channel_post",
    "callback_query",
    "my_chat_member",
    "chat_member",
];
