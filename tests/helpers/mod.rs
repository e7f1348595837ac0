//! Shared test infrastructure: in-memory database, a recording mock of the
//! Telegram capability surface, and raw-envelope builders.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use groupguard::config::Settings;
use groupguard::database::DatabaseService;
use groupguard::models::{
    BotConfig, ChatMemberPayload, CreateBotConfigRequest, UpdateEnvelope, UserPayload,
};
use groupguard::services::ServiceFactory;
use groupguard::telegram::{InlineKeyboard, TelegramApi};
use groupguard::utils::errors::{TelegramError, TelegramResult};

/// Token used by test configurations; the prefix is the bot's own user id
pub const TEST_BOT_TOKEN: &str = "424242:TEST-TOKEN";
pub const TEST_BOT_ID: i64 = 424242;

/// Fresh in-memory database with all migrations applied.
///
/// A single connection keeps every handle on the same in-memory store.
pub async fn test_db() -> DatabaseService {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    DatabaseService::new(pool)
}

pub struct ConfigOptions {
    pub owner_id: Option<i64>,
    pub team_group_chat_id: Option<i64>,
    pub alerts_chat_id: Option<i64>,
    pub audit_enabled: bool,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            owner_id: Some(1000),
            team_group_chat_id: Some(-400),
            alerts_chat_id: Some(-500),
            audit_enabled: true,
        }
    }
}

pub async fn create_config(db: &DatabaseService, options: ConfigOptions) -> BotConfig {
    db.configs
        .create(CreateBotConfigRequest {
            name: "test".to_string(),
            bot_token: TEST_BOT_TOKEN.to_string(),
            owner_telegram_id: options.owner_id,
            team_group_chat_id: options.team_group_chat_id,
            alerts_chat_id: options.alerts_chat_id,
            audit_enabled: options.audit_enabled,
        })
        .await
        .unwrap()
}

pub fn build_services(db: &DatabaseService, api: Arc<MockTelegramApi>) -> ServiceFactory {
    let mut settings = Settings::default();
    settings.bot.token = TEST_BOT_TOKEN.to_string();
    let api: Arc<dyn TelegramApi> = api;
    ServiceFactory::new(db.clone(), api, &settings)
}

/// One recorded outbound message
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub has_keyboard: bool,
}

#[derive(Default)]
struct MockState {
    batches: VecDeque<Vec<UpdateEnvelope>>,
    requested_offsets: Vec<Option<i64>>,
    sent: Vec<SentMessage>,
    left_chats: Vec<i64>,
    answered: Vec<(String, Option<String>)>,
    invite_link: Option<String>,
    bot_status: HashMap<i64, String>,
    fail_get_updates: bool,
}

/// Recording implementation of the Telegram capability surface
#[derive(Default)]
pub struct MockTelegramApi {
    state: Mutex<MockState>,
}

impl MockTelegramApi {
    pub fn queue_batch(&self, updates: Vec<UpdateEnvelope>) {
        self.state.lock().unwrap().batches.push_back(updates);
    }

    pub fn set_invite_link(&self, link: &str) {
        self.state.lock().unwrap().invite_link = Some(link.to_string());
    }

    pub fn set_bot_status(&self, chat_id: i64, status: &str) {
        self.state
            .lock()
            .unwrap()
            .bot_status
            .insert(chat_id, status.to_string());
    }

    pub fn fail_get_updates(&self) {
        self.state.lock().unwrap().fail_get_updates = true;
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<SentMessage> {
        self.sent_messages()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .collect()
    }

    pub fn left_chats(&self) -> Vec<i64> {
        self.state.lock().unwrap().left_chats.clone()
    }

    pub fn answered(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().unwrap().answered.clone()
    }

    pub fn requested_offsets(&self) -> Vec<Option<i64>> {
        self.state.lock().unwrap().requested_offsets.clone()
    }
}

#[async_trait]
impl TelegramApi for MockTelegramApi {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        _timeout_seconds: u64,
        _allowed_updates: &[&str],
    ) -> TelegramResult<Vec<UpdateEnvelope>> {
        let mut state = self.state.lock().unwrap();
        state.requested_offsets.push(offset);
        if state.fail_get_updates {
            return Err(TelegramError::Timeout);
        }
        Ok(state.batches.pop_front().unwrap_or_default())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> TelegramResult<()> {
        self.state.lock().unwrap().sent.push(SentMessage {
            chat_id,
            text: text.to_string(),
            has_keyboard: keyboard.is_some(),
        });
        Ok(())
    }

    async fn export_chat_invite_link(&self, _chat_id: i64) -> TelegramResult<String> {
        self.state
            .lock()
            .unwrap()
            .invite_link
            .clone()
            .ok_or_else(|| TelegramError::ApiError("not enough rights".to_string()))
    }

    async fn get_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> TelegramResult<ChatMemberPayload> {
        let state = self.state.lock().unwrap();
        match state.bot_status.get(&chat_id) {
            Some(status) => Ok(ChatMemberPayload {
                user: UserPayload {
                    id: user_id,
                    is_bot: true,
                    first_name: Some("GroupGuard".to_string()),
                    last_name: None,
                    username: None,
                },
                status: status.clone(),
            }),
            None => Err(TelegramError::ApiError("member not found".to_string())),
        }
    }

    async fn leave_chat(&self, chat_id: i64) -> TelegramResult<()> {
        self.state.lock().unwrap().left_chats.push(chat_id);
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> TelegramResult<()> {
        self.state
            .lock()
            .unwrap()
            .answered
            .push((callback_query_id.to_string(), text.map(String::from)));
        Ok(())
    }
}

// --- raw envelope builders ------------------------------------------------

pub fn user_json(id: i64, first_name: &str) -> serde_json::Value {
    json!({ "id": id, "is_bot": false, "first_name": first_name })
}

/// A plain group message envelope
pub fn message_update(
    update_id: i64,
    chat_id: i64,
    chat_type: &str,
    title: &str,
    from: serde_json::Value,
    message_id: i64,
    text: &str,
) -> UpdateEnvelope {
    serde_json::from_value(json!({
        "update_id": update_id,
        "message": {
            "message_id": message_id,
            "from": from,
            "chat": { "id": chat_id, "type": chat_type, "title": title },
            "date": 1_700_000_000,
            "text": text,
        }
    }))
    .unwrap()
}

/// A `my_chat_member` envelope for the bot's own status change
pub fn bot_status_update(
    update_id: i64,
    chat_id: i64,
    title: &str,
    from: serde_json::Value,
    old_status: &str,
    new_status: &str,
) -> UpdateEnvelope {
    let bot = json!({ "id": TEST_BOT_ID, "is_bot": true, "first_name": "GroupGuard" });
    serde_json::from_value(json!({
        "update_id": update_id,
        "my_chat_member": {
            "chat": { "id": chat_id, "type": "group", "title": title },
            "from": from,
            "old_chat_member": { "user": bot, "status": old_status },
            "new_chat_member": { "user": bot, "status": new_status },
        }
    }))
    .unwrap()
}

/// A `chat_member` envelope for a tracked member's status change
pub fn member_status_update(
    update_id: i64,
    chat_id: i64,
    title: &str,
    user: serde_json::Value,
    old_status: &str,
    new_status: &str,
) -> UpdateEnvelope {
    serde_json::from_value(json!({
        "update_id": update_id,
        "chat_member": {
            "chat": { "id": chat_id, "type": "group", "title": title },
            "from": user.clone(),
            "old_chat_member": { "user": user, "status": old_status },
            "new_chat_member": { "user": user, "status": new_status },
        }
    }))
    .unwrap()
}

/// A callback-query envelope for an inline button press
pub fn callback_update(
    update_id: i64,
    callback_id: &str,
    from: serde_json::Value,
    chat_id: i64,
    title: &str,
    data: &str,
) -> UpdateEnvelope {
    serde_json::from_value(json!({
        "update_id": update_id,
        "callback_query": {
            "id": callback_id,
            "from": from,
            "message": {
                "message_id": 1,
                "chat": { "id": chat_id, "type": "group", "title": title },
                "date": 1_700_000_000,
            },
            "data": data,
        }
    }))
    .unwrap()
}

/// An envelope shape the pipeline does not understand
pub fn unsupported_update(update_id: i64) -> UpdateEnvelope {
    serde_json::from_value(json!({
        "update_id": update_id,
        "poll": { "id": "p1", "question": "?" }
    }))
    .unwrap()
}
