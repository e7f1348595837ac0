//! Authorization gate
//!
//! Decides whether a bot-add (or promotion) event is permitted. The bot
//! owner is always authorized; everyone else must be an active entry in
//! the global team registry. An unauthorized outcome is terminal for the
//! event: rejection message, optional audit entry, and departure from the
//! group.

use std::sync::Arc;

use tracing::{info, warn};

use crate::database::DatabaseService;
use crate::models::{BotConfig, ChatPayload, CreateSecurityAuditRequest, UserPayload};
use crate::telegram::TelegramApi;
use crate::utils::errors::Result;
use crate::utils::logging;

const REJECTION_TEXT: &str =
    "This bot can only be added to groups by authorized team members. Leaving the group.";

#[derive(Clone)]
pub struct AuthorizationGate {
    db: DatabaseService,
    api: Arc<dyn TelegramApi>,
}

impl AuthorizationGate {
    pub fn new(db: DatabaseService, api: Arc<dyn TelegramApi>) -> Self {
        Self { db, api }
    }

    /// Whether this user may add (or promote) the bot.
    ///
    /// The owner check wins regardless of registry state.
    pub async fn is_authorized(&self, config: &BotConfig, user_id: i64) -> Result<bool> {
        if config.owner_telegram_id == Some(user_id) {
            return Ok(true);
        }

        Ok(self
            .db
            .team_members
            .find_active_by_telegram_id(user_id)
            .await?
            .is_some())
    }

    /// Terminal handling of an unauthorized bot addition: reject, audit,
    /// leave. The audit row is the only persistent effect; the outbound
    /// calls are best-effort.
    pub async fn reject_addition(
        &self,
        config: &BotConfig,
        chat: &ChatPayload,
        actor: &UserPayload,
    ) -> Result<()> {
        info!(
            user_id = actor.id,
            chat_id = chat.id,
            "Rejecting unauthorized bot addition"
        );

        if let Err(e) = self.api.send_message(chat.id, REJECTION_TEXT, None).await {
            warn!(chat_id = chat.id, error = %e, "Failed to deliver rejection message");
        }

        if config.audit_enabled {
            self.db
                .security_audit
                .create(CreateSecurityAuditRequest {
                    config_id: config.id,
                    telegram_id: actor.id,
                    display_name: actor.display_name(),
                    username: actor.username.clone(),
                    chat_id: chat.id,
                    group_title: chat
                        .title
                        .clone()
                        .unwrap_or_else(|| "Unknown Group".to_string()),
                    attempt_type: "unauthorized_add".to_string(),
                })
                .await?;
        }

        logging::log_security_event(config.id, actor.id, chat.id, "unauthorized_add");

        // The bot must not remain in a group it was added to without
        // authorization.
        if let Err(e) = self.api.leave_chat(chat.id).await {
            warn!(chat_id = chat.id, error = %e, "Failed to leave chat after rejection");
        }

        Ok(())
    }
}
