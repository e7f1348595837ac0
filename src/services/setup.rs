//! Bot setup state machine
//!
//! Tracks the per-group onboarding lifecycle: bot added (pending) ->
//! promoted to administrator (complete). All outbound messages are sent
//! after the state transition has been committed; a delivery failure is
//! logged and never rolls the transition back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::{
    BotConfig, CallbackQueryPayload, ChatMemberUpdatedPayload, Group, SetupStatus,
};
use crate::services::auth::AuthorizationGate;
use crate::services::reconciler::EntityReconciler;
use crate::telegram::{InlineKeyboard, TelegramApi};
use crate::utils::errors::{GroupGuardError, Result};
use crate::utils::logging;

/// Callback data for the "Check again" button
pub const CHECK_ADMIN_CALLBACK: &str = "setup:check_admin";

const SETUP_INSTRUCTIONS: &str = "Thanks for adding me! To finish setup, promote me to \
administrator in this group, then press the button below.";

const RETRY_PROMPT: &str = "I am not an administrator yet. Promote me to administrator and \
press the button again.";

const SETUP_SUCCESS: &str = "Setup complete! This group is now being monitored.";

#[derive(Clone)]
pub struct SetupService {
    db: DatabaseService,
    api: Arc<dyn TelegramApi>,
    auth: AuthorizationGate,
    reconciler: EntityReconciler,
}

impl SetupService {
    pub fn new(
        db: DatabaseService,
        api: Arc<dyn TelegramApi>,
        auth: AuthorizationGate,
        reconciler: EntityReconciler,
    ) -> Self {
        Self {
            db,
            api,
            auth,
            reconciler,
        }
    }

    /// Route a change of the bot's own membership status in a chat
    pub async fn handle_bot_status_change(
        &self,
        config: &BotConfig,
        change: &ChatMemberUpdatedPayload,
    ) -> Result<()> {
        if !change.chat.is_group_chat() {
            debug!(
                chat_type = %change.chat.chat_type,
                "Ignoring bot status change outside a group chat"
            );
            return Ok(());
        }

        let old = &change.old_chat_member;
        let new = &change.new_chat_member;

        if old.is_gone() && new.status == "member" {
            self.handle_bot_added(config, change).await
        } else if new.is_administrator() {
            self.handle_bot_promoted(config, change).await
        } else {
            debug!(
                old = %old.status,
                new = %new.status,
                chat_id = change.chat.id,
                "Bot status change with no setup effect"
            );
            Ok(())
        }
    }

    /// Bot was added to a group. The authorization gate runs first: on
    /// rejection the flow stops and no group row is marked pending.
    async fn handle_bot_added(
        &self,
        config: &BotConfig,
        change: &ChatMemberUpdatedPayload,
    ) -> Result<()> {
        let adder = &change.from;

        if !self.auth.is_authorized(config, adder.id).await? {
            return self.auth.reject_addition(config, &change.chat, adder).await;
        }

        let group = self.reconciler.upsert_group(config, &change.chat).await?;
        let group = self.db.groups.begin_setup(group.id, adder.id).await?;
        logging::log_group_event(group.chat_id, "setup_started", Some(adder.id));

        let keyboard = InlineKeyboard::single_button("Check again", CHECK_ADMIN_CALLBACK);
        if let Err(e) = self
            .api
            .send_message(group.chat_id, SETUP_INSTRUCTIONS, Some(keyboard))
            .await
        {
            warn!(chat_id = group.chat_id, error = %e, "Failed to send setup instructions");
        }

        self.notify_alerts(
            config,
            &format!(
                "Bot added to \"{}\" by {}; waiting for admin promotion.",
                group.title,
                adder.display_name()
            ),
        )
        .await;

        Ok(())
    }

    /// Bot was promoted to administrator. The promoter may be a different
    /// actor than the original adder, so the gate runs again.
    async fn handle_bot_promoted(
        &self,
        config: &BotConfig,
        change: &ChatMemberUpdatedPayload,
    ) -> Result<()> {
        let promoter = &change.from;

        if !self.auth.is_authorized(config, promoter.id).await? {
            return self
                .auth
                .reject_addition(config, &change.chat, promoter)
                .await;
        }

        // upsert_group also runs the supergroup-conversion cleanup
        let group = self.reconciler.upsert_group(config, &change.chat).await?;
        self.complete_setup(config, group).await
    }

    /// The completion sequence shared by promotion and the check-again
    /// button: invite link, setup duration, guarded pending -> complete
    /// transition, then notifications.
    async fn complete_setup(&self, config: &BotConfig, group: Group) -> Result<()> {
        if group.setup_status == SetupStatus::Complete {
            debug!(chat_id = group.chat_id, "Setup already complete");
            return Ok(());
        }
        if !group.setup_status.can_transition_to(SetupStatus::Complete) {
            return Err(GroupGuardError::InvalidStateTransition {
                from: group.setup_status.to_string(),
                to: SetupStatus::Complete.to_string(),
            });
        }

        let invite_link = match self.api.export_chat_invite_link(group.chat_id).await {
            Ok(link) => Some(link),
            Err(e) => {
                warn!(chat_id = group.chat_id, error = %e, "Could not mint invite link");
                None
            }
        };

        let duration_minutes = group
            .setup_started_at
            .map(|started| (Utc::now() - started).num_minutes().max(0))
            .unwrap_or(0);

        let Some(group) = self
            .db
            .groups
            .complete_setup(group.id, invite_link.as_deref(), duration_minutes)
            .await?
        else {
            // Lost a race with a concurrent completion; nothing to announce
            debug!(chat_id = group.chat_id, "Completion raced, leaving row as is");
            return Ok(());
        };

        info!(
            chat_id = group.chat_id,
            duration_minutes = duration_minutes,
            "Group setup completed"
        );
        logging::log_group_event(group.chat_id, "setup_completed", group.added_by_telegram_id);

        if let Err(e) = self.api.send_message(group.chat_id, SETUP_SUCCESS, None).await {
            warn!(chat_id = group.chat_id, error = %e, "Failed to send setup success message");
        }

        self.notify_alerts(
            config,
            &format!(
                "Setup for \"{}\" completed in {} minute(s).",
                group.title, duration_minutes
            ),
        )
        .await;

        Ok(())
    }

    /// Route an inline button interaction
    pub async fn handle_callback(
        &self,
        config: &BotConfig,
        callback: &CallbackQueryPayload,
    ) -> Result<()> {
        match callback.data.as_deref() {
            Some(CHECK_ADMIN_CALLBACK) => self.handle_check_admin(config, callback).await,
            other => {
                debug!(data = ?other, "Ignoring unknown callback");
                self.acknowledge(callback, None).await;
                Ok(())
            }
        }
    }

    /// "Check again": re-check live whether the bot holds administrator
    /// status in the chat, never from cached state.
    async fn handle_check_admin(
        &self,
        config: &BotConfig,
        callback: &CallbackQueryPayload,
    ) -> Result<()> {
        let Some(chat) = callback.message.as_ref().map(|m| m.chat.clone()) else {
            self.acknowledge(callback, Some("This button has expired.")).await;
            return Ok(());
        };

        let Some(group) = self.db.groups.find_by_chat_id(config.id, chat.id).await? else {
            self.acknowledge(callback, Some("This group is not tracked.")).await;
            return Ok(());
        };

        if group.setup_status == SetupStatus::Complete {
            self.acknowledge(callback, Some("Setup is already complete.")).await;
            return Ok(());
        }

        let is_admin = match config.bot_user_id() {
            Some(bot_id) => match self.api.get_chat_member(chat.id, bot_id).await {
                Ok(member) => member.is_administrator(),
                Err(e) => {
                    // Unknown status counts as not admin
                    warn!(chat_id = chat.id, error = %e, "Admin status check failed");
                    false
                }
            },
            None => {
                warn!(config_id = config.id, "Bot token has no parsable bot id");
                false
            }
        };

        if is_admin {
            self.complete_setup(config, group).await?;
            self.acknowledge(callback, Some("Setup complete!")).await;
        } else {
            let keyboard = InlineKeyboard::single_button("Check again", CHECK_ADMIN_CALLBACK);
            if let Err(e) = self
                .api
                .send_message(chat.id, RETRY_PROMPT, Some(keyboard))
                .await
            {
                warn!(chat_id = chat.id, error = %e, "Failed to send retry prompt");
            }
            self.notify_alerts(
                config,
                &format!("Admin check failed for \"{}\"; still waiting.", group.title),
            )
            .await;
            self.acknowledge(callback, Some("Not an administrator yet.")).await;
        }

        Ok(())
    }

    /// Best-effort alert to the configured alerts chat
    async fn notify_alerts(&self, config: &BotConfig, text: &str) {
        let Some(alerts_chat_id) = config.alerts_chat_id else {
            return;
        };
        if let Err(e) = self.api.send_message(alerts_chat_id, text, None).await {
            warn!(alerts_chat_id = alerts_chat_id, error = %e, "Failed to send alert");
        }
    }

    /// Best-effort acknowledgement of a button press
    async fn acknowledge(&self, callback: &CallbackQueryPayload, text: Option<&str>) {
        if let Err(e) = self.api.answer_callback_query(&callback.id, text).await {
            warn!(callback_id = %callback.id, error = %e, "Failed to answer callback query");
        }
    }
}
