//! Entity reconciliation
//!
//! Idempotent upserts of groups, members and messages from raw update
//! payloads, plus membership join/leave transitions and their effect on
//! the global team registry.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::{
    BotConfig, ChatMemberUpdatedPayload, ChatPayload, CreateGroupRequest, CreateMemberRequest,
    CreateMessageRequest, CreateTeamMemberRequest, Group, Member, Message, MessagePayload,
    UserPayload,
};
use crate::utils::errors::Result;

/// Supergroup chat ids are the old group id re-issued under this prefix
const SUPERGROUP_CHAT_PREFIX: &str = "-100";

/// How far back the conversion-cleanup heuristic looks for the stale row
const CONVERSION_WINDOW_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct EntityReconciler {
    db: DatabaseService,
}

impl EntityReconciler {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Find or create the group row for a chat, in the default `pending`
    /// lifecycle state.
    pub async fn upsert_group(&self, config: &BotConfig, chat: &ChatPayload) -> Result<Group> {
        let title = chat
            .title
            .clone()
            .unwrap_or_else(|| "Unknown Group".to_string());

        if chat.id.to_string().starts_with(SUPERGROUP_CHAT_PREFIX) {
            self.cleanup_conversion_duplicate(config, chat.id, &title)
                .await?;
        }

        self.db
            .groups
            .find_or_create(CreateGroupRequest {
                config_id: config.id,
                chat_id: chat.id,
                title,
                chat_type: chat.chat_type.clone(),
            })
            .await
    }

    /// Best-effort heuristic for group -> supergroup conversion: a row with
    /// the same title under the same config, created within the last few
    /// minutes under a different chat id, is treated as the pre-conversion
    /// duplicate and deleted. Members and messages attached to the stale
    /// row are dropped by the cascade, not migrated.
    async fn cleanup_conversion_duplicate(
        &self,
        config: &BotConfig,
        chat_id: i64,
        title: &str,
    ) -> Result<()> {
        let cutoff = Utc::now() - Duration::minutes(CONVERSION_WINDOW_MINUTES);
        if let Some(stale) = self
            .db
            .groups
            .find_conversion_duplicate(config.id, title, chat_id, cutoff)
            .await?
        {
            warn!(
                stale_chat_id = stale.chat_id,
                chat_id = chat_id,
                title = title,
                "Removing pre-conversion duplicate group row"
            );
            self.db.groups.delete(stale.id).await?;
        }

        Ok(())
    }

    /// Find or create the member row for a sender. Returns `None` when the
    /// payload carries no sender identity (channel posts).
    pub async fn upsert_member(
        &self,
        from: Option<&UserPayload>,
        group: &Group,
    ) -> Result<Option<Member>> {
        let Some(from) = from else {
            return Ok(None);
        };

        let member = self
            .db
            .members
            .find_or_create(CreateMemberRequest {
                group_id: group.id,
                telegram_id: from.id,
                display_name: from.display_name(),
                username: from.username.clone(),
                is_bot: from.is_bot,
            })
            .await?;

        Ok(Some(member))
    }

    /// Store a message at most once; a redelivered envelope returns the
    /// existing row unchanged.
    pub async fn store_message(
        &self,
        message: &MessagePayload,
        group: &Group,
        member: Option<&Member>,
    ) -> Result<Message> {
        let sent_at = DateTime::from_timestamp(message.date, 0).unwrap_or_else(Utc::now);

        self.db
            .messages
            .store(CreateMessageRequest {
                group_id: group.id,
                member_id: member.map(|m| m.id),
                message_id: message.message_id,
                text: message.body(),
                sent_at,
                is_reply: message.is_reply(),
            })
            .await
    }

    /// A user joined a group: reactivate or create the member row, and
    /// sync the team registry when this is the team source group.
    pub async fn process_member_join(
        &self,
        config: &BotConfig,
        group: &Group,
        user: &UserPayload,
    ) -> Result<Member> {
        let member = match self
            .db
            .members
            .find_by_telegram_id(group.id, user.id)
            .await?
        {
            Some(existing) if !existing.is_active => {
                info!(
                    telegram_id = user.id,
                    group_id = group.id,
                    "Member rejoined, reactivating"
                );
                self.db.members.reactivate(existing.id).await?
            }
            Some(existing) => existing,
            None => {
                self.db
                    .members
                    .find_or_create(CreateMemberRequest {
                        group_id: group.id,
                        telegram_id: user.id,
                        display_name: user.display_name(),
                        username: user.username.clone(),
                        is_bot: user.is_bot,
                    })
                    .await?
            }
        };

        if config.team_group_chat_id == Some(group.chat_id) {
            self.db
                .team_members
                .upsert_active(CreateTeamMemberRequest {
                    telegram_id: user.id,
                    display_name: user.display_name(),
                    username: user.username.clone(),
                })
                .await?;
            info!(telegram_id = user.id, "Team registry updated from join");
        }

        Ok(member)
    }

    /// A user left a group: deactivate the member row with a leave
    /// timestamp, and deactivate the team registry entry when this is the
    /// team source group. Registry rows are never deleted.
    pub async fn process_member_leave(
        &self,
        config: &BotConfig,
        group: &Group,
        user: &UserPayload,
    ) -> Result<Option<Member>> {
        let member = match self
            .db
            .members
            .find_by_telegram_id(group.id, user.id)
            .await?
        {
            Some(existing) => Some(self.db.members.deactivate(existing.id).await?),
            None => {
                debug!(
                    telegram_id = user.id,
                    group_id = group.id,
                    "Leave event for an untracked member"
                );
                None
            }
        };

        if config.team_group_chat_id == Some(group.chat_id) {
            if self.db.team_members.deactivate(user.id).await?.is_some() {
                info!(telegram_id = user.id, "Team member deactivated after leaving the team group");
            }
        }

        Ok(member)
    }

    /// Route a tracked member's status change into a join or a leave
    pub async fn process_member_status_change(
        &self,
        config: &BotConfig,
        change: &ChatMemberUpdatedPayload,
    ) -> Result<()> {
        if !change.chat.is_group_chat() {
            debug!(
                chat_type = %change.chat.chat_type,
                "Skipping member status change from non-group chat"
            );
            return Ok(());
        }

        let group = self.upsert_group(config, &change.chat).await?;
        let user = &change.new_chat_member.user;

        if change.old_chat_member.is_gone() && change.new_chat_member.is_present() {
            self.process_member_join(config, &group, user).await?;
        } else if change.old_chat_member.is_present() && change.new_chat_member.is_gone() {
            self.process_member_leave(config, &group, user).await?;
        } else {
            debug!(
                old = %change.old_chat_member.status,
                new = %change.new_chat_member.status,
                "Member status change with no join/leave effect"
            );
        }

        Ok(())
    }
}
