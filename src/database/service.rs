//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::config::Settings;
use crate::database::connection::DatabasePool;
use crate::database::repositories::{
    BotConfigRepository, GroupRepository, MemberRepository, MessageRepository,
    SecurityAuditRepository, TeamMemberRepository,
};
use crate::models::{BotConfig, CreateBotConfigRequest};
use crate::utils::errors::GroupGuardError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub configs: BotConfigRepository,
    pub groups: GroupRepository,
    pub members: MemberRepository,
    pub messages: MessageRepository,
    pub team_members: TeamMemberRepository,
    pub security_audit: SecurityAuditRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            configs: BotConfigRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            members: MemberRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            team_members: TeamMemberRepository::new(pool.clone()),
            security_audit: SecurityAuditRepository::new(pool),
        }
    }

    /// Make sure a bot configuration row exists for the configured deployment
    pub async fn ensure_config(&self, settings: &Settings) -> Result<BotConfig, GroupGuardError> {
        if let Some(existing) = self.configs.find_by_name(&settings.bot.name).await? {
            return Ok(existing);
        }

        self.configs
            .create(CreateBotConfigRequest {
                name: settings.bot.name.clone(),
                bot_token: settings.bot.token.clone(),
                owner_telegram_id: settings.bot.owner_id,
                team_group_chat_id: settings.bot.team_group_chat_id,
                alerts_chat_id: settings.bot.alerts_chat_id,
                audit_enabled: settings.bot.audit_enabled,
            })
            .await
    }
}
