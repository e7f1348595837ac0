//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod bot_config;
pub mod group;
pub mod member;
pub mod message;
pub mod security_audit;
pub mod team_member;
pub mod update;

// Re-export commonly used models
pub use bot_config::{BotConfig, CreateBotConfigRequest};
pub use group::{CreateGroupRequest, Group, SetupStatus};
pub use member::{CreateMemberRequest, Member};
pub use message::{CreateMessageRequest, Message};
pub use security_audit::{CreateSecurityAuditRequest, SecurityAuditEntry};
pub use team_member::{CreateTeamMemberRequest, TeamMember};
pub use update::{
    CallbackQueryPayload, ChatMemberPayload, ChatMemberUpdatedPayload, ChatPayload, MessagePayload,
    UpdateEnvelope, UpdateEvent, UserPayload,
};
