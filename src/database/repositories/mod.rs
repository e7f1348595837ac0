//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod bot_config;
pub mod group;
pub mod member;
pub mod message;
pub mod security_audit;
pub mod team_member;

// Re-export repositories
pub use bot_config::BotConfigRepository;
pub use group::GroupRepository;
pub use member::MemberRepository;
pub use message::MessageRepository;
pub use security_audit::SecurityAuditRepository;
pub use team_member::TeamMemberRepository;
