//! Database module
//!
//! This module handles connection pooling, migrations and data access

pub mod connection;
pub mod repositories;
pub mod service;

pub use connection::{create_pool, health_check, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{
    BotConfigRepository, GroupRepository, MemberRepository, MessageRepository,
    SecurityAuditRepository, TeamMemberRepository,
};
pub use service::DatabaseService;
