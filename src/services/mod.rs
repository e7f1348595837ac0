//! Services module
//!
//! This module contains the update-ingestion pipeline services

pub mod auth;
pub mod dispatcher;
pub mod offset;
pub mod poller;
pub mod reconciler;
pub mod setup;

// Re-export commonly used services
pub use auth::AuthorizationGate;
pub use dispatcher::UpdateDispatcher;
pub use offset::OffsetTracker;
pub use poller::PollWorker;
pub use reconciler::EntityReconciler;
pub use setup::{SetupService, CHECK_ADMIN_CALLBACK};

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::telegram::TelegramApi;

/// Service factory wiring the pipeline for one bot deployment
#[derive(Clone)]
pub struct ServiceFactory {
    pub reconciler: EntityReconciler,
    pub auth: AuthorizationGate,
    pub setup: SetupService,
    pub dispatcher: UpdateDispatcher,
    pub offsets: OffsetTracker,
    pub poll_worker: PollWorker,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, api: Arc<dyn TelegramApi>, settings: &Settings) -> Self {
        let reconciler = EntityReconciler::new(db.clone());
        let auth = AuthorizationGate::new(db.clone(), api.clone());
        let setup = SetupService::new(db.clone(), api.clone(), auth.clone(), reconciler.clone());
        let dispatcher = UpdateDispatcher::new(reconciler.clone(), setup.clone());
        let offsets = OffsetTracker::new(db.configs.clone());
        let poll_worker = PollWorker::new(
            db,
            api,
            dispatcher.clone(),
            offsets.clone(),
            settings.telegram.long_poll_timeout_seconds,
        );

        Self {
            reconciler,
            auth,
            setup,
            dispatcher,
            offsets,
            poll_worker,
        }
    }
}
