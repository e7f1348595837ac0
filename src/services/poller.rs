//! Poll worker
//!
//! One logical worker per bot configuration: a single long-poll request in
//! flight at a time, the offset committed durably before the batch is
//! dispatched. A cycle that fails entirely simply produces zero progress
//! and is retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::database::DatabaseService;
use crate::services::dispatcher::UpdateDispatcher;
use crate::services::offset::OffsetTracker;
use crate::telegram::{TelegramApi, ALLOWED_UPDATES};
use crate::utils::errors::{GroupGuardError, Result};
use crate::utils::logging;

#[derive(Clone)]
pub struct PollWorker {
    db: DatabaseService,
    api: Arc<dyn TelegramApi>,
    dispatcher: UpdateDispatcher,
    offsets: OffsetTracker,
    long_poll_timeout_seconds: u64,
}

impl PollWorker {
    pub fn new(
        db: DatabaseService,
        api: Arc<dyn TelegramApi>,
        dispatcher: UpdateDispatcher,
        offsets: OffsetTracker,
        long_poll_timeout_seconds: u64,
    ) -> Self {
        Self {
            db,
            api,
            dispatcher,
            offsets,
            long_poll_timeout_seconds,
        }
    }

    /// Run one poll cycle; returns the number of updates processed.
    ///
    /// A transport failure yields zero updates rather than an error; the
    /// next scheduled cycle retries.
    pub async fn run_cycle(&self, config_id: i64) -> Result<usize> {
        let mut config = self
            .db
            .configs
            .find_by_id(config_id)
            .await?
            .ok_or(GroupGuardError::ConfigNotFound { config_id })?;

        if !config.is_active {
            debug!(config_id = config_id, "Configuration inactive, skipping cycle");
            return Ok(0);
        }

        let offset = self.offsets.next_offset(&config);
        let updates = match self
            .api
            .get_updates(offset, self.long_poll_timeout_seconds, ALLOWED_UPDATES)
            .await
        {
            Ok(updates) => updates,
            Err(e) => {
                warn!(config_id = config_id, error = %e, "getUpdates failed, no updates this cycle");
                return Ok(0);
            }
        };

        if updates.is_empty() {
            return Ok(0);
        }

        // Offset commit comes first: a redelivered batch after a commit
        // failure is absorbed by the idempotent pipeline, a processed
        // batch is never delivered twice after a successful commit.
        self.offsets.commit(&mut config, &updates).await?;

        self.dispatcher.process_batch(&config, &updates).await;

        logging::log_poll_cycle(config.id, updates.len(), config.last_update_id);
        Ok(updates.len())
    }

    /// Poll forever on a fixed interval
    pub async fn run(&self, config_id: i64, poll_interval: Duration) {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.run_cycle(config_id).await {
                error!(config_id = config_id, error = %e, "Poll cycle failed, retrying next tick");
            }
        }
    }
}
