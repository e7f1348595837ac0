//! Polling offset tracking
//!
//! Guarantees each update is delivered to the pipeline at most once across
//! restarts: the committed offset only ever moves forward, and it is made
//! durable before the batch's side effects run.

use tracing::debug;

use crate::database::repositories::BotConfigRepository;
use crate::models::{BotConfig, UpdateEnvelope};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct OffsetTracker {
    configs: BotConfigRepository,
}

impl OffsetTracker {
    pub fn new(configs: BotConfigRepository) -> Self {
        Self { configs }
    }

    /// The `getUpdates` offset for the next poll, or `None` when no update
    /// has ever been processed for this configuration.
    pub fn next_offset(&self, config: &BotConfig) -> Option<i64> {
        if config.last_update_id > 0 {
            Some(config.last_update_id + 1)
        } else {
            None
        }
    }

    /// Persist the highest update id seen in the batch.
    ///
    /// Out-of-order or replayed batches never move the offset backwards;
    /// they commit as a no-op.
    pub async fn commit(
        &self,
        config: &mut BotConfig,
        updates: &[UpdateEnvelope],
    ) -> Result<()> {
        let Some(highest) = updates.iter().map(|u| u.update_id).max() else {
            return Ok(());
        };

        if highest <= config.last_update_id {
            debug!(
                config_id = config.id,
                highest = highest,
                last_update_id = config.last_update_id,
                "Batch does not advance the offset"
            );
            return Ok(());
        }

        self.configs
            .advance_last_update_id(config.id, highest)
            .await?;
        config.last_update_id = highest;

        Ok(())
    }
}
