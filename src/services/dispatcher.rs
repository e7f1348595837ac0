//! Update dispatching
//!
//! Classifies each raw envelope of a poll batch and routes it to the setup
//! state machine or the entity reconciler. Envelopes are processed in
//! remote-assigned order; a per-envelope failure is logged and the batch
//! continues (partial failure is normal).

use tracing::{debug, error};

use crate::models::{BotConfig, MessagePayload, UpdateEnvelope, UpdateEvent};
use crate::services::reconciler::EntityReconciler;
use crate::services::setup::SetupService;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct UpdateDispatcher {
    reconciler: EntityReconciler,
    setup: SetupService,
}

impl UpdateDispatcher {
    pub fn new(reconciler: EntityReconciler, setup: SetupService) -> Self {
        Self { reconciler, setup }
    }

    /// Process one poll batch in array order
    pub async fn process_batch(&self, config: &BotConfig, updates: &[UpdateEnvelope]) {
        for envelope in updates {
            let update_id = envelope.update_id;
            if let Err(e) = self.process_envelope(config, envelope.clone()).await {
                error!(
                    update_id = update_id,
                    error = %e,
                    "Failed to process update, continuing with batch"
                );
            }
        }
    }

    async fn process_envelope(&self, config: &BotConfig, envelope: UpdateEnvelope) -> Result<()> {
        match envelope.classify() {
            UpdateEvent::Callback(callback) => self.setup.handle_callback(config, &callback).await,
            UpdateEvent::BotStatusChange(change) => {
                self.setup.handle_bot_status_change(config, &change).await
            }
            UpdateEvent::MemberStatusChange(change) => {
                self.reconciler
                    .process_member_status_change(config, &change)
                    .await
            }
            UpdateEvent::ChatMessage(message) => self.process_chat_message(config, message).await,
            UpdateEvent::Unsupported => {
                debug!("Skipping unsupported update shape");
                Ok(())
            }
        }
    }

    /// Membership sub-events embedded in the message are handled first,
    /// then the message body is stored for group-typed chats.
    async fn process_chat_message(&self, config: &BotConfig, message: MessagePayload) -> Result<()> {
        if !message.chat.is_group_chat() {
            debug!(
                chat_type = %message.chat.chat_type,
                "Skipping message from non-group chat"
            );
            return Ok(());
        }

        let group = self.reconciler.upsert_group(config, &message.chat).await?;

        if let Some(joined) = &message.new_chat_members {
            for user in joined {
                self.reconciler
                    .process_member_join(config, &group, user)
                    .await?;
            }
        }
        if let Some(left) = &message.left_chat_member {
            self.reconciler
                .process_member_leave(config, &group, left)
                .await?;
        }

        let member = self
            .reconciler
            .upsert_member(message.from.as_ref(), &group)
            .await?;
        self.reconciler
            .store_message(&message, &group, member.as_ref())
            .await?;

        Ok(())
    }
}
