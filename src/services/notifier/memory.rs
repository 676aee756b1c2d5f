use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use tracing::info;

use super::{Notifier, NotifyError, NotifyResult, OutboundMessage};
use crate::dao::models::{ChannelId, MessageId};

/// A message held by [`MemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Channel the message was posted to.
    pub channel: ChannelId,
    /// Latest body of the message.
    pub message: OutboundMessage,
}

/// Notifier that keeps messages in memory and logs them.
///
/// Used when no bot token is configured, and by tests to observe what would
/// have been posted.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    messages: Arc<DashMap<MessageId, StoredMessage>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current body of a message, if it still exists.
    pub fn message(&self, id: MessageId) -> Option<StoredMessage> {
        self.messages.get(&id).map(|entry| entry.value().clone())
    }

    /// All live messages ordered by id.
    pub fn messages(&self) -> Vec<(MessageId, StoredMessage)> {
        let mut all: Vec<_> = self
            .messages
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Drop a message as if someone deleted it on the platform.
    pub fn forget(&self, id: MessageId) -> bool {
        self.messages.remove(&id).is_some()
    }
}

impl Notifier for MemoryNotifier {
    fn send(
        &self,
        channel: ChannelId,
        message: OutboundMessage,
    ) -> BoxFuture<'static, NotifyResult<MessageId>> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        info!(
            channel = %channel,
            message_id = %id,
            title = message.embeds.first().map(|embed| embed.title.as_str()).unwrap_or(""),
            "message posted"
        );
        self.messages.insert(id, StoredMessage { channel, message });
        Box::pin(async move { Ok(id) })
    }

    fn edit(
        &self,
        channel: ChannelId,
        message_id: MessageId,
        message: OutboundMessage,
    ) -> BoxFuture<'static, NotifyResult<()>> {
        let result = match self.messages.get_mut(&message_id) {
            Some(mut stored) if stored.channel == channel => {
                stored.message = message;
                Ok(())
            }
            _ => Err(NotifyError::NotFound),
        };
        Box::pin(async move { result })
    }

    fn delete(
        &self,
        channel: ChannelId,
        message_id: MessageId,
    ) -> BoxFuture<'static, NotifyResult<()>> {
        let removed = self
            .messages
            .remove_if(&message_id, |_, stored| stored.channel == channel)
            .is_some();
        let result = if removed {
            Ok(())
        } else {
            Err(NotifyError::NotFound)
        };
        Box::pin(async move { result })
    }
}
