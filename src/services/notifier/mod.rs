//! Outbound notification channel used for announcements and the countdown message.

#[cfg(feature = "discord")]
mod discord;
mod memory;

use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

use crate::dao::models::{ChannelId, MessageId};

#[cfg(feature = "discord")]
pub use self::discord::DiscordNotifier;
pub use self::memory::MemoryNotifier;

/// Result alias for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Failures reported by a notification backend.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The channel or message no longer exists.
    #[error("message or channel not found")]
    NotFound,
    /// The platform refused the request.
    #[error("request rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the platform.
        status: u16,
        /// Response body, kept for the logs.
        body: String,
    },
    /// The request never reached the platform.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Rich message body: optional plain content plus embeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Plain text shown above the embeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Structured cards.
    pub embeds: Vec<Embed>,
}

impl OutboundMessage {
    /// Message made of a single embed.
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }

    /// Attach plain content to the message.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A structured card inside a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Card title.
    pub title: String,
    /// Card description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accent color as `0xRRGGBB`.
    pub color: u32,
    /// Named fields rendered below the description.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    /// Footer line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// New embed with a title and color.
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a full-width field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// Set the footer text.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }
}

/// A named field of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    pub inline: bool,
}

/// Footer of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

/// Abstraction over the chat platform's message API.
pub trait Notifier: Send + Sync {
    /// Post a new message and return its id.
    fn send(
        &self,
        channel: ChannelId,
        message: OutboundMessage,
    ) -> BoxFuture<'static, NotifyResult<MessageId>>;
    /// Replace the body of a previously sent message.
    fn edit(
        &self,
        channel: ChannelId,
        message_id: MessageId,
        message: OutboundMessage,
    ) -> BoxFuture<'static, NotifyResult<()>>;
    /// Delete a previously sent message.
    fn delete(
        &self,
        channel: ChannelId,
        message_id: MessageId,
    ) -> BoxFuture<'static, NotifyResult<()>>;
}
