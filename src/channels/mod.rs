//! Channel abstraction for chat I/O.

pub mod telegram;

pub use telegram::TelegramChannel;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// Identity of one conversation on the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(pub String);

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound event kinds the dialogue consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Plain text message.
    Text(String),
    /// Device-reported geolocation.
    Location { latitude: f64, longitude: f64 },
    /// Selection of an inline keyboard choice.
    Callback(String),
}

/// One inbound chat event, tagged with its conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEvent {
    pub conversation: ConversationId,
    pub kind: EventKind,
}

impl ChatEvent {
    pub fn text(conversation: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation: ConversationId(conversation.into()),
            kind: EventKind::Text(text.into()),
        }
    }

    pub fn location(conversation: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            conversation: ConversationId(conversation.into()),
            kind: EventKind::Location {
                latitude,
                longitude,
            },
        }
    }

    pub fn callback(conversation: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            conversation: ConversationId(conversation.into()),
            kind: EventKind::Callback(data.into()),
        }
    }
}

/// One choice on an inline keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Button label shown to the user.
    pub label: String,
    /// Callback payload delivered back when selected.
    pub data: String,
}

/// Outbound reply kinds the dialogue emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain text.
    Text(String),
    /// Text with an inline choice keyboard.
    Choices { text: String, options: Vec<Choice> },
    /// Text with a reply keyboard offering a share-location button.
    LocationRequest { text: String, button: String },
    /// In-memory photo (the visual variant's chart).
    Photo {
        data: Vec<u8>,
        caption: Option<String>,
    },
    /// In-memory document (the visual variant's map).
    Document {
        data: Vec<u8>,
        file_name: String,
        caption: Option<String>,
    },
}

/// Stream of inbound events produced by a started channel.
pub type EventStream = Pin<Box<dyn Stream<Item = ChatEvent> + Send>>;

/// A chat transport: delivers inbound events, accepts outbound replies.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Start listening and return the inbound event stream.
    async fn start(&self) -> Result<EventStream, ChannelError>;

    /// Send one reply to a conversation.
    async fn send(&self, conversation: &ConversationId, reply: Reply) -> Result<(), ChannelError>;

    /// Verify the transport is reachable.
    async fn health_check(&self) -> Result<(), ChannelError>;
}
