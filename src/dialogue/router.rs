//! Conversation-keyed event routing.
//!
//! Every conversation gets one worker task that owns that conversation's
//! session and processes its events in arrival order. Events reach the
//! worker over an mpsc queue, so a session is never touched by more than
//! one task and conversations never block each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::channels::{ChatChannel, ChatEvent, ConversationId};
use crate::dialogue::{RouteDialogue, RouteSession};

/// Routes inbound events to per-conversation workers.
pub struct ConversationRouter {
    dialogue: Arc<RouteDialogue>,
    channel: Arc<dyn ChatChannel>,
    workers: HashMap<ConversationId, mpsc::UnboundedSender<ChatEvent>>,
}

impl ConversationRouter {
    pub fn new(dialogue: Arc<RouteDialogue>, channel: Arc<dyn ChatChannel>) -> Self {
        Self {
            dialogue,
            channel,
            workers: HashMap::new(),
        }
    }

    /// Route one event to its conversation's worker, spawning the worker on
    /// first contact.
    pub fn dispatch(&mut self, event: ChatEvent) {
        let conversation = event.conversation.clone();

        let event = if let Some(sender) = self.workers.get(&conversation) {
            match sender.send(event) {
                Ok(()) => return,
                Err(mpsc::error::SendError(event)) => {
                    warn!("Worker for conversation {conversation} was gone; restarting");
                    event
                }
            }
        } else {
            event
        };

        let sender = spawn_worker(
            conversation.clone(),
            Arc::clone(&self.dialogue),
            Arc::clone(&self.channel),
        );
        if sender.send(event).is_err() {
            error!("Fresh worker for conversation {conversation} rejected its first event");
        }
        self.workers.insert(conversation, sender);
    }

    /// Number of conversations with a live worker.
    #[must_use]
    pub fn active_conversations(&self) -> usize {
        self.workers.len()
    }
}

fn spawn_worker(
    conversation: ConversationId,
    dialogue: Arc<RouteDialogue>,
    channel: Arc<dyn ChatChannel>,
) -> mpsc::UnboundedSender<ChatEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();

    tokio::spawn(async move {
        debug!("Worker started for conversation {conversation}");
        let mut session: Option<RouteSession> = None;

        while let Some(event) = rx.recv().await {
            let replies = dialogue.handle(&mut session, &event).await;
            for reply in replies {
                if let Err(e) = channel.send(&conversation, reply).await {
                    error!("Failed to send reply to {conversation}: {e}");
                }
            }
        }

        debug!("Worker stopped for conversation {conversation}");
    });

    tx
}
