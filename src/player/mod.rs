// Boundaries to the voice player and the chat platform's DMs
// The coordinator only ever talks to these traits, never to a real client

pub mod console; // log-only stand-ins used by the binary

pub use console::{ConsoleMessenger, ConsolePlayer};

use crate::coordinator::FeedbackPrompt;
use crate::ids::{GuildId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A resolved, playable track as the player reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub requested_by: UserId,
}

impl Track {
    pub fn new(url: impl Into<String>, requested_by: UserId) -> Self {
        Self {
            url: url.into(),
            thumbnail: None,
            requested_by,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("Search failed for {url}: {reason}")]
    Search { url: String, reason: String },

    #[error("Playback failed: {0}")]
    Playback(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Usually the user has direct messages closed
    #[error("Could not deliver message to {user}: {reason}")]
    Rejected { user: UserId, reason: String },
}

#[async_trait]
pub trait Player: Send + Sync {
    /// Resolve a URL into playable tracks credited to `requested_by`.
    /// An empty list is a valid answer.
    async fn search(&self, url: &str, requested_by: &UserId) -> Result<Vec<Track>, PlayerError>;

    async fn play(&self, guild: &GuildId, track: Track) -> Result<(), PlayerError>;

    async fn clear_queue(&self, guild: &GuildId);
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_direct_message(
        &self,
        user: &UserId,
        prompt: &FeedbackPrompt,
    ) -> Result<(), DeliveryError>;
}
