use super::{DeliveryError, Messenger, Player, PlayerError, Track};
use crate::coordinator::FeedbackPrompt;
use crate::ids::{GuildId, UserId};
use async_trait::async_trait;
use tracing::info;

/// Resolves every URL into a single track and logs what would be played.
/// Lets the event loop run without a voice connection.
#[derive(Debug, Default, Clone)]
pub struct ConsolePlayer;

impl ConsolePlayer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Player for ConsolePlayer {
    async fn search(&self, url: &str, requested_by: &UserId) -> Result<Vec<Track>, PlayerError> {
        if url.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Track::new(url, requested_by.clone())])
    }

    async fn play(&self, guild: &GuildId, track: Track) -> Result<(), PlayerError> {
        info!(guild = %guild, url = %track.url, requested_by = %track.requested_by, "▶ play");
        Ok(())
    }

    async fn clear_queue(&self, guild: &GuildId) {
        info!(guild = %guild, "queue cleared");
    }
}

/// Prints feedback prompts instead of sending DMs
#[derive(Debug, Default, Clone)]
pub struct ConsoleMessenger;

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_direct_message(
        &self,
        user: &UserId,
        prompt: &FeedbackPrompt,
    ) -> Result<(), DeliveryError> {
        info!(user = %user, station = %prompt.station_id, "✉ {}", prompt.description);
        Ok(())
    }
}
