use crate::ids::{GuildId, UserId};
use crate::player::Track;
use crate::state::TesterPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Everything the coordinator reacts to, one JSON object per line on the wire:
/// `{"type": "queue_emptied", "guild_id": "g1"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RadioEvent {
    // Player events
    QueueEmptied {
        guild_id: GuildId,
    },
    Disconnected {
        guild_id: GuildId,
    },
    TrackFinished {
        guild_id: GuildId,
        track: Track,
    },

    // Listener commands
    StartLoop {
        guild_id: GuildId,
        user_id: UserId,
    },
    StopLoop {
        guild_id: GuildId,
    },
    TesterOptIn {
        user_id: UserId,
        #[serde(default)]
        when: Option<TesterPolicy>,
    },
    TesterOptOut {
        user_id: UserId,
    },
    Feedback {
        station_id: String,
        user_id: UserId,
        payload: String,
    },

    Shutdown,
}

pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<RadioEvent>,
    event_receiver: mpsc::UnboundedReceiver<RadioEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<RadioEvent> {
        self.event_sender.clone()
    }

    pub async fn next_event(&mut self) -> Option<RadioEvent> {
        self.event_receiver.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed JSON-lines events into the channel until EOF or a `Shutdown` line,
/// then make sure the loop is told to stop. Lines that aren't UTF-8 or
/// aren't valid events are logged and skipped. Blocking: run it on its own
/// thread. Returns how many events were forwarded.
pub fn forward_lines<R>(mut reader: R, sender: mpsc::UnboundedSender<RadioEvent>) -> Result<usize>
where
    R: BufRead,
{
    let mut buf = Vec::new();
    let mut forwarded = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                let _ = sender.send(RadioEvent::Shutdown);
                return Err(e.into());
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Skipping event line that is not UTF-8: {}", e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RadioEvent>(line) {
            Ok(event) => {
                debug!(?event, "event received");
                let shutdown = matches!(event, RadioEvent::Shutdown);
                if sender.send(event).is_err() {
                    // loop is gone, nothing left to feed
                    return Ok(forwarded);
                }
                forwarded += 1;
                if shutdown {
                    return Ok(forwarded);
                }
            }
            Err(e) => warn!("Skipping malformed event line: {}", e),
        }
    }

    let _ = sender.send(RadioEvent::Shutdown);
    Ok(forwarded)
}
