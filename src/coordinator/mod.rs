// Continuity & feedback coordinator - the only stateful logic in the bot
// Keeps looping guilds fed with random stations and nudges testers for feedback

pub mod events; // typed event channel + JSON-lines feeder
pub mod prompt; // feedback DM content

pub use events::{EventHandler, RadioEvent};
pub use prompt::{ControlStyle, FeedbackPrompt, PromptControl, SEND_FEEDBACK_ID};

use crate::catalog::{Catalog, CatalogError};
use crate::ids::{GuildId, UserId};
use crate::player::{Messenger, Player, Track};
use crate::state::{StateStore, TesterPolicy};
use tracing::{debug, info, warn};

/// What a queue-emptied event ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinuityOutcome {
    NotLooping,
    SearchFailed,
    NoResults,
    PlayFailed,
    Played { station_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    NotLooping,
    Cleared,
}

/// What a track-finished event ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    NotTester,
    PolicySilent,
    UnknownStation,
    AlreadyGiven,
    DeliveryFailed,
    Prompted { station_id: String },
}

pub struct Coordinator<P, M> {
    catalog: Catalog,
    state: StateStore,
    player: P,
    messenger: M,
    system_user: UserId,
    default_policy: TesterPolicy,
}

impl<P: Player, M: Messenger> Coordinator<P, M> {
    pub fn new(catalog: Catalog, state: StateStore, player: P, messenger: M, system_user: UserId) -> Self {
        Self {
            catalog,
            state,
            player,
            messenger,
            system_user,
            default_policy: TesterPolicy::default(),
        }
    }

    /// Policy given to testers who opt in without choosing one
    pub fn with_default_policy(mut self, policy: TesterPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Drain the channel, one event at a time, until a `Shutdown` event.
    /// Each event runs to completion before the next.
    pub async fn run(&mut self, events: &mut EventHandler) {
        info!("Coordinator listening for events");
        while let Some(event) = events.next_event().await {
            if matches!(event, RadioEvent::Shutdown) {
                info!("Shutdown requested");
                break;
            }
            self.handle_event(event).await;
        }
        info!(
            "Coordinator stopped, {} guild(s) were still looping",
            self.state.sessions.looping_guilds()
        );
    }

    pub async fn handle_event(&mut self, event: RadioEvent) {
        match event {
            RadioEvent::QueueEmptied { guild_id } => {
                self.on_queue_emptied(&guild_id).await;
            }
            RadioEvent::Disconnected { guild_id } => {
                self.on_disconnected(&guild_id).await;
            }
            RadioEvent::TrackFinished { guild_id, track } => {
                self.on_track_finished(&guild_id, &track).await;
            }
            RadioEvent::StartLoop { guild_id, user_id } => {
                self.start_loop(&guild_id, user_id);
            }
            RadioEvent::StopLoop { guild_id } => {
                self.stop_loop(&guild_id);
            }
            RadioEvent::TesterOptIn { user_id, when } => {
                self.set_tester(user_id, when);
            }
            RadioEvent::TesterOptOut { user_id } => {
                self.remove_tester(&user_id);
            }
            RadioEvent::Feedback { station_id, user_id, payload } => {
                if let Err(e) = self.record_feedback(&station_id, &user_id, payload) {
                    warn!("Feedback not recorded: {}", e);
                }
            }
            RadioEvent::Shutdown => {}
        }
    }

    /// Queue ran dry: if the guild loops, pick a random station and play it.
    /// Search or play failures just leave the queue idle.
    pub async fn on_queue_emptied(&mut self, guild: &GuildId) -> ContinuityOutcome {
        if !self.state.sessions.is_looping(guild) {
            debug!(guild = %guild, "queue empty, loop off");
            return ContinuityOutcome::NotLooping;
        }

        let station = self.catalog.random_station();
        let requester = self
            .state
            .sessions
            .attributed_requester(guild)
            .cloned()
            .unwrap_or_else(|| self.system_user.clone());

        let tracks = match self.player.search(&station.url, &requester).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(guild = %guild, "Next station not resolved: {}", e);
                return ContinuityOutcome::SearchFailed;
            }
        };

        let Some(track) = tracks.into_iter().next() else {
            warn!(guild = %guild, url = %station.url, "Station resolved to no tracks");
            return ContinuityOutcome::NoResults;
        };

        match self.player.play(guild, track).await {
            Ok(()) => {
                info!(guild = %guild, requested_by = %requester, "Looping into '{}'", station.name);
                ContinuityOutcome::Played {
                    station_id: station.id.clone(),
                }
            }
            Err(e) => {
                warn!(guild = %guild, "Could not start '{}': {}", station.name, e);
                ContinuityOutcome::PlayFailed
            }
        }
    }

    /// Bot left the voice channel: turn the loop off and forget who started it
    pub async fn on_disconnected(&mut self, guild: &GuildId) -> DisconnectOutcome {
        if !self.state.sessions.is_looping(guild) {
            debug!(guild = %guild, "disconnect without loop");
            return DisconnectOutcome::NotLooping;
        }

        self.state.sessions.set_looping(guild, false);
        self.player.clear_queue(guild).await;
        self.state.sessions.clear_session(guild);

        info!(guild = %guild, "Disconnected, loop stopped");
        DisconnectOutcome::Cleared
    }

    /// A track ended: ask its requester for feedback about the station,
    /// once per (user, station). The check happens before sending, so two
    /// finishes racing ahead of the recorded feedback could both prompt.
    pub async fn on_track_finished(&mut self, guild: &GuildId, track: &Track) -> FeedbackOutcome {
        let requester = &track.requested_by;

        let Some(preference) = self.state.testers.get(requester) else {
            return FeedbackOutcome::NotTester;
        };

        if !preference.when.fires_on_track_end() {
            return FeedbackOutcome::PolicySilent;
        }

        let Some(station) = self.catalog.find_by_url(&track.url) else {
            debug!(guild = %guild, url = %track.url, "finished track is not a catalog station");
            return FeedbackOutcome::UnknownStation;
        };

        if station.has_feedback_from(requester) {
            debug!(user = %requester, station = %station.id, "feedback already given");
            return FeedbackOutcome::AlreadyGiven;
        }

        let prompt = FeedbackPrompt::for_station(station, track);
        match self.messenger.send_direct_message(requester, &prompt).await {
            Ok(()) => {
                info!(user = %requester, "Asked for feedback on '{}'", station.name);
                FeedbackOutcome::Prompted {
                    station_id: station.id.clone(),
                }
            }
            Err(e) => {
                warn!("Feedback prompt dropped: {}", e);
                FeedbackOutcome::DeliveryFailed
            }
        }
    }

    /// Loop command: enable looping and credit auto-picked tracks to `user`
    pub fn start_loop(&mut self, guild: &GuildId, user: UserId) {
        info!(guild = %guild, user = %user, "Loop started");
        self.state.sessions.set_looping(guild, true);
        self.state.sessions.set_requester(guild, user);
    }

    pub fn stop_loop(&mut self, guild: &GuildId) {
        info!(guild = %guild, "Loop stopped");
        self.state.sessions.clear_session(guild);
    }

    pub fn set_tester(&mut self, user: UserId, when: Option<TesterPolicy>) {
        let when = when.unwrap_or(self.default_policy);
        info!(user = %user, "Tester opted in ({})", when);
        self.state.testers.set(user, when);
    }

    pub fn remove_tester(&mut self, user: &UserId) {
        if self.state.testers.remove(user).is_some() {
            info!(user = %user, "Tester opted out");
        }
    }

    /// "Send feedback" button action
    pub fn record_feedback(
        &mut self,
        station_id: &str,
        user: &UserId,
        payload: String,
    ) -> Result<(), CatalogError> {
        self.catalog.record_feedback(station_id, user, payload)?;
        Ok(())
    }
}
