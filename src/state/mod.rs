// Process-lifetime state the coordinator works from
// Nothing here is persisted - a restart means every loop is off again

pub mod tester; // tester opt-in and timing policy

pub use tester::{TesterPolicy, TesterPreference};

use crate::ids::{GuildId, UserId};
use std::collections::HashMap;

/// Per-guild loop flag and the listener credited for auto-picked tracks
#[derive(Debug, Default)]
pub struct SessionState {
    looping: HashMap<GuildId, bool>,
    requesters: HashMap<GuildId, UserId>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_looping(&self, guild: &GuildId) -> bool {
        self.looping.get(guild).copied().unwrap_or(false)
    }

    pub fn set_looping(&mut self, guild: &GuildId, enabled: bool) {
        self.looping.insert(guild.clone(), enabled);
    }

    pub fn attributed_requester(&self, guild: &GuildId) -> Option<&UserId> {
        self.requesters.get(guild)
    }

    pub fn set_requester(&mut self, guild: &GuildId, user: UserId) {
        self.requesters.insert(guild.clone(), user);
    }

    /// Drop both the loop flag and the attribution. Safe to repeat.
    pub fn clear_session(&mut self, guild: &GuildId) {
        self.looping.remove(guild);
        self.requesters.remove(guild);
    }

    pub fn looping_guilds(&self) -> usize {
        self.looping.values().filter(|&&on| on).count()
    }
}

/// Who opted in to feedback prompts, and when they want them
#[derive(Debug, Default)]
pub struct TesterRegistry {
    preferences: HashMap<UserId, TesterPreference>,
}

impl TesterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId) -> Option<TesterPreference> {
        self.preferences.get(user).copied()
    }

    pub fn set(&mut self, user: UserId, when: TesterPolicy) {
        self.preferences.insert(user, TesterPreference { when });
    }

    pub fn remove(&mut self, user: &UserId) -> Option<TesterPreference> {
        self.preferences.remove(user)
    }

    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }
}

/// Everything the coordinator owns, handed in at construction so each
/// coordinator (and each test) gets its own isolated maps.
#[derive(Debug, Default)]
pub struct StateStore {
    pub sessions: SessionState,
    pub testers: TesterRegistry,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_defaults_off() {
        let state = SessionState::new();
        assert!(!state.is_looping(&GuildId::new("g1")));
        assert!(state.attributed_requester(&GuildId::new("g1")).is_none());
    }

    #[test]
    fn test_clear_session_resets_both() {
        let mut state = SessionState::new();
        let guild = GuildId::new("g1");
        state.set_looping(&guild, true);
        state.set_requester(&guild, UserId::new("user1"));

        state.clear_session(&guild);
        assert!(!state.is_looping(&guild));
        assert!(state.attributed_requester(&guild).is_none());

        // idempotent
        state.clear_session(&guild);
        assert!(!state.is_looping(&guild));
    }

    #[test]
    fn test_guilds_are_isolated() {
        let mut state = SessionState::new();
        let g1 = GuildId::new("g1");
        let g2 = GuildId::new("g2");
        state.set_looping(&g1, true);
        state.set_looping(&g2, true);
        state.set_requester(&g2, UserId::new("user2"));

        state.clear_session(&g1);
        assert!(state.is_looping(&g2));
        assert_eq!(state.attributed_requester(&g2), Some(&UserId::new("user2")));
        assert_eq!(state.looping_guilds(), 1);
    }

    #[test]
    fn test_tester_registry() {
        let mut testers = TesterRegistry::new();
        let user = UserId::new("user1");
        assert!(testers.get(&user).is_none());

        testers.set(user.clone(), TesterPolicy::Everytime);
        assert_eq!(testers.get(&user).map(|p| p.when), Some(TesterPolicy::Everytime));

        testers.set(user.clone(), TesterPolicy::Songend);
        assert_eq!(testers.len(), 1);

        assert!(testers.remove(&user).is_some());
        assert!(testers.is_empty());
    }
}
