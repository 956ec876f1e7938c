// Station catalog - the fixed list of radio stations we can loop through
// Loaded once at boot, then only feedback records ever change

pub mod integrity; // duplicate detection run before we start serving

pub use integrity::{detect_duplicates, ensure_unique, Duplicate, DuplicateField};

use crate::ids::UserId;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Errors from loading or mutating the catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid station file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Station catalog is empty")]
    Empty,

    #[error("{} duplicated station(s) in catalog", .0.len())]
    Duplicates(Vec<Duplicate>),

    #[error("Station not found: {0}")]
    StationNotFound(String),

    #[error("User {user} already sent feedback for station {station}")]
    FeedbackExists { station: String, user: UserId },
}

/// A radio station as configured in the station file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub url: String, // canonical stream URL, also what the player resolves
    pub emoji: String,
    #[serde(default)]
    pub feedbacks: Vec<FeedbackRecord>,
}

/// Proof that a user already answered the feedback prompt for a station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    pub user_id: UserId,
    pub payload: String,
    pub recorded_at: DateTime<Utc>,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            emoji: emoji.into(),
            feedbacks: Vec::new(),
        }
    }

    pub fn has_feedback_from(&self, user: &UserId) -> bool {
        self.feedbacks.iter().any(|f| &f.user_id == user)
    }

    /// "{emoji} {name}", how a station is shown to listeners
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    stations: Vec<Station>,
}

impl Catalog {
    /// Build a catalog. An empty station list is a configuration error.
    pub fn new(stations: Vec<Station>) -> Result<Self, CatalogError> {
        if stations.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { stations })
    }

    /// Load stations from a JSON array file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let stations: Vec<Station> = serde_json::from_str(&content)?;
        info!("Loaded {} stations from {}", stations.len(), path.display());
        Self::new(stations)
    }

    pub fn list_all(&self) -> &[Station] {
        &self.stations
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Uniform random pick over every station
    pub fn random_station(&self) -> &Station {
        self.random_station_with(&mut rand::thread_rng())
    }

    pub fn random_station_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Station {
        // Non-empty is guaranteed by `new`
        &self.stations[rng.gen_range(0..self.stations.len())]
    }

    /// Exact match on the stream URL. Tracks that didn't come from the
    /// catalog simply have no station.
    pub fn find_by_url(&self, url: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.url == url)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn detect_duplicates(&self) -> Vec<Duplicate> {
        detect_duplicates(&self.stations)
    }

    pub fn ensure_unique(&self) -> Result<(), CatalogError> {
        ensure_unique(&self.stations)
    }

    /// Store a user's feedback for a station. At most one record per
    /// (station, user); a second one is refused.
    pub fn record_feedback(
        &mut self,
        station_id: &str,
        user: &UserId,
        payload: impl Into<String>,
    ) -> Result<&FeedbackRecord, CatalogError> {
        let station = self
            .stations
            .iter_mut()
            .find(|s| s.id == station_id)
            .ok_or_else(|| CatalogError::StationNotFound(station_id.to_string()))?;

        if station.has_feedback_from(user) {
            return Err(CatalogError::FeedbackExists {
                station: station.id.clone(),
                user: user.clone(),
            });
        }

        station.feedbacks.push(FeedbackRecord {
            user_id: user.clone(),
            payload: payload.into(),
            recorded_at: Utc::now(),
        });
        info!("Recorded feedback from {} for station '{}'", user, station.name);

        Ok(&station.feedbacks[station.feedbacks.len() - 1])
    }
}
