// Lucy Radio Library - looping radio and tester feedback for voice channels
// The bot framework drives us through events; everything stateful lives here

pub mod catalog;     // stations, feedback records, duplicate check
pub mod config;      // settings and paths
pub mod coordinator; // reacts to player events and listener commands
pub mod ids;         // guild and user identifiers
pub mod player;      // player and messaging boundaries
pub mod state;       // loop flags, attribution, tester preferences

// Export the stuff other modules actually use
pub use catalog::{Catalog, CatalogError, Duplicate, FeedbackRecord, Station};
pub use config::Config;
pub use coordinator::{Coordinator, EventHandler, FeedbackPrompt, RadioEvent};
pub use ids::{GuildId, UserId};
pub use player::{Messenger, Player, Track};
pub use state::{StateStore, TesterPolicy};
