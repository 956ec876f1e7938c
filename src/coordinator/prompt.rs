use crate::catalog::Station;
use crate::player::Track;
use serde::{Deserialize, Serialize};

/// Custom id the button handler listens for
pub const SEND_FEEDBACK_ID: &str = "tester.send-feedback";
pub const PROMPT_COLOR: u32 = 0xF4554B;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlStyle {
    Success,
}

/// The one button attached to a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptControl {
    pub label: String,
    pub emoji: String,
    pub custom_id: String,
    pub style: ControlStyle,
}

/// DM asking a tester about the station they just listened to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPrompt {
    pub station_id: String,
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub description: String,
    pub color: u32,
    pub control: PromptControl,
}

impl FeedbackPrompt {
    pub fn for_station(station: &Station, track: &Track) -> Self {
        let label = station.label();
        Self {
            station_id: station.id.clone(),
            title: label.clone(),
            url: station.url.clone(),
            image: track.thumbnail.clone(),
            description: format!(
                "Do you want to send your feedback about [{}]({}) ?",
                label, station.url
            ),
            color: PROMPT_COLOR,
            control: PromptControl {
                label: "Send feedback".to_string(),
                emoji: "✅".to_string(),
                custom_id: SEND_FEEDBACK_ID.to_string(),
                style: ControlStyle::Success,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;

    #[test]
    fn test_prompt_content() {
        let station = Station::new("a", "A", "u1", "📻");
        let track = Track::new("u1", UserId::new("user1")).with_thumbnail("thumb.png");

        let prompt = FeedbackPrompt::for_station(&station, &track);
        assert_eq!(prompt.station_id, "a");
        assert_eq!(prompt.title, "📻 A");
        assert_eq!(prompt.image.as_deref(), Some("thumb.png"));
        assert_eq!(prompt.description, "Do you want to send your feedback about [📻 A](u1) ?");
        assert_eq!(prompt.control.custom_id, SEND_FEEDBACK_ID);
        assert_eq!(prompt.control.style, ControlStyle::Success);
    }
}
