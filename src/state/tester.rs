use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When an opted-in tester wants to be asked for feedback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TesterPolicy {
    Everytime,
    #[default]
    Songend,
}

impl TesterPolicy {
    /// Whether a finished track can trigger a prompt under this policy.
    ///
    /// Both policies fire and both respect the per-station dedup today.
    /// It is still open whether `Everytime` was meant to skip the dedup and
    /// prompt on every finish; until that's settled they behave the same.
    pub fn fires_on_track_end(self) -> bool {
        match self {
            TesterPolicy::Everytime | TesterPolicy::Songend => true,
        }
    }
}

impl fmt::Display for TesterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TesterPolicy::Everytime => f.write_str("everytime"),
            TesterPolicy::Songend => f.write_str("songend"),
        }
    }
}

impl FromStr for TesterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "everytime" => Ok(TesterPolicy::Everytime),
            "songend" => Ok(TesterPolicy::Songend),
            other => Err(format!("unknown tester policy: {}", other)),
        }
    }
}

/// What we know about a tester: just the timing they picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TesterPreference {
    pub when: TesterPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_policies_fire() {
        assert!(TesterPolicy::Everytime.fires_on_track_end());
        assert!(TesterPolicy::Songend.fires_on_track_end());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("songend".parse::<TesterPolicy>(), Ok(TesterPolicy::Songend));
        assert_eq!("EveryTime".parse::<TesterPolicy>(), Ok(TesterPolicy::Everytime));
        assert!("sometimes".parse::<TesterPolicy>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TesterPreference { when: TesterPolicy::Everytime }).unwrap();
        assert_eq!(json, r#"{"when":"everytime"}"#);
    }
}
