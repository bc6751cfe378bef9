use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Intermediate,
    Advanced,
    Expert,
    Reversed,
    None,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Reversed => "Reversed",
            Self::None => "None",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub steam_id: String,
    pub persona_name: String,
    pub profile_url: String,
    pub avatar_url: String,
    pub world_record: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionRecord {
    pub map: String,
    pub mission: String,
    /// Identifier as reported by the API; only breaks sort ties.
    pub mission_key: String,
    pub difficulty: Difficulty,
    pub time_seconds: u64,
    pub time: String,
    #[serde(with = "us_date")]
    pub date: NaiveDate,
    pub players: Vec<PlayerRef>,
    pub rank: u32,
    pub is_world_record: bool,
    pub total_players: usize,
    pub theme: Option<String>,
    pub title: String,
    pub ai_prompt: String,
}

impl MissionRecord {
    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.persona_name.as_str()).collect()
    }

    pub fn has_player_matching(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.players
            .iter()
            .any(|p| p.persona_name.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub steam_id: String,
    pub persona_name: String,
    pub profile_url: String,
    pub avatar_url: String,
    pub world_records_held: u32,
}

/// Dates travel as `MM/DD/YYYY`, the format the leaderboard community reads.
pub mod us_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%m/%d/%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
