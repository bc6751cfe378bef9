//! Immutable leaderboard snapshot and the read-only queries served over HTTP.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::types::us_date;
use crate::pipeline::{ClusterSummary, MissionRecord, PlayerRecord};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub maps_requested: usize,
    pub maps_loaded: usize,
    /// One entry per map that failed after retries.
    pub warnings: Vec<String>,
    /// User-facing notice when there is nothing to show.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub missions: Vec<MissionRecord>,
    pub players: Vec<PlayerRecord>,
    pub clusters: Vec<ClusterSummary>,
    pub report: LoadReport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    #[default]
    All,
    WorldRecord,
    PersonalBest,
}

impl RecordType {
    pub fn accepts(self, record: &MissionRecord) -> bool {
        match self {
            Self::All => true,
            Self::WorldRecord => record.is_world_record,
            Self::PersonalBest => !record.is_world_record,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSearch {
    #[serde(with = "us_date")]
    pub requested: NaiveDate,
    pub matched_date: Option<String>,
    pub exact: bool,
    pub notice: Option<String>,
    pub records: Vec<MissionRecord>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Missions with at least one player whose name contains `needle`,
    /// ignoring case. A blank needle keeps everything.
    pub fn filter_by_player(&self, needle: &str) -> Vec<&MissionRecord> {
        let needle = needle.trim();
        self.missions
            .iter()
            .filter(|m| needle.is_empty() || m.has_player_matching(needle))
            .collect()
    }

    pub fn filter_players(&self, needle: &str) -> Vec<&PlayerRecord> {
        let needle = needle.trim().to_lowercase();
        self.players
            .iter()
            .filter(|p| needle.is_empty() || p.persona_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Records on `date`, or on the closest date that has any; equally close
    /// dates resolve to the earlier one.
    pub fn search_by_date(&self, date: NaiveDate, record_type: RecordType, player: &str) -> DateSearch {
        let candidates: Vec<&MissionRecord> = self
            .filter_by_player(player)
            .into_iter()
            .filter(|m| record_type.accepts(m))
            .collect();

        let nearest = candidates
            .iter()
            .map(|m| m.date)
            .min_by_key(|d| (d.signed_duration_since(date).num_days().abs(), *d));

        let Some(matched) = nearest else {
            return DateSearch {
                requested: date,
                matched_date: None,
                exact: false,
                notice: Some(format!("No data found for {}.", date.format(us_date::FORMAT))),
                records: Vec::new(),
            };
        };

        let exact = matched == date;
        let notice = (!exact).then(|| {
            format!(
                "No data found for {}. Showing results for the nearest date: {}",
                date.format(us_date::FORMAT),
                matched.format(us_date::FORMAT)
            )
        });

        DateSearch {
            requested: date,
            matched_date: Some(matched.format(us_date::FORMAT).to_string()),
            exact,
            notice,
            records: candidates
                .into_iter()
                .filter(|m| m.date == matched)
                .cloned()
                .collect(),
        }
    }

    /// The `n` players holding the most world records, with avatars swapped
    /// to the full-size variant.
    pub fn top_players(&self, n: usize) -> Vec<PlayerRecord> {
        let mut ranked: Vec<&PlayerRecord> = self.players.iter().collect();
        ranked.sort_by(|a, b| {
            b.world_records_held
                .cmp(&a.world_records_held)
                .then_with(|| a.steam_id.cmp(&b.steam_id))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|p| PlayerRecord {
                avatar_url: p.avatar_url.replace("_medium", "_full"),
                ..p.clone()
            })
            .collect()
    }
}
