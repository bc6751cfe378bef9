use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use speedrun_herald::services::record_source::{RawPlayer, RawSpeedrun, RecordSource, SourceError};

/// 2024-03-01 12:00 UTC
pub const MARCH_1: i64 = 1_709_294_400;
pub const DAY: i64 = 86_400;

/// In-memory record source; maps listed in `failing` answer 503.
#[derive(Default)]
pub struct FixtureSource {
    pub maps: Vec<String>,
    pub runs: HashMap<String, Vec<RawSpeedrun>>,
    pub failing: HashSet<String>,
}

#[async_trait]
impl RecordSource for FixtureSource {
    async fn map_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.maps.clone())
    }

    async fn speedruns(&self, map: &str) -> Result<Vec<RawSpeedrun>, SourceError> {
        if self.failing.contains(map) {
            return Err(SourceError::Status {
                url: format!("fixture/api/speedrun?map={map}"),
                status: 503,
            });
        }
        Ok(self.runs.get(map).cloned().unwrap_or_default())
    }

    async fn mission_info(&self, map: &str) -> Result<Vec<serde_json::Value>, SourceError> {
        Ok(vec![serde_json::json!({ "map": map })])
    }
}

pub fn player(id: &str, name: &str) -> RawPlayer {
    RawPlayer {
        steamid: id.to_string(),
        personaname: name.to_string(),
        profileurl: String::new(),
        avatarmedium: format!("https://avatars.example/{id}_medium.jpg"),
    }
}

pub fn run(mission: &str, time: f64, added: i64, players: Vec<RawPlayer>) -> RawSpeedrun {
    RawSpeedrun {
        map: String::new(),
        mission: mission.to_string(),
        time,
        time_added: added,
        players,
    }
}

/// Two loaded maps, one map that fails and one with no runs.
///
/// Steam ids: 1 Shroomer, 2 (glyph name shown as Googlayz), 3 Sporeling, 4 Truffle.
pub fn sample_source() -> FixtureSource {
    let mut runs = HashMap::new();
    runs.insert(
        "mvm_mechengine".to_string(),
        vec![
            run("mechanical_magic", 1285.0, MARCH_1 + 9 * DAY, vec![player("1", "Shroomer")]),
            run("mechanical_magic", 1285.0, MARCH_1 + 9 * DAY, vec![player("2", "\u{0E48}")]),
            run("mechanical_magic", 1500.0, MARCH_1, vec![player("3", "Sporeling")]),
        ],
    );
    runs.insert(
        "mvm_decoy".to_string(),
        vec![
            run(
                "adv_wave_666",
                300.0,
                MARCH_1,
                vec![player("1", "Shroomer"), player("3", "Sporeling")],
            ),
            run("adv_wave_666", 450.0, MARCH_1 + 4 * DAY, vec![player("4", "Truffle")]),
            run("int_oil_spill", 200.0, MARCH_1 + 4 * DAY, vec![player("3", "Sporeling")]),
        ],
    );

    FixtureSource {
        maps: ["mvm_mechengine", "mvm_decoy", "mvm_broken", "mvm_empty"]
            .iter()
            .map(|m| m.to_string())
            .collect(),
        runs,
        failing: ["mvm_broken".to_string()].into_iter().collect(),
    }
}

/// Single-map source whose only player links to `profile_url`.
pub fn source_with_profile(profile_url: &str) -> FixtureSource {
    let mut shroomer = player("1", "Shroomer");
    shroomer.profileurl = profile_url.to_string();

    let mut runs = HashMap::new();
    runs.insert(
        "mvm_decoy".to_string(),
        vec![run("adv_wave_666", 300.0, MARCH_1, vec![shroomer])],
    );
    FixtureSource {
        maps: vec!["mvm_decoy".to_string()],
        runs,
        failing: HashSet::new(),
    }
}
