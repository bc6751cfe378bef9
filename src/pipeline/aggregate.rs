//! Raw per-map speedruns into ranked mission rows and a deduplicated player table.

use std::collections::{BTreeSet, HashMap};

use crate::services::record_source::{MapBatch, RawSpeedrun};

use super::normalize::{
    display_persona_name, format_duration, map_display_name, normalize_mission, record_date,
};
use super::types::{MissionRecord, PlayerRecord, PlayerRef};

#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub missions: Vec<MissionRecord>,
    pub players: Vec<PlayerRecord>,
}

impl Aggregated {
    /// Unique mission display names, in first-seen order of the sorted rows.
    pub fn mission_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.missions
            .iter()
            .filter(|m| seen.insert(m.mission.to_lowercase()))
            .map(|m| m.mission.clone())
            .collect()
    }
}

pub fn aggregate(batches: &[MapBatch]) -> Aggregated {
    let mut missions: Vec<MissionRecord> = batches
        .iter()
        .flat_map(|batch| {
            let map = map_display_name(&batch.map);
            batch.speedruns.iter().map(move |run| to_record(&map, run))
        })
        .collect();

    assign_dense_ranks(&mut missions);

    missions.sort_by(|a, b| {
        a.mission
            .cmp(&b.mission)
            .then(a.time_seconds.cmp(&b.time_seconds))
            .then_with(|| a.map.cmp(&b.map))
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| a.mission_key.cmp(&b.mission_key))
    });

    let players = roll_up_players(&missions);
    Aggregated { missions, players }
}

fn to_record(map: &str, run: &RawSpeedrun) -> MissionRecord {
    let (mission, difficulty) = normalize_mission(&run.mission);
    let time_seconds = run.time.max(0.0) as u64;
    let players: Vec<PlayerRef> = run
        .players
        .iter()
        .map(|p| PlayerRef {
            steam_id: p.steamid.clone(),
            persona_name: display_persona_name(&p.personaname),
            profile_url: p.profileurl.clone(),
            avatar_url: p.avatarmedium.clone(),
            world_record: false,
        })
        .collect();

    MissionRecord {
        map: map.to_string(),
        mission,
        mission_key: run.mission.clone(),
        difficulty,
        time_seconds,
        time: format_duration(time_seconds),
        date: record_date(run.time_added),
        total_players: players.len(),
        players,
        rank: 0,
        is_world_record: false,
        theme: None,
        title: String::new(),
        ai_prompt: String::new(),
    }
}

/// Dense rank by ascending time within each (map, mission) group, where the
/// mission is the difficulty-stripped name; rank 1 rows become world records
/// and so does every player listed on them.
pub fn assign_dense_ranks(records: &mut [MissionRecord]) {
    let mut groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
        groups
            .entry((r.map.clone(), r.mission.clone()))
            .or_default()
            .push(i);
    }

    for indices in groups.values() {
        let distinct: BTreeSet<u64> = indices.iter().map(|&i| records[i].time_seconds).collect();
        let ranks: HashMap<u64, u32> = distinct
            .into_iter()
            .enumerate()
            .map(|(pos, t)| (t, pos as u32 + 1))
            .collect();
        for &i in indices {
            let record = &mut records[i];
            record.rank = ranks[&record.time_seconds];
            record.is_world_record = record.rank == 1;
            let wr = record.is_world_record;
            record.players.iter_mut().for_each(|p| p.world_record = wr);
        }
    }
}

/// One row per steam id carrying its world-record total; the representative
/// is the first occurrence in mission order. Sorted by total, descending.
pub fn roll_up_players(missions: &[MissionRecord]) -> Vec<PlayerRecord> {
    let mut order: Vec<PlayerRecord> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();

    for record in missions {
        let mut counted = BTreeSet::new();
        for p in &record.players {
            let idx = *slot.entry(p.steam_id.clone()).or_insert_with(|| {
                order.push(PlayerRecord {
                    steam_id: p.steam_id.clone(),
                    persona_name: p.persona_name.clone(),
                    profile_url: p.profile_url.clone(),
                    avatar_url: p.avatar_url.clone(),
                    world_records_held: 0,
                });
                order.len() - 1
            });
            if p.world_record && counted.insert(p.steam_id.as_str()) {
                order[idx].world_records_held += 1;
            }
        }
    }

    order.sort_by(|a, b| {
        b.world_records_held
            .cmp(&a.world_records_held)
            .then_with(|| a.steam_id.cmp(&b.steam_id))
    });
    order
}
