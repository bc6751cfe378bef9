//! Announcement titles and the markdown prompt block handed to a writer.

use rand::Rng;

use crate::constants::{
    COMMUNITY_THEME, GAME_MODE, LEADERBOARD_NAME, PERSONAL_BEST_LABEL, RANK_EMOJI,
    SEO_LEAD_KEYWORDS, SEO_TAIL_KEYWORDS, TITLE_PREFIX, WORLD_RECORD_LABEL,
};

use super::normalize::capitalize;
use super::theme::ThemeResolver;
use super::types::{us_date, MissionRecord};

pub fn rank_emoji(rank: u32) -> &'static str {
    let last = RANK_EMOJI[RANK_EMOJI.len() - 1];
    match rank {
        0 => last,
        r => RANK_EMOJI.get(r as usize - 1).copied().unwrap_or(last),
    }
}

pub fn record_label(rank: u32) -> &'static str {
    if rank == 1 {
        WORLD_RECORD_LABEL
    } else {
        PERSONAL_BEST_LABEL
    }
}

pub fn compose_title(record: &MissionRecord, theme_emoji: &str) -> String {
    format!(
        "{theme_emoji} {TITLE_PREFIX} | {LEADERBOARD_NAME}: {} - {} | {} {} | [{}]",
        capitalize(&record.mission),
        record.difficulty,
        rank_emoji(record.rank),
        record_label(record.rank),
        record.time,
    )
}

pub fn seo_keywords(record: &MissionRecord) -> String {
    let status = if record.is_world_record {
        WORLD_RECORD_LABEL
    } else {
        PERSONAL_BEST_LABEL
    };
    SEO_LEAD_KEYWORDS
        .iter()
        .copied()
        .chain([record.map.as_str(), record.mission.as_str()])
        .chain(SEO_TAIL_KEYWORDS.iter().copied())
        .chain([status])
        .collect::<Vec<_>>()
        .join(", ")
}

/// Markdown prompt for one record; `title` must already be composed.
pub fn compose_prompt(record: &MissionRecord) -> String {
    let status = if record.is_world_record {
        WORLD_RECORD_LABEL
    } else {
        PERSONAL_BEST_LABEL
    };
    format!(
        "**Title:** {title}\n\n\
         **Data:**\n\
         - **Game Mode:** {GAME_MODE}\n\
         - **Map:** {map}\n\
         - **Mission:** {mission}\n\
         - **Time:** {time}\n\
         - **Date:** {date}\n\
         - **Difficulty:** {difficulty}\n\
         - **World Record Status:** {status}\n\
         - **Players:** {players}\n\
         - **Total Players:** {total}\n\n\
         - **Dual Theme:** {COMMUNITY_THEME} + {map} & {mission}\n\n\
         - **SEO Keywords:** {keywords}\n\n",
        title = record.title,
        map = record.map,
        mission = record.mission,
        time = record.time,
        date = record.date.format(us_date::FORMAT),
        difficulty = record.difficulty,
        players = record.player_names().join(", "),
        total = record.total_players,
        keywords = seo_keywords(record),
    )
}

/// Fills theme, title and prompt on every record. Emoji are drawn per record,
/// so two rows of the same mission may carry different symbols.
pub fn decorate<R: Rng + ?Sized>(records: &mut [MissionRecord], themes: &ThemeResolver, rng: &mut R) {
    for record in records.iter_mut() {
        record.theme = themes.theme_for(&record.mission).map(|t| t.name.to_string());
        let emoji = themes.emoji_with(&record.mission, rng);
        record.title = compose_title(record, emoji);
        record.ai_prompt = compose_prompt(record);
    }
}
