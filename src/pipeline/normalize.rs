//! Pure string transforms applied to map names, mission names, player names,
//! times and dates before anything else sees them.

use chrono::{DateTime, NaiveDate};

use super::types::Difficulty;

/// Abbreviations searched in order after title-casing; the first hit wins.
const DIFFICULTY_TOKENS: &[(&str, Difficulty)] = &[
    ("Int ", Difficulty::Intermediate),
    ("Adv ", Difficulty::Advanced),
    ("Exp ", Difficulty::Expert),
    ("Rev ", Difficulty::Reversed),
    ("Reverse ", Difficulty::Reversed),
];

const MAP_PREFIX: &str = "mvm_";

/// Glyphs that break the dashboard font, replaced by the name the community uses.
const PERSONA_NAME_FIXUPS: &[(&str, &str)] = &[("\u{0E48}", "Googlayz")];

/// Lower-cased word tokens of a mission name, as fed to the embedding trainer.
pub fn tokenize(name: &str) -> impl Iterator<Item = String> + '_ {
    name.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .flat_map(split_possessive)
        .map(str::to_lowercase)
}

/// `giant's` reads as `giant` and `'s`.
fn split_possessive(token: &str) -> impl Iterator<Item = &str> + '_ {
    let cut = token
        .len()
        .checked_sub(2)
        .filter(|&i| i > 0 && token.is_char_boundary(i) && token[i..].eq_ignore_ascii_case("'s"));
    match cut {
        Some(i) => [&token[..i], &token[i..]].into_iter().take(2),
        None => [token, ""].into_iter().take(1),
    }
}

/// Underscores become spaces, then every word is title-cased.
pub fn nice_name(name: &str) -> String {
    title_case(&name.replace('_', " "))
}

/// Upper-cases a letter that follows a non-letter and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}

/// First character upper-cased, the remainder lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Strips the first known difficulty abbreviation out of a display name.
pub fn extract_difficulty(nice: &str) -> (String, Difficulty) {
    for (token, difficulty) in DIFFICULTY_TOKENS {
        if nice.contains(token) {
            return (nice.replace(token, "").trim().to_string(), *difficulty);
        }
    }
    (nice.to_string(), Difficulty::None)
}

/// Display name plus difficulty for a raw mission identifier.
pub fn normalize_mission(raw: &str) -> (String, Difficulty) {
    extract_difficulty(&nice_name(raw))
}

pub fn map_display_name(map: &str) -> String {
    title_case(&map.replace(MAP_PREFIX, "")).replace('_', " ")
}

pub fn display_persona_name(name: &str) -> String {
    PERSONA_NAME_FIXUPS
        .iter()
        .fold(name.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// `H:MM:SS`, prefixed with `N day(s), ` past a full day.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let rem = seconds % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Calendar date (UTC) of a unix timestamp; out-of-range stamps map to the epoch.
pub fn record_date(unix_secs: i64) -> NaiveDate {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}
