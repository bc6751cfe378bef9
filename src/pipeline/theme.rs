//! Curated cluster themes and the per-mission emoji draw.

use rand::seq::SliceRandom;
use rand::Rng;

use super::cluster::ClusterAssignment;

pub const FALLBACK_EMOJI: &str = "❓";

#[derive(Debug, PartialEq, Eq)]
pub struct ClusterTheme {
    pub name: &'static str,
    pub emoji: &'static [&'static str],
}

pub static CLUSTER_THEMES: [ClusterTheme; 30] = [
    ClusterTheme {
        name: "Timekeepers",
        emoji: &["⏳", "🕰️", "🌟", "🚀", "🌈", "☣️", "🧚", "🏝️", "🎲", "🌌"],
    },
    ClusterTheme {
        name: "Toxic Wastelands",
        emoji: &["💀", "🔍", "🌊", "🌫️", "❓", "🌅", "🌒", "💧", "🎲", "🌠"],
    },
    ClusterTheme {
        name: "Enchanted Enigmas",
        emoji: &["🔮", "🌅", "🌌", "🌠", "🌪️", "🔍", "📜", "🌟", "🍄", "⚙️"],
    },
    ClusterTheme {
        name: "Coastal Treasures",
        emoji: &["🏖️", "🍀", "🌀", "🕯️", "🏔️", "🔭", "🎶", "🌲", "⚙️", "🧨"],
    },
    ClusterTheme {
        name: "Lucky Foragers",
        emoji: &["🍀", "🌀", "🌊", "🌅", "⚡", "🔮", "🏝️", "🌫️", "💧", "🎲"],
    },
    ClusterTheme {
        name: "Twilight Voyages",
        emoji: &["🌌", "⚡", "🌅", "🏝️", "🔮", "📜", "🌪️", "🌊", "🎲", "🧨"],
    },
    ClusterTheme {
        name: "Whirling Winds",
        emoji: &["🌪️", "🌬️", "🔮", "🍀", "🎲", "🏖️", "🌠", "⚙️", "🧨", "🌒"],
    },
    ClusterTheme {
        name: "Eclipse Enigmas",
        emoji: &["🌑", "🌒", "🏔️", "🔍", "🌪️", "🌌", "🕯️", "💀", "💧", "⚙️"],
    },
    ClusterTheme {
        name: "Lakeside Serenity",
        emoji: &["💧", "🏝️", "🌌", "🌀", "🌈", "🔮", "🌅", "🌲", "📜", "💀"],
    },
    ClusterTheme {
        name: "Cosmic Insights",
        emoji: &["🔭", "🌌", "💀", "🌅", "🌪️", "🌊", "🌀", "🍄", "🏖️", "🧚"],
    },
    ClusterTheme {
        name: "Volcanic Vengeance",
        emoji: &["🌋", "💥", "🔥", "🌅", "🚀", "🪐", "🌪️", "💀", "🔍", "🌌"],
    },
    ClusterTheme {
        name: "Mystical Midnight",
        emoji: &["🌌", "🌟", "🚀", "🌠", "🌈", "🌍", "🌒", "💧", "🏝️", "🔥"],
    },
    ClusterTheme {
        name: "Jungle Journeys",
        emoji: &["🌿", "🌲", "🌊", "🌌", "🍄", "🏔️", "🔭", "🌅", "🌪️", "🔮"],
    },
    ClusterTheme {
        name: "Secret Societies",
        emoji: &["🕯️", "🌌", "💧", "🌅", "🌪️", "🔍", "📜", "🌟", "🍄", "⚙️"],
    },
    ClusterTheme {
        name: "Mechanical Marvels",
        emoji: &["🦾", "🔍", "📜", "🌌", "🌲", "🌳", "🌿", "🏝️", "🌋", "🌌"],
    },
    ClusterTheme {
        name: "Floral Whispers",
        emoji: &["🌸", "🌺", "🍃", "🌿", "🦉", "🐦", "🌸", "🌺", "🍂", "🌰"],
    },
    ClusterTheme {
        name: "Whirlwind Adventures",
        emoji: &["🌪️", "🌊", "🍃", "🌿", "🦉", "🐦", "🌸", "🌺", "🍂", "🌰"],
    },
    ClusterTheme {
        name: "Electric Sparks",
        emoji: &["⚡", "🔌", "💥", "⚙️", "🔋", "🪓", "🌩", "🧨", "🚡", "🌪️"],
    },
    ClusterTheme {
        name: "Gears of Time",
        emoji: &["⏳", "⏰", "🔒", "🌅", "📡", "🧭", "🔬", "🌡️", "📚", "📜"],
    },
    ClusterTheme {
        name: "Foggy Cliffhangers",
        emoji: &["🌫️", "🏞️", "🌫️", "🌁", "🏔️", "❄️", "🌨️", "⛅", "🌦️", "🌄"],
    },
    ClusterTheme {
        name: "Solitary Path",
        emoji: &["🚶‍♂️", "🚶", "🌄", "🌅", "🚶‍♀️", "🏞️", "🌲", "🌳", "🌲", "🌳"],
    },
    ClusterTheme {
        name: "Starry Expeditions",
        emoji: &["✨", "🚀", "🌠", "🌟", "🌍", "🌔", "🌓", "🌒", "🌑", "🌌"],
    },
    ClusterTheme {
        name: "Inferno Forge",
        emoji: &["🔥", "🛠️", "🔥", "🌋", "🌌", "🔥", "🪓", "⚔️", "🚀", "🌌"],
    },
    ClusterTheme {
        name: "Snowy Peaks",
        emoji: &["🏔️", "❄️", "🌨️", "🏂", "🏔️", "🏔️", "❄️", "🌨️", "🏂", "🌬️"],
    },
    ClusterTheme {
        name: "Wasteland Echoes",
        emoji: &["☣️", "🔥", "💣", "🔥", "🌋", "🌌", "💀", "🚀", "🌌"],
    },
    ClusterTheme {
        name: "Bioluminescent Wonders",
        emoji: &["🌟", "🌌", "🌿", "🪐", "🌲", "🌳", "🌸", "🌼", "🌻"],
    },
    ClusterTheme {
        name: "Clockwork Marvels",
        emoji: &["⚙️", "🔩", "🕰️", "📡", "🧭", "🔬", "🌡️", "📚", "📜"],
    },
    ClusterTheme {
        name: "Eclipse Mysteries",
        emoji: &["🌘", "🌒", "🌘", "🌚", "🌌", "🌓", "🌑", "🌘", "🌒", "🌌"],
    },
    ClusterTheme {
        name: "Arcane Contraptions",
        emoji: &["🔮", "🛠️", "📦", "⚗️", "🧪", "📚", "🔍", "🌪️", "💀"],
    },
    ClusterTheme {
        name: "Candlelit Secrets",
        emoji: &["🕯️", "🌌", "🔍", "📦", "🔮", "📜", "📖", "🗝️", "🕰️", "📦"],
    },
];

/// Theme for a cluster id, indexed directly (cluster 0 is "Timekeepers").
pub fn theme(cluster_id: usize) -> Option<&'static ClusterTheme> {
    CLUSTER_THEMES.get(cluster_id)
}

#[derive(Debug, Clone)]
pub struct ThemeResolver {
    assignment: ClusterAssignment,
}

impl ThemeResolver {
    pub fn new(assignment: ClusterAssignment) -> Self {
        Self { assignment }
    }

    pub fn assignment(&self) -> &ClusterAssignment {
        &self.assignment
    }

    pub fn theme_for(&self, mission: &str) -> Option<&'static ClusterTheme> {
        self.assignment.cluster_of(mission).and_then(theme)
    }

    /// One emoji drawn uniformly from the mission's cluster theme, or
    /// [`FALLBACK_EMOJI`] for a mission this run never clustered.
    pub fn emoji_with<R: Rng + ?Sized>(&self, mission: &str, rng: &mut R) -> &'static str {
        self.theme_for(mission)
            .and_then(|t| t.emoji.choose(rng))
            .copied()
            .unwrap_or(FALLBACK_EMOJI)
    }

    pub fn emoji(&self, mission: &str) -> &'static str {
        self.emoji_with(mission, &mut rand::thread_rng())
    }
}
