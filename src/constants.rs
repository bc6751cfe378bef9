/// Leading label of every announcement title
pub const TITLE_PREFIX: &str = "TF2 MvM Speedrun";

/// Leaderboard name shown in titles
pub const LEADERBOARD_NAME: &str = "Potato.tf";

pub const GAME_MODE: &str = "TF2 Mann vs. Machine";

/// First half of the prompt's dual theme, paired with map and mission
pub const COMMUNITY_THEME: &str = "Mushroom Hunting";

pub const WORLD_RECORD_LABEL: &str = "World Record";
pub const PERSONAL_BEST_LABEL: &str = "Personal Best";

/// Fixed SEO keywords; map, mission and record label are spliced in around them.
pub const SEO_LEAD_KEYWORDS: &[&str] = &["TF2 MvM", "speedrun"];
pub const SEO_TAIL_KEYWORDS: &[&str] = &[
    "teamwork",
    "gaming excellence",
    "cooperative gaming",
    "gaming strategies",
    "gaming challenges",
    "gaming tips and tricks",
    "achievement unlocked",
    "competitive gaming",
    "esports",
    "speed running",
];

/// Rank emoji for places 1-5; anything lower uses the last entry.
pub const RANK_EMOJI: &[&str] = &["🏆", "🥈", "🥉", "🎖️", "🎉"];

/// Shown when the record source lists no maps at all
pub const NO_MAPS_NOTICE: &str = "No map names were found.";

/// Allowed page sizes for the top-players table
pub const TOP_PLAYER_COUNTS: &[usize] = &[10, 20, 50];
pub const DEFAULT_TOP_PLAYERS: usize = 10;

pub const DEFAULT_PROFILE_BACKGROUND: &str =
    "https://community.cloudflare.steamstatic.com/public/images/profile/2020/bg_dots.png";
