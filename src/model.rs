use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_TEAM: &str = "TBA";
pub const PLACEHOLDER_STAT: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Upcoming,
    Live,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceProvider {
    Official,
    Scraped,
}

/// One side of a scoreline. Values stay strings because upstreams mix in
/// markers such as `-` or `DNB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub title: String,
    pub runs: String,
    pub wickets: String,
    pub overs: String,
}

impl TeamScore {
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            runs: PLACEHOLDER_STAT.to_string(),
            wickets: PLACEHOLDER_STAT.to_string(),
            overs: PLACEHOLDER_STAT.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.runs == PLACEHOLDER_STAT
            && self.wickets == PLACEHOLDER_STAT
            && self.overs == PLACEHOLDER_STAT
    }
}

/// `id` is only unique within `source`. `scores` aligns with `teams` by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub display_name: String,
    pub teams: [String; 2],
    pub scores: [TeamScore; 2],
    pub status: EventStatus,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub match_type: String,
    #[serde(default)]
    pub score_text: String,
    pub venue: String,
    pub date: String,
    pub source: SourceProvider,
    #[serde(default)]
    pub cross_reference_id: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, source: SourceProvider) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            teams: [PLACEHOLDER_TEAM.to_string(), PLACEHOLDER_TEAM.to_string()],
            scores: [
                TeamScore::placeholder(PLACEHOLDER_TEAM),
                TeamScore::placeholder(PLACEHOLDER_TEAM),
            ],
            status: EventStatus::Upcoming,
            status_text: String::new(),
            match_type: String::new(),
            score_text: String::new(),
            venue: String::new(),
            date: String::new(),
            source,
            cross_reference_id: None,
        }
    }

    pub fn with_teams(mut self, home: impl Into<String>, away: impl Into<String>) -> Self {
        self.teams = [home.into(), away.into()];
        for (score, team) in self.scores.iter_mut().zip(self.teams.iter()) {
            score.title = team.clone();
        }
        self
    }

    pub fn is_enriched(&self) -> bool {
        self.cross_reference_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingKind {
    Batting,
    Bowling,
    AllRounder,
    Team,
}

impl RankingKind {
    pub const ALL: [RankingKind; 4] = [
        RankingKind::Batting,
        RankingKind::Bowling,
        RankingKind::AllRounder,
        RankingKind::Team,
    ];

    pub fn display_label(self) -> &'static str {
        match self {
            RankingKind::Batting => "Batsmen",
            RankingKind::Bowling => "Bowlers",
            RankingKind::AllRounder => "All-Rounders",
            RankingKind::Team => "Teams",
        }
    }

    pub fn url_slug(self) -> &'static str {
        match self {
            RankingKind::Batting => "batting",
            RankingKind::Bowling => "bowling",
            RankingKind::AllRounder => "all-rounder",
            RankingKind::Team => "teams",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingFormat {
    #[serde(rename = "TEST")]
    Test,
    #[serde(rename = "ODI")]
    Odi,
    #[serde(rename = "T20")]
    T20,
}

impl RankingFormat {
    pub const ALL: [RankingFormat; 3] = [RankingFormat::Test, RankingFormat::Odi, RankingFormat::T20];

    pub fn label(self) -> &'static str {
        match self {
            RankingFormat::Test => "TEST",
            RankingFormat::Odi => "ODI",
            RankingFormat::T20 => "T20",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub position: u32,
    pub subject_name: String,
    #[serde(default)]
    pub subject_country: String,
    pub rating: u32,
    pub kind: RankingKind,
    pub format: RankingFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingTable {
    pub category: String,
    pub kind: RankingKind,
    pub format: RankingFormat,
    #[serde(default)]
    pub rank: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub timestamp: String,
    pub source: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingStats {
    pub matches: String,
    pub runs: String,
    pub average: String,
    pub strike_rate: String,
    pub highest_score: String,
    pub hundreds: String,
    pub fifties: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingStats {
    pub matches: String,
    pub wickets: String,
    pub economy: String,
    pub best_bowling_innings: String,
}

impl Default for BattingStats {
    fn default() -> Self {
        Self {
            matches: PLACEHOLDER_STAT.to_string(),
            runs: PLACEHOLDER_STAT.to_string(),
            average: PLACEHOLDER_STAT.to_string(),
            strike_rate: PLACEHOLDER_STAT.to_string(),
            highest_score: PLACEHOLDER_STAT.to_string(),
            hundreds: PLACEHOLDER_STAT.to_string(),
            fifties: PLACEHOLDER_STAT.to_string(),
        }
    }
}

impl Default for BowlingStats {
    fn default() -> Self {
        Self {
            matches: PLACEHOLDER_STAT.to_string(),
            wickets: PLACEHOLDER_STAT.to_string(),
            economy: PLACEHOLDER_STAT.to_string(),
            best_bowling_innings: PLACEHOLDER_STAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub country: String,
    pub role: String,
    pub image: String,
    /// Keyed by lowercase match format (`test`, `odi`, `t20i`, ...).
    pub batting_stats: BTreeMap<String, BattingStats>,
    pub bowling_stats: BTreeMap<String, BowlingStats>,
}
