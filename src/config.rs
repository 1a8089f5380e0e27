use std::env;
use std::path::PathBuf;
use std::time::Duration;

const SNAPSHOT_DIR: &str = "cricket_feed";
const SNAPSHOT_FILE: &str = "rankings_snapshot.json";

/// Read-side TTLs per feed. Live data is short lived, reference data long lived.
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    pub live: Duration,
    pub schedule: Duration,
    pub rankings: Duration,
    pub news: Duration,
    pub player: Duration,
    pub commentary: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            live: Duration::from_secs(300),
            schedule: Duration::from_secs(7_200),
            rankings: Duration::from_secs(21_600),
            news: Duration::from_secs(3_600),
            player: Duration::from_secs(86_400),
            commentary: Duration::from_secs(300),
        }
    }
}

impl TtlPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            live: env_secs("LIVE_TTL_SECS", defaults.live, 10, 3_600),
            schedule: env_secs("SCHEDULE_TTL_SECS", defaults.schedule, 60, 86_400),
            rankings: env_secs("RANKINGS_TTL_SECS", defaults.rankings, 60, 172_800),
            news: env_secs("NEWS_TTL_SECS", defaults.news, 60, 86_400),
            player: env_secs("PLAYER_TTL_SECS", defaults.player, 60, 604_800),
            commentary: env_secs("MATCH_TTL_SECS", defaults.commentary, 10, 3_600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cricket_api_key: Option<String>,
    pub cricket_api_base: String,
    pub news_api_key: Option<String>,
    pub news_api_base: String,
    pub scrape_base: String,
    pub official_timeout: Duration,
    pub scrape_timeout: Duration,
    pub ttl: TtlPolicy,
    pub rankings_delay: Duration,
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let rankings_delay_ms = env::var("RANKINGS_DELAY_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(1_500)
            .clamp(0, 30_000);

        Self {
            cricket_api_key: env_opt("CRICKET_API_KEY"),
            cricket_api_base: env_or("CRICKET_API_BASE", "https://api.cricapi.com/v1"),
            news_api_key: env_opt("NEWS_API_KEY"),
            news_api_base: env_or("NEWS_API_BASE", "https://newsdata.io/api/1"),
            scrape_base: env_or("SCRAPE_BASE", "https://www.cricbuzz.com"),
            official_timeout: env_secs("OFFICIAL_TIMEOUT_SECS", Duration::from_secs(15), 1, 120),
            scrape_timeout: env_secs("SCRAPE_TIMEOUT_SECS", Duration::from_secs(10), 1, 120),
            ttl: TtlPolicy::from_env(),
            rankings_delay: Duration::from_millis(rankings_delay_ms),
            snapshot_path: env_opt("RANKINGS_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .or_else(default_snapshot_path),
        }
    }
}

pub fn default_snapshot_path() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(SNAPSHOT_DIR).join(SNAPSHOT_FILE));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(SNAPSHOT_DIR)
            .join(SNAPSHOT_FILE),
    )
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key)
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn env_secs(key: &str, default: Duration, min: u64, max: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default.as_secs())
        .clamp(min, max);
    Duration::from_secs(secs)
}
