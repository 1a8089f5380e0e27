use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::{Config, TtlPolicy};
use crate::error::FetchError;
use crate::merge::merge_events;
use crate::model::{Event, NewsArticle, PlayerProfile, RankingKind, RankingTable};
use crate::news_fetch::NewsDataClient;
use crate::official_fetch::CricApiClient;
use crate::provider::{NewsProvider, OfficialProvider, ScrapeProvider};
use crate::rankings::collect_rankings;
use crate::scrape_fetch::CricbuzzScraper;
use crate::snapshot::RankingSnapshot;
use crate::ttl_cache::{CacheStats, TtlCache};

pub const LIVE_KEY: &str = "live";
pub const SCHEDULE_KEY: &str = "schedule";
pub const RANKINGS_KEY: &str = "rankings";
pub const NEWS_KEY: &str = "news";

#[derive(Debug, Clone)]
pub enum Payload {
    Events(Vec<Event>),
    Rankings(Vec<RankingTable>),
    News(Vec<NewsArticle>),
    Player(PlayerProfile),
    Commentary(Vec<String>),
}

pub type FeedCache = TtlCache<Payload>;

enum Refresh<T> {
    Store(T),
    Skip(T),
}

pub struct Providers {
    pub official: Box<dyn OfficialProvider>,
    pub scrape: Box<dyn ScrapeProvider>,
    pub news: Box<dyn NewsProvider>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            official: Box::new(CricApiClient::from_config(config)?),
            scrape: Box::new(CricbuzzScraper::from_config(config)?),
            news: Box::new(NewsDataClient::from_config(config)?),
        })
    }
}

/// Cache-backed entry point for every feed. Misses refill on the calling
/// thread; adapter errors degrade to empty or absent results.
pub struct Aggregator {
    cache: Arc<FeedCache>,
    providers: Providers,
    snapshot: RankingSnapshot,
    ttl: TtlPolicy,
    rankings_delay: Duration,
}

impl Aggregator {
    pub fn new(
        cache: Arc<FeedCache>,
        providers: Providers,
        snapshot: RankingSnapshot,
        ttl: TtlPolicy,
        rankings_delay: Duration,
    ) -> Self {
        Self {
            cache,
            providers,
            snapshot,
            ttl,
            rankings_delay,
        }
    }

    pub fn from_config(config: &Config, cache: Arc<FeedCache>) -> Result<Self, FetchError> {
        let providers = Providers::from_config(config)?;
        let snapshot = config
            .snapshot_path
            .as_deref()
            .map(RankingSnapshot::load)
            .unwrap_or_default();
        info!("rankings snapshot holds {} tables", snapshot.len());
        Ok(Self::new(
            cache,
            providers,
            snapshot,
            config.ttl,
            config.rankings_delay,
        ))
    }

    pub fn live(&self) -> Vec<Event> {
        self.through_cache(
            LIVE_KEY,
            self.ttl.live,
            |payload| match payload {
                Payload::Events(events) => Some(events),
                _ => None,
            },
            Payload::Events,
            || {
                let (official, scraped) = rayon::join(
                    || self.providers.official.current_matches(),
                    || self.providers.scrape.live_events(),
                );
                let both_failed = official.is_err() && scraped.is_err();
                let official = self.degrade("live", self.providers.official.name(), official);
                let scraped = self.degrade("live", self.providers.scrape.name(), scraped);
                let feed = merge_events(official, scraped);
                if both_failed {
                    Refresh::Skip(feed)
                } else {
                    Refresh::Store(feed)
                }
            },
        )
    }

    pub fn schedule(&self) -> Vec<Event> {
        self.through_cache(
            SCHEDULE_KEY,
            self.ttl.schedule,
            |payload| match payload {
                Payload::Events(events) => Some(events),
                _ => None,
            },
            Payload::Events,
            || match self.providers.official.schedule() {
                Ok(events) => Refresh::Store(events),
                Err(err) => {
                    self.log_degraded("schedule", self.providers.official.name(), &err);
                    Refresh::Skip(Vec::new())
                }
            },
        )
    }

    pub fn rankings(&self) -> Vec<RankingTable> {
        self.through_cache(
            RANKINGS_KEY,
            self.ttl.rankings,
            |payload| match payload {
                Payload::Rankings(tables) => Some(tables),
                _ => None,
            },
            Payload::Rankings,
            || {
                let outcome = collect_rankings(
                    self.providers.scrape.as_ref(),
                    &self.snapshot,
                    &RankingKind::ALL,
                    self.rankings_delay,
                );
                // Tables served only from the snapshot are never cached.
                let every_page_failed = outcome.failed_kinds.len() == RankingKind::ALL.len();
                if outcome.has_data() && !every_page_failed {
                    Refresh::Store(outcome.tables)
                } else {
                    Refresh::Skip(outcome.tables)
                }
            },
        )
    }

    pub fn news(&self) -> Vec<NewsArticle> {
        self.through_cache(
            NEWS_KEY,
            self.ttl.news,
            |payload| match payload {
                Payload::News(articles) => Some(articles),
                _ => None,
            },
            Payload::News,
            || match self.providers.news.latest() {
                Ok(articles) => Refresh::Store(articles),
                Err(err) => {
                    self.log_degraded("news", self.providers.news.name(), &err);
                    Refresh::Skip(Vec::new())
                }
            },
        )
    }

    /// `None` when no player matches `name` or the lookup failed. Misses are not cached.
    pub fn player(&self, name: &str) -> Option<PlayerProfile> {
        let query = name.trim();
        if query.is_empty() {
            return None;
        }
        let key = player_key(query);
        if let Some(Payload::Player(profile)) = self.cache.get(&key, self.ttl.player) {
            debug!("cache hit: {key}");
            return Some(profile);
        }
        debug!("cache miss: {key}");

        match self.providers.official.player(query) {
            Ok(profile) => {
                self.cache.set(key, Payload::Player(profile.clone()));
                Some(profile)
            }
            Err(FetchError::NotFound(what)) => {
                info!("player lookup: {what} not found");
                None
            }
            Err(err) => {
                self.log_degraded("player", self.providers.official.name(), &err);
                None
            }
        }
    }

    pub fn commentary(&self, match_id: &str) -> Vec<String> {
        let match_id = match_id.trim();
        self.through_cache(
            &format!("commentary:{match_id}"),
            self.ttl.commentary,
            |payload| match payload {
                Payload::Commentary(lines) => Some(lines),
                _ => None,
            },
            Payload::Commentary,
            || match self.providers.scrape.commentary(match_id) {
                Ok(lines) => Refresh::Store(lines),
                Err(err) => {
                    self.log_degraded("commentary", self.providers.scrape.name(), &err);
                    Refresh::Skip(Vec::new())
                }
            },
        )
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("feed cache cleared");
    }

    fn through_cache<T>(
        &self,
        key: &str,
        ttl: Duration,
        read: impl Fn(Payload) -> Option<T>,
        wrap: impl Fn(T) -> Payload,
        refresh: impl FnOnce() -> Refresh<T>,
    ) -> T
    where
        T: Clone,
    {
        if let Some(value) = self.cache.get(key, ttl).and_then(read) {
            debug!("cache hit: {key}");
            return value;
        }
        debug!("cache miss: {key}");
        match refresh() {
            Refresh::Store(value) => {
                self.cache.set(key, wrap(value.clone()));
                value
            }
            Refresh::Skip(value) => value,
        }
    }

    fn degrade<T: Default>(&self, feed: &str, provider: &str, result: Result<T, FetchError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.log_degraded(feed, provider, &err);
                T::default()
            }
        }
    }

    fn log_degraded(&self, feed: &str, provider: &str, err: &FetchError) {
        warn!("{feed}: {provider} unavailable, serving without it: {err}");
    }
}

pub fn player_key(name: &str) -> String {
    format!("player:{}", name.trim().to_lowercase().replace(' ', "_"))
}
