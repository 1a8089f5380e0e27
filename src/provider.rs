use crate::error::FetchError;
use crate::model::{Event, NewsArticle, PlayerProfile, RankingKind};
use crate::rankings::RankRow;

/// The structured JSON upstream.
pub trait OfficialProvider: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Current matches. Implementations fall back to the full match listing
    /// once before reporting an error.
    fn current_matches(&self) -> Result<Vec<Event>, FetchError>;

    fn schedule(&self) -> Result<Vec<Event>, FetchError>;

    /// First profile matching `query`; `FetchError::NotFound` when the search is empty.
    fn player(&self, query: &str) -> Result<PlayerProfile, FetchError>;
}

/// The HTML page upstream.
pub trait ScrapeProvider: Send + Sync {
    fn name(&self) -> &str;

    fn live_events(&self) -> Result<Vec<Event>, FetchError>;

    /// Every ranking row on the page for `kind`, across all formats, in page order.
    fn ranking_rows(&self, kind: RankingKind) -> Result<Vec<RankRow>, FetchError>;

    fn commentary(&self, match_id: &str) -> Result<Vec<String>, FetchError>;
}

pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    fn latest(&self) -> Result<Vec<NewsArticle>, FetchError>;
}
