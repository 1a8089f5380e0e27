use std::collections::HashSet;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::error::{FetchError, ParseSkip};
use crate::http_client::{build_client, fetch_text};
use crate::model::{Event, EventStatus, RankingKind, SourceProvider, TeamScore};
use crate::provider::ScrapeProvider;
use crate::rankings::{RankRow, extract_row, select_row_text};

const STATUS_DELIMITER: char = '•';
const DEFAULT_STATUS: &str = "Live/Upcoming";
const ROW_ANCESTOR_DEPTH: usize = 3;
const MAX_COMMENTARY_LINES: usize = 25;

static LIVE_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href*="/live-cricket-scores/"]"#).expect("valid live link selector")
});
static SCORE_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.cb-scr-wll-chvrn").expect("valid score selector"));
static ANY_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));
static COMMENTARY_LINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.cb-com-ln").expect("valid commentary selector"));
static COMMENTARY_LINE_LOOSE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".cb-col.cb-col-100 .cb-com-ln").expect("valid commentary selector")
});

static MATCH_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/live-cricket-scores/(\d+)(?:[/?#]|$)").expect("valid match id regex")
});
static PLAYER_PROFILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/profiles/\d+/").expect("valid profile regex"));
static TEAM_PROFILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/cricket-team/[\w-]+/\d+").expect("valid team regex"));
static INNINGS_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)(?:[/-](\d+))?\s*\(\s*(\d+(?:\.\d+)?)").expect("valid innings regex")
});

pub struct CricbuzzScraper {
    client: Client,
    base: String,
}

impl CricbuzzScraper {
    pub fn new(base: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = build_client(config.scrape_timeout)?;
        Ok(Self::new(config.scrape_base.clone(), client))
    }

    fn page(&self, path: &str) -> Result<String, FetchError> {
        let url = format!("{}{path}", self.base);
        fetch_text(&self.client, &url, &[])
    }
}

impl ScrapeProvider for CricbuzzScraper {
    fn name(&self) -> &str {
        "cricbuzz"
    }

    fn live_events(&self) -> Result<Vec<Event>, FetchError> {
        let html = self.page("/cricket-match/live-scores")?;
        Ok(parse_live_scores_html(&html))
    }

    fn ranking_rows(&self, kind: RankingKind) -> Result<Vec<RankRow>, FetchError> {
        let html = self.page(&format!(
            "/cricket-stats/icc-rankings/men/{}",
            kind.url_slug()
        ))?;
        Ok(parse_ranking_rows_html(&html, kind))
    }

    fn commentary(&self, match_id: &str) -> Result<Vec<String>, FetchError> {
        if match_id.is_empty() || !match_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(FetchError::NotFound(format!("match {match_id}")));
        }
        let html = self.page(&format!("/live-cricket-scores/{match_id}/commentary"))?;
        Ok(parse_commentary_html(&html))
    }
}

/// Extracts one event per distinct match id linked from the live scores page.
pub fn parse_live_scores_html(html: &str) -> Vec<Event> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for link in document.select(&LIVE_LINK) {
        let Some(id) = link.value().attr("href").and_then(match_id) else {
            continue;
        };
        if seen.contains(&id) {
            continue;
        }
        match parse_live_link(link, &id) {
            Ok(event) => {
                seen.insert(id);
                events.push(event);
            }
            Err(skip) => debug!("live scores: match {id}: {skip}"),
        }
    }
    events
}

fn match_id(href: &str) -> Option<String> {
    MATCH_ID
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_live_link(link: ElementRef<'_>, id: &str) -> Result<Event, ParseSkip> {
    let title = Some(flatten_text(link, " "))
        .filter(|t| !t.is_empty())
        .or_else(|| link.value().attr("title").map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .ok_or(ParseSkip("anchor without title"))?;

    let raw = find_score_block(link)
        .map(|block| flatten_text(block, " "))
        .unwrap_or_default();
    let (score_text, status_text) = split_status(&raw);

    let mut event = Event::new(id, title.clone(), SourceProvider::Scraped);
    if let Some((home, away)) = split_teams(&title) {
        event = event.with_teams(home, away);
    }
    event.scores = parse_score_phrase(&score_text, &event.teams);
    event.status = if status_text.is_empty() {
        EventStatus::Live
    } else {
        classify_status(&status_text)
    };
    event.status_text = if status_text.is_empty() {
        DEFAULT_STATUS.to_string()
    } else {
        status_text
    };
    event.score_text = score_text;
    Ok(event)
}

// The score block sits in the anchor's grandparent, or in a block that follows it.
fn find_score_block(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let container = link
        .parent()
        .and_then(|p| p.parent())
        .and_then(ElementRef::wrap)?;
    if let Some(block) = container.select(&SCORE_BLOCK).next() {
        return Some(block);
    }
    container
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find_map(|sibling| {
            if SCORE_BLOCK.matches(&sibling) {
                Some(sibling)
            } else {
                sibling.select(&SCORE_BLOCK).next()
            }
        })
}

/// Splits `"IND 245/6 (45.2) • India won by 5 wkts"` into (score, status).
/// Without the delimiter the whole text is the status.
pub fn split_status(raw: &str) -> (String, String) {
    let raw = raw.trim();
    match raw.rsplit_once(STATUS_DELIMITER) {
        Some((score, status)) => {
            let score = score
                .split(STATUS_DELIMITER)
                .next()
                .unwrap_or_default()
                .trim();
            (score.to_string(), status.trim().to_string())
        }
        None => (String::new(), raw.to_string()),
    }
}

/// Team names from an event title: text before the first comma, split on the
/// first `" vs "` (any case), else `" v "`.
pub fn split_teams(title: &str) -> Option<(String, String)> {
    let clean = title.split(',').next().unwrap_or(title).trim();
    let lower = clean.to_ascii_lowercase();
    for sep in [" vs ", " v "] {
        let Some(idx) = lower.find(sep) else {
            continue;
        };
        let home = clean[..idx].trim();
        let away = clean[idx + sep.len()..].trim();
        if !home.is_empty() && !away.is_empty() {
            return Some((home.to_string(), away.to_string()));
        }
    }
    None
}

/// Best-effort `runs/wickets (overs)` extraction, assigned to teams in order of appearance.
pub fn parse_score_phrase(score: &str, teams: &[String; 2]) -> [TeamScore; 2] {
    let mut out = [
        TeamScore::placeholder(teams[0].clone()),
        TeamScore::placeholder(teams[1].clone()),
    ];
    for (slot, caps) in out.iter_mut().zip(INNINGS_SCORE.captures_iter(score)) {
        if let Some(runs) = caps.get(1) {
            slot.runs = runs.as_str().to_string();
        }
        if let Some(wickets) = caps.get(2) {
            slot.wickets = wickets.as_str().to_string();
        }
        if let Some(overs) = caps.get(3) {
            slot.overs = overs.as_str().to_string();
        }
    }
    out
}

pub fn classify_status(status: &str) -> EventStatus {
    let lower = status.to_lowercase();
    const FINISHED: [&str; 6] = ["won by", "won the match", "drawn", "tied", "abandoned", "no result"];
    const PENDING: [&str; 5] = ["starts", "yet to begin", "preview", "scheduled", "upcoming"];
    if FINISHED.iter().any(|w| lower.contains(w)) {
        EventStatus::Completed
    } else if PENDING.iter().any(|w| lower.contains(w)) {
        EventStatus::Upcoming
    } else {
        EventStatus::Live
    }
}

/// Every subject row on a rankings page, in page order, across all formats.
pub fn parse_ranking_rows_html(html: &str, kind: RankingKind) -> Vec<RankRow> {
    let document = Html::parse_document(html);
    let pattern: &Regex = match kind {
        RankingKind::Team => &TEAM_PROFILE,
        _ => &PLAYER_PROFILE,
    };

    let mut rows = Vec::new();
    for link in document.select(&ANY_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !pattern.is_match(href) {
            continue;
        }
        match parse_ranking_link(link) {
            Ok(row) => rows.push(row),
            Err(skip) => debug!("{kind:?} rankings: {href}: {skip}"),
        }
    }
    rows
}

fn parse_ranking_link(link: ElementRef<'_>) -> Result<RankRow, ParseSkip> {
    let mut parts = link
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let name = parts.next().ok_or(ParseSkip("subject link without name"))?;
    let country = parts.next().unwrap_or_default();

    let ancestors = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(ROW_ANCESTOR_DEPTH)
        .map(|el| flatten_text(el, " "))
        .collect::<Vec<_>>();
    let row_text = select_row_text(&ancestors).ok_or(ParseSkip("no digit-leading row"))?;
    let tokens = extract_row(row_text).ok_or(ParseSkip("row without rank and rating"))?;

    Ok(RankRow {
        position: tokens.position,
        name: name.to_string(),
        country: country.to_string(),
        rating: tokens.rating,
    })
}

pub fn parse_commentary_html(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut lines = collect_lines(&document, &COMMENTARY_LINE);
    if lines.is_empty() {
        lines = collect_lines(&document, &COMMENTARY_LINE_LOOSE);
    }
    lines.truncate(MAX_COMMENTARY_LINES);
    lines
}

fn collect_lines(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|el| flatten_text(el, " "))
        .filter(|line| !line.is_empty())
        .collect()
}

fn flatten_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
