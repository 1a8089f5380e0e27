use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::model::{RankingEntry, RankingFormat, RankingKind, RankingTable};
use crate::provider::ScrapeProvider;
use crate::snapshot::RankingSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRow {
    pub position: u32,
    pub name: String,
    pub country: String,
    pub rating: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTokens {
    pub position: u32,
    pub rating: u32,
}

// "1 Joe Root England 895": first token is the rank, last the rating.
pub fn extract_row(text: &str) -> Option<RowTokens> {
    let tokens = text.split_whitespace().collect::<Vec<_>>();
    if tokens.len() < 3 {
        return None;
    }
    let position = tokens[0].parse::<u32>().ok()?;
    let rating = tokens[tokens.len() - 1].parse::<u32>().ok()?;
    Some(RowTokens { position, rating })
}

/// Nearest digit-leading ancestor text ending in 3+ digits, else the outermost digit-leading one.
pub fn select_row_text<S: AsRef<str>>(ancestors: &[S]) -> Option<&str> {
    let mut candidate = None;
    for text in ancestors {
        let text = text.as_ref().trim();
        if !text.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        candidate = Some(text);
        if ends_with_rating(text) {
            break;
        }
    }
    candidate
}

fn ends_with_rating(text: &str) -> bool {
    text.chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .count()
        >= 3
}

// Test, ODI and T20 blocks are assumed equal and in that order; T20 takes the remainder.
pub fn partition(rows: &[RankRow], format: RankingFormat) -> &[RankRow] {
    let section = rows.len() / 3;
    match format {
        RankingFormat::Test => &rows[..section],
        RankingFormat::Odi => &rows[section..section * 2],
        RankingFormat::T20 => &rows[section * 2..],
    }
}

pub fn to_entries(rows: &[RankRow], kind: RankingKind, format: RankingFormat) -> Vec<RankingEntry> {
    rows.iter()
        .map(|row| RankingEntry {
            position: row.position,
            subject_name: row.name.clone(),
            subject_country: row.country.clone(),
            rating: row.rating,
            kind,
            format,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RankingsOutcome {
    pub tables: Vec<RankingTable>,
    pub failed_kinds: Vec<RankingKind>,
}

impl RankingsOutcome {
    pub fn has_data(&self) -> bool {
        self.tables.iter().any(|t| !t.rank.is_empty())
    }
}

/// One table per (kind, format); empty tables fall back to the snapshot.
pub fn collect_rankings(
    scrape: &dyn ScrapeProvider,
    snapshot: &RankingSnapshot,
    kinds: &[RankingKind],
    delay: Duration,
) -> RankingsOutcome {
    let mut tables = Vec::with_capacity(kinds.len() * RankingFormat::ALL.len());
    let mut failed_kinds = Vec::new();

    for (idx, kind) in kinds.iter().copied().enumerate() {
        if idx > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }

        let rows = match scrape.ranking_rows(kind) {
            Ok(rows) => rows,
            Err(err) => {
                warn!("{} rankings page for {:?} failed: {err}", scrape.name(), kind);
                failed_kinds.push(kind);
                Vec::new()
            }
        };
        debug!("{:?} rankings: {} rows extracted", kind, rows.len());

        for format in RankingFormat::ALL {
            let category = kind.display_label();
            let mut rank = to_entries(partition(&rows, format), kind, format);
            if rank.is_empty()
                && let Some(saved) = snapshot.lookup(category, format.label())
            {
                info!("{category} {} served from snapshot", format.label());
                rank = saved.to_vec();
            }
            tables.push(RankingTable {
                category: category.to_string(),
                kind,
                format,
                rank,
            });
        }
    }

    RankingsOutcome {
        tables,
        failed_kinds,
    }
}
