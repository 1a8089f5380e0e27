use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use cricket_feed::error::FetchError;
use cricket_feed::model::{
    Event, RankingEntry, RankingFormat, RankingKind, RankingTable,
};
use cricket_feed::provider::ScrapeProvider;
use cricket_feed::rankings::{RankRow, collect_rankings};
use cricket_feed::snapshot::{RankingSnapshot, save_snapshot};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn rows(n: u32) -> Vec<RankRow> {
    (1..=n)
        .map(|i| RankRow {
            position: i,
            name: format!("Player {i}"),
            country: "Country".to_string(),
            rating: 900 - i,
        })
        .collect()
}

/// Serves canned rows per kind; kinds without an entry fail like an unreachable page.
struct CannedPages {
    pages: HashMap<RankingKind, Vec<RankRow>>,
}

impl ScrapeProvider for CannedPages {
    fn name(&self) -> &str {
        "canned"
    }

    fn live_events(&self) -> Result<Vec<Event>, FetchError> {
        Ok(Vec::new())
    }

    fn ranking_rows(&self, kind: RankingKind) -> Result<Vec<RankRow>, FetchError> {
        self.pages
            .get(&kind)
            .cloned()
            .ok_or_else(|| FetchError::Transport("connection refused".to_string()))
    }

    fn commentary(&self, _match_id: &str) -> Result<Vec<String>, FetchError> {
        Ok(Vec::new())
    }
}

fn table<'a>(tables: &'a [RankingTable], category: &str, format: RankingFormat) -> &'a RankingTable {
    tables
        .iter()
        .find(|t| t.category == category && t.format == format)
        .expect("table should be present")
}

#[test]
fn thirty_rows_fill_three_formats_in_page_order() {
    let pages = CannedPages {
        pages: HashMap::from([(RankingKind::Batting, rows(30))]),
    };
    let outcome = collect_rankings(
        &pages,
        &RankingSnapshot::empty(),
        &[RankingKind::Batting],
        Duration::ZERO,
    );
    assert_eq!(outcome.tables.len(), 3);
    assert!(outcome.failed_kinds.is_empty());

    let test = table(&outcome.tables, "Batsmen", RankingFormat::Test);
    let odi = table(&outcome.tables, "Batsmen", RankingFormat::Odi);
    let t20 = table(&outcome.tables, "Batsmen", RankingFormat::T20);
    assert_eq!(test.rank.len(), 10);
    assert_eq!(odi.rank.len(), 10);
    assert_eq!(t20.rank.len(), 10);
    assert_eq!(test.rank[0].subject_name, "Player 1");
    assert_eq!(odi.rank[0].subject_name, "Player 11");
    assert_eq!(t20.rank[9].subject_name, "Player 30");
    assert!(odi.rank.iter().all(|e| e.format == RankingFormat::Odi));
    assert!(odi.rank.iter().all(|e| e.kind == RankingKind::Batting));
}

#[test]
fn every_category_and_format_is_present_even_without_data() {
    let pages = CannedPages {
        pages: HashMap::new(),
    };
    let outcome = collect_rankings(
        &pages,
        &RankingSnapshot::empty(),
        &RankingKind::ALL,
        Duration::ZERO,
    );
    assert_eq!(outcome.tables.len(), 12);
    assert!(outcome.tables.iter().all(|t| t.rank.is_empty()));
    assert_eq!(outcome.failed_kinds.len(), 4);
    assert!(!outcome.has_data());

    let labels = outcome
        .tables
        .iter()
        .map(|t| t.category.as_str())
        .collect::<Vec<_>>();
    assert!(labels.contains(&"Batsmen"));
    assert!(labels.contains(&"Bowlers"));
    assert!(labels.contains(&"All-Rounders"));
    assert!(labels.contains(&"Teams"));
}

#[test]
fn zero_rows_give_empty_tables_not_errors() {
    let pages = CannedPages {
        pages: HashMap::from([(RankingKind::Team, Vec::new())]),
    };
    let outcome = collect_rankings(
        &pages,
        &RankingSnapshot::empty(),
        &[RankingKind::Team],
        Duration::ZERO,
    );
    assert_eq!(outcome.tables.len(), 3);
    assert!(outcome.failed_kinds.is_empty());
    assert!(outcome.tables.iter().all(|t| t.rank.is_empty()));
}

#[test]
fn empty_table_falls_back_to_snapshot() {
    let snapshot = RankingSnapshot::load(&fixture_path("rankings_snapshot.json"));
    assert_eq!(snapshot.len(), 1);

    let pages = CannedPages {
        pages: HashMap::new(),
    };
    let outcome = collect_rankings(&pages, &snapshot, &[RankingKind::Bowling], Duration::ZERO);

    let test = table(&outcome.tables, "Bowlers", RankingFormat::Test);
    assert_eq!(test.rank.len(), 2);
    assert_eq!(test.rank[0].subject_name, "Jasprit Bumrah");
    assert_eq!(test.rank[0].rating, 883);

    // An empty snapshot entry counts as a miss.
    assert!(table(&outcome.tables, "Bowlers", RankingFormat::Odi).rank.is_empty());
    assert!(table(&outcome.tables, "Bowlers", RankingFormat::T20).rank.is_empty());
    assert!(outcome.has_data());
}

#[test]
fn live_rows_win_over_snapshot() {
    let snapshot = RankingSnapshot::load(&fixture_path("rankings_snapshot.json"));
    let pages = CannedPages {
        pages: HashMap::from([(RankingKind::Bowling, rows(3))]),
    };
    let outcome = collect_rankings(&pages, &snapshot, &[RankingKind::Bowling], Duration::ZERO);
    let test = table(&outcome.tables, "Bowlers", RankingFormat::Test);
    assert_eq!(test.rank.len(), 1);
    assert_eq!(test.rank[0].subject_name, "Player 1");
}

#[test]
fn page_fetches_are_spaced_by_delay() {
    let pages = CannedPages {
        pages: HashMap::new(),
    };
    let started = Instant::now();
    collect_rankings(
        &pages,
        &RankingSnapshot::empty(),
        &RankingKind::ALL,
        Duration::from_millis(50),
    );
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[test]
fn single_page_does_not_wait() {
    let pages = CannedPages {
        pages: HashMap::from([(RankingKind::Batting, rows(3))]),
    };
    let started = Instant::now();
    collect_rankings(
        &pages,
        &RankingSnapshot::empty(),
        &[RankingKind::Batting],
        Duration::from_secs(2),
    );
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn missing_snapshot_file_loads_empty() {
    let snapshot = RankingSnapshot::load(&fixture_path("does_not_exist.json"));
    assert!(snapshot.is_empty());
}

#[test]
fn snapshot_lookup_ignores_case() {
    let snapshot = RankingSnapshot::load(&fixture_path("rankings_snapshot.json"));
    assert!(snapshot.lookup("bowlers", "test").is_some());
    assert!(snapshot.lookup("Bowlers", "ODI").is_none());
}

#[test]
fn saved_snapshot_loads_back() {
    let mut path = std::env::temp_dir();
    path.push(format!("cricket_feed_snapshot_{}", std::process::id()));
    path.push("rankings_snapshot.json");

    let entry = RankingEntry {
        position: 1,
        subject_name: "India".to_string(),
        subject_country: String::new(),
        rating: 121,
        kind: RankingKind::Team,
        format: RankingFormat::Odi,
    };
    let tables = vec![
        RankingTable {
            category: "Teams".to_string(),
            kind: RankingKind::Team,
            format: RankingFormat::Odi,
            rank: vec![entry.clone()],
        },
        RankingTable {
            category: "Teams".to_string(),
            kind: RankingKind::Team,
            format: RankingFormat::T20,
            rank: Vec::new(),
        },
    ];
    let written = save_snapshot(&path, &tables).expect("snapshot should save");
    assert_eq!(written, 1);

    let loaded = RankingSnapshot::load(&path);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.lookup("Teams", "ODI"), Some(&[entry][..]));

    let raw = fs::read_to_string(&path).expect("snapshot file");
    assert!(raw.contains("\"captured_at\""));
    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn outdated_snapshot_version_is_ignored() {
    let mut path = std::env::temp_dir();
    path.push(format!("cricket_feed_snapshot_v0_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"version":0,"tables":[{"category":"Teams","kind":"Team","format":"ODI","rank":[{"position":1,"subject_name":"India","rating":121,"kind":"Team","format":"ODI"}]}]}"#,
    )
    .expect("write snapshot");
    assert!(RankingSnapshot::load(&path).is_empty());
    let _ = fs::remove_file(&path);
}
