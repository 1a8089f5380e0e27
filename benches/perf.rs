use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cricket_feed::merge::merge_events;
use cricket_feed::model::{Event, RankingFormat, RankingKind, SourceProvider};
use cricket_feed::official_fetch::parse_current_matches_json;
use cricket_feed::rankings::{RankRow, partition};
use cricket_feed::scrape_fetch::{parse_live_scores_html, parse_ranking_rows_html};
use cricket_feed::ttl_cache::TtlCache;

fn sample_events(n: usize, source: SourceProvider, offset: usize) -> Vec<Event> {
    (0..n)
        .map(|i| {
            let a = (i + offset) % 40;
            let b = (i + offset + 7) % 40;
            Event::new(
                format!("{i}"),
                format!("Team {a} vs Team {b}, Match {i}"),
                source,
            )
        })
        .collect()
}

fn bench_merge_events(c: &mut Criterion) {
    let official = sample_events(60, SourceProvider::Official, 0);
    let scraped = sample_events(40, SourceProvider::Scraped, 3);
    c.bench_function("merge_events_60x40", |b| {
        b.iter(|| {
            let feed = merge_events(black_box(official.clone()), black_box(scraped.clone()));
            black_box(feed.len());
        })
    });
}

fn bench_partition(c: &mut Criterion) {
    let rows = (1..=150)
        .map(|i| RankRow {
            position: i,
            name: format!("Player {i}"),
            country: "Country".to_string(),
            rating: 1_000 - i,
        })
        .collect::<Vec<_>>();
    c.bench_function("partition_150_rows", |b| {
        b.iter(|| {
            for format in RankingFormat::ALL {
                black_box(partition(black_box(&rows), format).len());
            }
        })
    });
}

fn bench_live_scores_parse(c: &mut Criterion) {
    c.bench_function("live_scores_parse", |b| {
        b.iter(|| {
            let events = parse_live_scores_html(black_box(LIVE_SCORES_HTML));
            black_box(events.len());
        })
    });
}

fn bench_ranking_rows_parse(c: &mut Criterion) {
    c.bench_function("ranking_rows_parse", |b| {
        b.iter(|| {
            let rows = parse_ranking_rows_html(black_box(RANKINGS_HTML), RankingKind::Batting);
            black_box(rows.len());
        })
    });
}

fn bench_current_matches_parse(c: &mut Criterion) {
    c.bench_function("current_matches_parse", |b| {
        b.iter(|| {
            let events = parse_current_matches_json(black_box(CURRENT_MATCHES_JSON)).unwrap();
            black_box(events.len());
        })
    });
}

fn bench_cache_hits(c: &mut Criterion) {
    let cache = TtlCache::new();
    for i in 0..256 {
        cache.set(format!("key:{i}"), i);
    }
    let ttl = std::time::Duration::from_secs(300);
    c.bench_function("ttl_cache_get", |b| {
        b.iter(|| {
            black_box(cache.get(black_box("key:128"), ttl));
        })
    });
}

criterion_group!(
    perf,
    bench_merge_events,
    bench_partition,
    bench_live_scores_parse,
    bench_ranking_rows_parse,
    bench_current_matches_parse,
    bench_cache_hits
);
criterion_main!(perf);

static LIVE_SCORES_HTML: &str = include_str!("../tests/fixtures/cricbuzz_live_scores.html");
static RANKINGS_HTML: &str = include_str!("../tests/fixtures/cricbuzz_rankings_batting.html");
static CURRENT_MATCHES_JSON: &str = include_str!("../tests/fixtures/cricapi_current_matches.json");
