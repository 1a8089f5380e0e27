use std::path::PathBuf;

use anyhow::{Context, Result};

use cricket_feed::config::Config;
use cricket_feed::model::RankingKind;
use cricket_feed::rankings::collect_rankings;
use cricket_feed::scrape_fetch::CricbuzzScraper;
use cricket_feed::snapshot::{RankingSnapshot, save_snapshot};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let out = parse_out_arg()
        .or_else(|| config.snapshot_path.clone())
        .context("unable to resolve snapshot path")?;

    let scraper = CricbuzzScraper::from_config(&config).context("failed to build scraper")?;
    // Live rows only: an empty fallback keeps stale tables out of the new file.
    let outcome = collect_rankings(
        &scraper,
        &RankingSnapshot::empty(),
        &RankingKind::ALL,
        config.rankings_delay,
    );

    for table in &outcome.tables {
        println!(
            "{:<13} {:<4} {:>3} rows",
            table.category,
            table.format.label(),
            table.rank.len()
        );
    }
    if !outcome.failed_kinds.is_empty() {
        println!("failed pages: {:?}", outcome.failed_kinds);
    }
    if !outcome.has_data() {
        println!("Nothing extracted; existing snapshot left untouched.");
        return Ok(());
    }

    let written = save_snapshot(&out, &outcome.tables)?;
    println!("Snapshot: {} tables -> {}", written, out.display());
    Ok(())
}

fn parse_out_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--out=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}
