use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use cricket_feed::aggregator::{Aggregator, FeedCache};
use cricket_feed::config::Config;

const USAGE: &str =
    "usage: cricket_feed <live|schedule|rankings|news|player NAME|commentary ID|stats>";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first().map(|s| s.trim().to_ascii_lowercase()) else {
        return Err(anyhow!(USAGE));
    };
    let rest = args[1..].join(" ");

    let config = Config::from_env();
    let cache = Arc::new(FeedCache::new());
    let aggregator =
        Aggregator::from_config(&config, cache).context("failed to build aggregator")?;

    match command.as_str() {
        "live" => print_json(&aggregator.live()),
        "schedule" => print_json(&aggregator.schedule()),
        "rankings" => print_json(&aggregator.rankings()),
        "news" => print_json(&aggregator.news()),
        "player" => {
            if rest.trim().is_empty() {
                return Err(anyhow!("player needs a name\n{USAGE}"));
            }
            match aggregator.player(&rest) {
                Some(profile) => print_json(&profile),
                None => {
                    eprintln!("No player found for {rest:?}.");
                    Ok(())
                }
            }
        }
        "commentary" => {
            if rest.trim().is_empty() {
                return Err(anyhow!("commentary needs a match id\n{USAGE}"));
            }
            print_json(&aggregator.commentary(&rest))
        }
        "stats" => print_json(&aggregator.cache_stats()),
        other => Err(anyhow!("unknown command {other:?}\n{USAGE}")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}
