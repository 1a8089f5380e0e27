use cricket_feed::merge::merge_events;
use cricket_feed::model::{Event, SourceProvider};

fn official(id: &str, name: &str) -> Event {
    Event::new(id, name, SourceProvider::Official)
}

fn scraped(id: &str, name: &str) -> Event {
    Event::new(id, name, SourceProvider::Scraped)
}

fn ids(feed: &[Event]) -> Vec<&str> {
    feed.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn substring_match_links_without_duplicating() {
    let feed = merge_events(
        vec![official("o1", "India vs Pakistan, 1st T20I")],
        vec![scraped("91001", "India vs Pakistan")],
    );
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, "o1");
    assert_eq!(feed[0].source, SourceProvider::Official);
    assert_eq!(feed[0].cross_reference_id.as_deref(), Some("91001"));
    assert!(feed[0].is_enriched());
}

#[test]
fn longer_scraped_name_still_matches() {
    let feed = merge_events(
        vec![official("o1", "Nepal vs Scotland")],
        vec![scraped("91003", "Nepal vs Scotland, 3rd Match")],
    );
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].cross_reference_id.as_deref(), Some("91003"));
}

#[test]
fn distinct_events_are_kept_side_by_side() {
    let feed = merge_events(
        vec![official("o1", "India vs Pakistan")],
        vec![scraped("91002", "England vs Australia")],
    );
    assert_eq!(ids(&feed), vec!["91002", "o1"]);
    assert_eq!(feed[0].source, SourceProvider::Scraped);
    assert!(feed[0].cross_reference_id.is_none());
    assert!(feed[1].cross_reference_id.is_none());
}

#[test]
fn unmatched_scraped_events_lead_in_reverse_discovery_order() {
    let feed = merge_events(
        vec![official("o1", "Alpha vs Beta"), official("o2", "Gamma vs Delta")],
        vec![
            scraped("s1", "Kappa vs Lambda"),
            scraped("s2", "Alpha vs Beta"),
            scraped("s3", "Sigma vs Tau"),
        ],
    );
    assert_eq!(ids(&feed), vec!["s3", "s1", "o1", "o2"]);
    assert_eq!(feed[2].cross_reference_id.as_deref(), Some("s2"));
}

#[test]
fn case_and_punctuation_do_not_block_a_match() {
    let feed = merge_events(
        vec![official("o1", "India vs Pakistan")],
        vec![scraped("s1", "INDIA VS. PAKISTAN")],
    );
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].cross_reference_id.as_deref(), Some("s1"));
}

#[test]
fn empty_inputs() {
    assert!(merge_events(Vec::new(), Vec::new()).is_empty());

    let only_official = merge_events(vec![official("o1", "A vs B")], Vec::new());
    assert_eq!(ids(&only_official), vec!["o1"]);

    let only_scraped = merge_events(Vec::new(), vec![scraped("s1", "A vs B"), scraped("s2", "C vs D")]);
    assert_eq!(ids(&only_scraped), vec!["s2", "s1"]);
}

#[test]
fn second_copy_of_a_linked_match_is_dropped() {
    let feed = merge_events(
        vec![official("o1", "India vs Pakistan, 1st T20I")],
        vec![scraped("s1", "India vs Pakistan"), scraped("s2", "India vs Pakistan")],
    );
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].cross_reference_id.as_deref(), Some("s1"));
}

#[test]
fn merged_feed_keeps_official_fields() {
    let mut base = official("o1", "India vs Pakistan").with_teams("India", "Pakistan");
    base.venue = "Dubai".to_string();
    let feed = merge_events(vec![base.clone()], vec![scraped("s1", "India vs Pakistan")]);
    assert_eq!(feed[0].venue, "Dubai");
    assert_eq!(feed[0].teams, base.teams);
    assert_eq!(feed[0].scores, base.scores);
}
