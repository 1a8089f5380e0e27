use std::collections::VecDeque;

use log::debug;

use crate::model::Event;

/// Lowercased display name with whitespace and punctuation removed.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn names_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Merges both providers' events into one feed.
///
/// A scraped event whose normalized name contains, or is contained in, an
/// official event's name is folded into that event as `cross_reference_id`.
/// Unmatched scraped events are pushed to the front as they are found, so they
/// come out in reverse discovery order ahead of every official event. Official
/// events keep their upstream order.
pub fn merge_events(official: Vec<Event>, scraped: Vec<Event>) -> Vec<Event> {
    let mut official = official;
    let official_names = official
        .iter()
        .map(|e| normalize_name(&e.display_name))
        .collect::<Vec<_>>();

    let mut premium: VecDeque<Event> = VecDeque::new();
    for event in scraped {
        let name = normalize_name(&event.display_name);
        let matches = official_names
            .iter()
            .enumerate()
            .filter(|(_, official_name)| names_overlap(&name, official_name))
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();

        let Some(first) = matches.first().copied() else {
            premium.push_front(event);
            continue;
        };
        // Prefer an official event that is not linked yet.
        let target = matches
            .iter()
            .copied()
            .find(|idx| official[*idx].cross_reference_id.is_none())
            .unwrap_or(first);
        if official[target].cross_reference_id.is_none() {
            debug!(
                "linked scraped {} to official {}",
                event.id, official[target].id
            );
            official[target].cross_reference_id = Some(event.id);
        }
    }

    let mut feed = Vec::with_capacity(premium.len() + official.len());
    feed.extend(premium);
    feed.extend(official);
    feed
}
