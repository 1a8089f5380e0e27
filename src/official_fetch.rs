use std::collections::BTreeMap;

use log::warn;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::Config;
use crate::error::FetchError;
use crate::http_client::{build_client, fetch_text};
use crate::model::{
    BattingStats, BowlingStats, Event, EventStatus, PLACEHOLDER_STAT, PLACEHOLDER_TEAM,
    PlayerProfile, SourceProvider, TeamScore,
};
use crate::provider::OfficialProvider;

pub struct CricApiClient {
    client: Client,
    base: String,
    api_key: Option<String>,
}

impl CricApiClient {
    pub fn new(base: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            base: base.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = build_client(config.official_timeout)?;
        Ok(Self::new(
            config.cricket_api_base.clone(),
            config.cricket_api_key.clone(),
            client,
        ))
    }

    fn call(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, FetchError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(FetchError::UpstreamRejection(
                "CRICKET_API_KEY is not configured".to_string(),
            ));
        };
        let url = format!("{}/{endpoint}", self.base);
        let mut query = params.to_vec();
        query.push(("apikey", key.to_string()));
        fetch_text(&self.client, &url, &query)
    }
}

impl OfficialProvider for CricApiClient {
    fn name(&self) -> &str {
        "cricapi"
    }

    fn current_matches(&self) -> Result<Vec<Event>, FetchError> {
        current_matches_with_fallback(|endpoint| {
            self.call(endpoint, &[("offset", "0".to_string())])
        })
    }

    fn schedule(&self) -> Result<Vec<Event>, FetchError> {
        let body = self.call("matches", &[("offset", "0".to_string())])?;
        parse_schedule_json(&body)
    }

    fn player(&self, query: &str) -> Result<PlayerProfile, FetchError> {
        let body = self.call(
            "players",
            &[("offset", "0".to_string()), ("search", query.to_string())],
        )?;
        let hit = parse_player_search_json(&body, query)?;

        let detail = self
            .call("players_info", &[("id", hit.id.clone())])
            .and_then(|body| parse_player_info_json(&body, &hit.name));
        match detail {
            Ok(profile) => Ok(profile),
            Err(err) => {
                warn!("cricapi players_info for {} failed: {err}", hit.id);
                Ok(profile_from_name(&hit.name))
            }
        }
    }
}

/// `currentMatches`, then the `matches` listing once if that fails for any reason.
pub fn current_matches_with_fallback(
    mut call: impl FnMut(&str) -> Result<String, FetchError>,
) -> Result<Vec<Event>, FetchError> {
    let primary = call("currentMatches").and_then(|body| parse_current_matches_json(&body));
    match primary {
        Ok(events) => Ok(events),
        Err(err) => {
            warn!("cricapi currentMatches failed ({err}); trying matches listing");
            let body = call("matches")?;
            parse_current_matches_json(&body)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHit {
    pub id: String,
    pub name: String,
}

/// Unwraps the `{status, data, info}` envelope, rejecting anything but `status == "success"`.
pub fn parse_envelope(raw: &str) -> Result<Value, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(FetchError::Malformed("empty body".to_string()));
    }
    let mut root: Value = serde_json::from_str(trimmed)
        .map_err(|err| FetchError::Malformed(format!("invalid json: {err}")))?;

    let status = root.get("status").and_then(Value::as_str).unwrap_or_default();
    if status != "success" {
        let info = root
            .get("info")
            .and_then(Value::as_str)
            .or_else(|| root.get("reason").and_then(Value::as_str))
            .unwrap_or("API returned failure");
        return Err(FetchError::UpstreamRejection(info.to_string()));
    }
    Ok(root.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}

pub fn parse_current_matches_json(raw: &str) -> Result<Vec<Event>, FetchError> {
    let data = parse_envelope(raw)?;
    Ok(normalize_matches(&data, false))
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<Event>, FetchError> {
    let data = parse_envelope(raw)?;
    Ok(normalize_matches(&data, true))
}

pub fn parse_player_search_json(raw: &str, query: &str) -> Result<PlayerHit, FetchError> {
    let data = parse_envelope(raw)?;
    let first = data
        .as_array()
        .and_then(|list| list.iter().find(|p| pick_string(p, &["id"]).is_some()))
        .ok_or_else(|| FetchError::NotFound(format!("player {query}")))?;
    Ok(PlayerHit {
        id: pick_string(first, &["id"]).unwrap_or_default(),
        name: pick_string(first, &["name"]).unwrap_or_else(|| query.to_string()),
    })
}

pub fn parse_player_info_json(raw: &str, fallback_name: &str) -> Result<PlayerProfile, FetchError> {
    let info = parse_envelope(raw)?;
    let mut profile = profile_from_name(
        &pick_string(&info, &["name"]).unwrap_or_else(|| fallback_name.to_string()),
    );
    profile.country = pick_string(&info, &["country"]).unwrap_or_default();
    profile.role = pick_string(&info, &["role"]).unwrap_or_default();
    profile.image = pick_string(&info, &["playerImg", "image"]).unwrap_or_default();

    let Some(stats) = info.get("stats").and_then(Value::as_array) else {
        return Ok(profile);
    };
    for stat in stats {
        let discipline = pick_string(stat, &["fn"]).unwrap_or_default().to_lowercase();
        let match_type = pick_string(stat, &["matchtype", "matchType"])
            .unwrap_or_default()
            .to_lowercase();
        if match_type.is_empty() {
            continue;
        }
        match discipline.as_str() {
            "batting" => {
                let row = profile.batting_stats.entry(match_type).or_default();
                apply_batting_stat(row, stat);
            }
            "bowling" => {
                let row = profile.bowling_stats.entry(match_type).or_default();
                apply_bowling_stat(row, stat);
            }
            _ => {}
        }
    }
    Ok(profile)
}

fn profile_from_name(name: &str) -> PlayerProfile {
    PlayerProfile {
        name: name.to_string(),
        country: String::new(),
        role: String::new(),
        image: String::new(),
        batting_stats: BTreeMap::new(),
        bowling_stats: BTreeMap::new(),
    }
}

// Stats arrive either one row per format (`{"fn","matchtype","mat","runs",..}`)
// or one row per figure (`{"fn","matchtype","stat","value"}`).
fn apply_batting_stat(row: &mut BattingStats, stat: &Value) {
    if let Some(name) = pick_string(stat, &["stat"]) {
        let value = value_to_string(stat.get("value"));
        match name.to_lowercase().as_str() {
            "m" | "mat" => row.matches = value,
            "runs" => row.runs = value,
            "avg" | "ave" => row.average = value,
            "sr" => row.strike_rate = value,
            "hs" => row.highest_score = value,
            "100s" | "100" => row.hundreds = value,
            "50s" | "50" => row.fifties = value,
            _ => {}
        }
        return;
    }
    *row = BattingStats {
        matches: value_to_string(stat.get("mat")),
        runs: value_to_string(stat.get("runs")),
        average: value_to_string(stat.get("ave")),
        strike_rate: value_to_string(stat.get("sr")),
        highest_score: value_to_string(stat.get("hs")),
        hundreds: value_to_string(stat.get("100s")),
        fifties: value_to_string(stat.get("50s")),
    };
}

fn apply_bowling_stat(row: &mut BowlingStats, stat: &Value) {
    if let Some(name) = pick_string(stat, &["stat"]) {
        let value = value_to_string(stat.get("value"));
        match name.to_lowercase().as_str() {
            "m" | "mat" => row.matches = value,
            "wkts" => row.wickets = value,
            "econ" => row.economy = value,
            "bbi" => row.best_bowling_innings = value,
            _ => {}
        }
        return;
    }
    *row = BowlingStats {
        matches: value_to_string(stat.get("mat")),
        wickets: value_to_string(stat.get("wkts")),
        economy: value_to_string(stat.get("econ")),
        best_bowling_innings: value_to_string(stat.get("bbi")),
    };
}

fn normalize_matches(data: &Value, prefer_gmt: bool) -> Vec<Event> {
    let Some(list) = data.as_array() else {
        return Vec::new();
    };
    list.iter()
        .enumerate()
        .map(|(idx, raw)| normalize_match(raw, idx, prefer_gmt))
        .collect()
}

/// Maps one upstream match record onto [`Event`]. Every field has a default.
pub fn normalize_match(raw: &Value, idx: usize, prefer_gmt: bool) -> Event {
    let id = pick_string(raw, &["id"])
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| (idx + 1).to_string());
    let name = pick_string(raw, &["name"])
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Match".to_string());

    let mut event = Event::new(id, name, SourceProvider::Official);

    let listed = raw.get("teams").and_then(Value::as_array);
    let team_at = |idx: usize| {
        listed
            .and_then(|list| list.get(idx))
            .and_then(as_string)
            .filter(|name| !name.is_empty())
    };
    let teams = [team_at(0), team_at(1)];
    event = event.with_teams(
        teams[0].clone().unwrap_or_else(|| PLACEHOLDER_TEAM.to_string()),
        teams[1].clone().unwrap_or_else(|| PLACEHOLDER_TEAM.to_string()),
    );

    let innings = raw
        .get("score")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for (slot, team) in event.scores.iter_mut().zip(teams.iter()) {
        let Some(team) = team else {
            continue;
        };
        if let Some(inning) = innings.iter().find(|s| {
            pick_string(s, &["inning"]).is_some_and(|label| label.contains(team.as_str()))
        }) {
            *slot = TeamScore {
                title: team.clone(),
                runs: value_to_string(inning.get("r")),
                wickets: value_to_string(inning.get("w")),
                overs: value_to_string(inning.get("o")),
            };
        }
    }

    let started = raw.get("matchStarted").and_then(Value::as_bool).unwrap_or(false);
    let ended = raw.get("matchEnded").and_then(Value::as_bool).unwrap_or(false);
    event.status = if ended {
        EventStatus::Completed
    } else if started {
        EventStatus::Live
    } else {
        EventStatus::Upcoming
    };

    event.status_text = pick_string(raw, &["status"]).unwrap_or_default();
    event.match_type = pick_string(raw, &["matchType"]).unwrap_or_default();
    event.venue = pick_string(raw, &["venue"]).unwrap_or_default();
    event.date = if prefer_gmt {
        pick_string(raw, &["dateTimeGMT", "date"])
    } else {
        pick_string(raw, &["date", "dateTimeGMT"])
    }
    .unwrap_or_default();
    event
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key)
            && let Some(s) = as_string(v)
        {
            return Some(s);
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => PLACEHOLDER_STAT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{normalize_match, parse_envelope};
    use crate::error::FetchError;
    use crate::model::{EventStatus, TeamScore};

    #[test]
    fn missing_teams_become_placeholders() {
        let event = normalize_match(&json!({"id": "m1", "name": "Qualifier"}), 0, false);
        assert_eq!(event.teams, ["TBA".to_string(), "TBA".to_string()]);
        assert_eq!(event.scores.len(), 2);
        assert!(event.scores.iter().all(TeamScore::is_placeholder));
        assert_eq!(event.status, EventStatus::Upcoming);
    }

    #[test]
    fn single_team_is_padded() {
        let event = normalize_match(&json!({"teams": ["Nepal"]}), 4, false);
        assert_eq!(event.id, "5");
        assert_eq!(event.display_name, "Match");
        assert_eq!(event.teams, ["Nepal".to_string(), "TBA".to_string()]);
        assert_eq!(event.scores[0].title, "Nepal");
        assert_eq!(event.scores[1].title, "TBA");
    }

    #[test]
    fn blank_or_null_team_keeps_its_slot() {
        let raw = json!({
            "teams": [null, "Kenya"],
            "score": [{"inning": "Kenya Inning 1", "r": 140, "w": 9, "o": 50}]
        });
        let event = normalize_match(&raw, 0, false);
        assert_eq!(event.teams, ["TBA".to_string(), "Kenya".to_string()]);
        assert!(event.scores[0].is_placeholder());
        assert_eq!(event.scores[1].runs, "140");

        let raw = json!({
            "teams": ["", "Oman"],
            "score": [{"inning": "Oman Inning 1", "r": 101, "w": 2, "o": 14}]
        });
        let event = normalize_match(&raw, 0, false);
        assert_eq!(event.teams[0], "TBA");
        assert!(event.scores[0].is_placeholder());
        assert_eq!(event.scores[1].runs, "101");
    }

    #[test]
    fn scores_align_with_teams_by_inning_label() {
        let raw = json!({
            "teams": ["India", "Pakistan"],
            "score": [
                {"inning": "Pakistan Inning 1", "r": 180, "w": 7, "o": 20},
                {"inning": "India Inning 1", "r": 181, "w": 4, "o": 19.3}
            ],
            "matchStarted": true,
            "matchEnded": true
        });
        let event = normalize_match(&raw, 0, false);
        assert_eq!(event.scores[0].runs, "181");
        assert_eq!(event.scores[0].overs, "19.3");
        assert_eq!(event.scores[1].wickets, "7");
        assert_eq!(event.status, EventStatus::Completed);
    }

    #[test]
    fn failure_status_carries_upstream_info() {
        let err = parse_envelope(r#"{"status":"failure","info":"hits today exceeded"}"#)
            .expect_err("failure should be rejected");
        assert_eq!(
            err,
            FetchError::UpstreamRejection("hits today exceeded".to_string())
        );
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_envelope("<html>"),
            Err(FetchError::Malformed(_))
        ));
    }
}
