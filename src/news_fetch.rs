use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::FetchError;
use crate::http_client::{build_client, fetch_text};
use crate::model::NewsArticle;
use crate::provider::NewsProvider;

const PAGE_SIZE: u32 = 10;

pub struct NewsDataClient {
    client: Client,
    base: String,
    api_key: Option<String>,
}

impl NewsDataClient {
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
            config.news_api_base.clone(),
            config.news_api_key.clone(),
            client,
        ))
    }
}

impl NewsProvider for NewsDataClient {
    fn name(&self) -> &str {
        "newsdata"
    }

    fn latest(&self) -> Result<Vec<NewsArticle>, FetchError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(FetchError::UpstreamRejection(
                "NEWS_API_KEY is not configured".to_string(),
            ));
        };
        let url = format!("{}/latest", self.base);
        let query = [
            ("q", "cricket".to_string()),
            ("category", "sports".to_string()),
            ("language", "en".to_string()),
            ("size", PAGE_SIZE.to_string()),
            ("apikey", key.to_string()),
        ];
        let body = fetch_text(&self.client, &url, &query)?;
        parse_news_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    category: Option<Vec<String>>,
    #[serde(default, rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(default)]
    source_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

pub fn parse_news_json(raw: &str) -> Result<Vec<NewsArticle>, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let resp: NewsResponse = serde_json::from_str(trimmed)
        .map_err(|err| FetchError::Malformed(format!("invalid news json: {err}")))?;
    if resp.status.as_deref().is_some_and(|s| s != "success") {
        return Err(FetchError::UpstreamRejection(format!(
            "news status {}",
            resp.status.unwrap_or_default()
        )));
    }
    let Some(results) = resp.results else {
        return Err(FetchError::Malformed("news payload has no results".to_string()));
    };

    Ok(results.into_iter().map(into_article).collect())
}

fn into_article(raw: RawArticle) -> NewsArticle {
    let category = raw
        .category
        .and_then(|list| list.into_iter().find(|c| !c.trim().is_empty()))
        .unwrap_or_else(|| "Cricket".to_string());
    NewsArticle {
        title: raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        description: raw.description.unwrap_or_default(),
        url: raw.link.unwrap_or_default(),
        category,
        timestamp: raw.pub_date.unwrap_or_default(),
        source: raw.source_name.unwrap_or_default(),
        image: raw.image_url.unwrap_or_default(),
    }
}
