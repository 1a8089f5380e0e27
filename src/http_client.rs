use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::error::FetchError;

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DIAGNOSTIC_BODY_CHARS: usize = 200;

pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| FetchError::Transport(format!("failed to build http client: {err}")))
}

/// GETs `url` and returns the body of a 2xx response.
pub fn fetch_text(client: &Client, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
    let resp = client
        .get(url)
        .header(USER_AGENT, BROWSER_AGENT)
        .query(query)
        .send()
        .map_err(|err| transport_error(url, &err))?;

    let status = resp.status();
    let body = resp
        .text()
        .map_err(|err| FetchError::Transport(format!("failed reading body from {url}: {err}")))?;
    if !status.is_success() {
        let snippet = body.chars().take(DIAGNOSTIC_BODY_CHARS).collect::<String>();
        return Err(FetchError::UpstreamRejection(format!("http {status}: {snippet}")));
    }
    Ok(body)
}

fn transport_error(url: &str, err: &reqwest::Error) -> FetchError {
    let reason = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection error"
    } else {
        "request failed"
    };
    // reqwest includes the full url (with api keys) in its Display; keep the path only.
    let path = url.split('?').next().unwrap_or(url);
    FetchError::Transport(format!("{reason} for {path}"))
}
