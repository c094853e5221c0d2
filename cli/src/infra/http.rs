//! HTTP infrastructure — implements `RemoteSource` with a blocking `ureq` agent.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

use crate::application::ports::{RemoteSource, SourceResponse};

/// Upper bound on a downloaded installer.
const MAX_BODY_BYTES: u64 = 100 * 1024 * 1024;

/// `IMF-fixdate` as used by `If-Modified-Since` / `Last-Modified`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Production `RemoteSource` over `ureq`.
pub struct UreqSource {
    agent: ureq::Agent,
}

impl UreqSource {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("composer-provision/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl RemoteSource for UreqSource {
    async fn get(&self, url: &str, if_modified_since: Option<i64>) -> Result<SourceResponse> {
        let agent = self.agent.clone();
        let url_owned = url.to_string();
        tokio::task::spawn_blocking(move || {
            conditional_get(&agent, &url_owned, if_modified_since, MAX_BODY_BYTES)
        })
        .await
        .context("spawn_blocking for conditional GET")?
    }
}

fn conditional_get(
    agent: &ureq::Agent,
    url: &str,
    if_modified_since: Option<i64>,
    max_body: u64,
) -> Result<SourceResponse> {
    let mut req = agent.get(url);
    if let Some(header) = if_modified_since.and_then(format_http_date) {
        tracing::debug!(url, if_modified_since = %header, "conditional GET");
        req = req.set("If-Modified-Since", &header);
    }

    let response = match req.call() {
        Ok(response) => response,
        Err(ureq::Error::Status(304, _)) => return Ok(SourceResponse::NotModified),
        Err(ureq::Error::Status(code, response)) => {
            return Ok(SourceResponse::Status {
                code,
                reason: response.status_text().to_string(),
            });
        }
        Err(e) => return Err(anyhow::Error::new(e).context(format!("cannot reach {url}"))),
    };

    match response.status() {
        304 => return Ok(SourceResponse::NotModified),
        200..=299 => {}
        code => {
            return Ok(SourceResponse::Status {
                code,
                reason: response.status_text().to_string(),
            });
        }
    }

    let last_modified = response.header("Last-Modified").and_then(parse_http_date);
    let mut body = Vec::new();
    response
        .into_reader()
        .take(max_body.saturating_add(1))
        .read_to_end(&mut body)
        .with_context(|| format!("failed to read response from {url}"))?;
    if body.len() as u64 > max_body {
        anyhow::bail!("response from {url} exceeds {max_body} bytes");
    }

    Ok(SourceResponse::Content {
        last_modified,
        body,
    })
}

/// Epoch millis → HTTP date, `None` when out of range.
fn format_http_date(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format(HTTP_DATE_FORMAT).to_string())
}

/// HTTP date → epoch millis, `None` when unparseable.
fn parse_http_date(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.timestamp_millis())
}
