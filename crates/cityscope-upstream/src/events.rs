//! Eventbrite events adapter and normalizer.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use cityscope_core::{Category, CategoryProvider, CategoryRecord, Error, Event, Location, Result};

use crate::config::{build_client, UpstreamConfig};

/// Events adapter backed by the Eventbrite search API.
pub struct EventbriteProvider {
    client: Client,
    base_url: String,
    token: String,
}

impl EventbriteProvider {
    /// Create an adapter from upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self::new(
            build_client(config.timeout)?,
            config.events_base_url.clone(),
            config.eventbrite_token.clone(),
        ))
    }

    /// Create an adapter with an explicit client and endpoint.
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

/// One event from the search payload.
#[derive(Debug, Default, Deserialize)]
pub struct RawEvent {
    pub url: Option<String>,
    pub name: Option<RawEventName>,
    pub start: Option<RawEventStart>,
    pub summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEventName {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEventStart {
    pub local: Option<String>,
}

/// Render an Eventbrite local start time ("2025-09-05T19:00:00") as
/// `Www Mmm dd yyyy`. Unparseable values pass through unchanged.
fn format_event_date(local: &str) -> String {
    NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.format("%a %b %d %Y").to_string())
        .unwrap_or_else(|_| local.to_string())
}

/// Normalize one raw event into an event record.
///
/// The name is required; an item without one is skipped. Link, date and
/// summary default to empty strings.
pub fn normalize_event(raw: &RawEvent, now_ms: i64, location_id: i64) -> Option<Event> {
    let name = raw.name.as_ref()?.text.clone()?;
    let event_date = raw
        .start
        .as_ref()
        .and_then(|s| s.local.as_deref())
        .map(format_event_date)
        .unwrap_or_default();

    Some(Event {
        link: raw.url.clone().unwrap_or_default(),
        name,
        event_date,
        summary: raw.summary.clone().unwrap_or_default(),
        created_at: now_ms,
        location_id,
    })
}

#[async_trait]
impl CategoryProvider for EventbriteProvider {
    fn category(&self) -> Category {
        Category::Events
    }

    async fn fetch(&self, location: &Location, now_ms: i64) -> Result<Vec<CategoryRecord>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("token", self.token.as_str()),
                ("location.address", location.search_query.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "events provider returned status {}",
                status
            )));
        }

        let payload: EventsResponse = response.json().await?;

        let records: Vec<CategoryRecord> = payload
            .events
            .iter()
            .filter_map(|raw| normalize_event(raw, now_ms, location.id))
            .map(CategoryRecord::Event)
            .collect();

        debug!(
            subsystem = "upstream",
            component = "events",
            op = "fetch",
            location_id = location.id,
            result_count = records.len(),
            "Events normalized"
        );
        Ok(records)
    }
}
