//! Dark Sky weather adapter and normalizer.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use cityscope_core::{
    Category, CategoryProvider, CategoryRecord, Error, Location, Result, WeatherReport,
};

use crate::config::{build_client, UpstreamConfig};

/// Weather adapter backed by the Dark Sky forecast API.
pub struct DarkSkyProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DarkSkyProvider {
    /// Create an adapter from upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self::new(
            build_client(config.timeout)?,
            config.weather_base_url.clone(),
            config.weather_api_key.clone(),
        ))
    }

    /// Create an adapter with an explicit client and endpoint.
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    data: Vec<DailyForecast>,
}

/// One daily entry from the forecast payload.
#[derive(Debug, Deserialize)]
pub struct DailyForecast {
    pub time: i64,
    pub summary: Option<String>,
}

/// Render a unix timestamp as `Www Mmm dd yyyy` (e.g. "Mon Jan 06 2020").
fn format_unix_date(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%a %b %d %Y").to_string())
        .unwrap_or_default()
}

/// Normalize one daily forecast into a weather record.
///
/// The summary text is required; an entry without one is skipped.
pub fn normalize_daily(
    day: &DailyForecast,
    now_ms: i64,
    location_id: i64,
) -> Option<WeatherReport> {
    let forecast = day.summary.clone()?;
    Some(WeatherReport {
        forecast,
        formatted_date: format_unix_date(day.time),
        created_at: now_ms,
        location_id,
    })
}

#[async_trait]
impl CategoryProvider for DarkSkyProvider {
    fn category(&self) -> Category {
        Category::Weather
    }

    async fn fetch(&self, location: &Location, now_ms: i64) -> Result<Vec<CategoryRecord>> {
        let url = format!(
            "{}/{}/{},{}",
            self.base_url, self.api_key, location.latitude, location.longitude
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "weather provider returned status {}",
                status
            )));
        }

        let payload: ForecastResponse = response.json().await?;

        let records: Vec<CategoryRecord> = payload
            .daily
            .data
            .iter()
            .filter_map(|day| normalize_daily(day, now_ms, location.id))
            .map(CategoryRecord::Weather)
            .collect();

        debug!(
            subsystem = "upstream",
            component = "weather",
            op = "fetch",
            location_id = location.id,
            result_count = records.len(),
            "Weather forecast normalized"
        );
        Ok(records)
    }
}
