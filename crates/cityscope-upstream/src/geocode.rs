//! Google Maps geocoding adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use cityscope_core::{Error, GeocodeProvider, GeocodedPlace, Result};

use crate::config::{build_client, UpstreamConfig};

/// Geocoding adapter backed by the Google Maps Geocoding API.
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Create an adapter from upstream configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self::new(
            build_client(config.timeout)?,
            config.geocode_base_url.clone(),
            config.geocode_api_key.clone(),
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
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<RawGeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct RawGeocodeResult {
    formatted_address: String,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl GeocodeProvider for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodedPlace>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "geocoding returned status {}",
                status
            )));
        }

        let payload: GeocodeResponse = response.json().await?;

        debug!(
            subsystem = "upstream",
            component = "geocode",
            op = "fetch",
            search_query = %query,
            result_count = payload.results.len(),
            "Geocoding response parsed"
        );

        Ok(payload
            .results
            .into_iter()
            .map(|r| GeocodedPlace {
                formatted_address: r.formatted_address,
                latitude: r.geometry.location.lat,
                longitude: r.geometry.location.lng,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_parses_top_result() {
        let body = r#"{
            "results": [{
                "formatted_address": "Seattle, WA 98105, USA",
                "geometry": { "location": { "lat": 47.66, "lng": -122.3 } }
            }]
        }"#;
        let payload: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(payload.results.len(), 1);
        assert_eq!(payload.results[0].formatted_address, "Seattle, WA 98105, USA");
        assert_eq!(payload.results[0].geometry.location.lat, 47.66);
    }

    #[test]
    fn test_geocode_response_tolerates_missing_results() {
        let payload: GeocodeResponse = serde_json::from_str(r#"{"status":"ZERO_RESULTS"}"#).unwrap();
        assert!(payload.results.is_empty());
    }
}
