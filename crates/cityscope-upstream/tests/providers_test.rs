//! Adapter integration tests against a local mock server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cityscope_core::{Category, CategoryProvider, CategoryRecord, Error, GeocodeProvider, Location};
use cityscope_upstream::{DarkSkyProvider, EventbriteProvider, GoogleGeocoder, TmdbProvider};

fn test_location() -> Location {
    Location {
        id: 1,
        search_query: "98105".to_string(),
        formatted_query: "Seattle, WA 98105, USA".to_string(),
        latitude: 47.66,
        longitude: -122.3,
    }
}

fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
}

#[tokio::test]
async fn geocoder_returns_parsed_places() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode"))
        .and(query_param("address", "98105"))
        .and(query_param("key", "test-key"))
        .respond_with(json_response(
            r#"{
                "results": [{
                    "formatted_address": "Seattle, WA 98105, USA",
                    "geometry": { "location": { "lat": 47.66, "lng": -122.3 } }
                }]
            }"#,
        ))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(
        reqwest::Client::new(),
        format!("{}/geocode", server.uri()),
        "test-key".to_string(),
    );

    let places = geocoder.geocode("98105").await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].formatted_address, "Seattle, WA 98105, USA");
    assert_eq!(places[0].latitude, 47.66);
    assert_eq!(places[0].longitude, -122.3);
}

#[tokio::test]
async fn geocoder_surfaces_non_2xx_as_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(
        reqwest::Client::new(),
        format!("{}/geocode", server.uri()),
        "test-key".to_string(),
    );

    match geocoder.geocode("98105").await {
        Err(Error::Upstream(msg)) => assert!(msg.contains("502")),
        other => panic!("expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn geocoder_surfaces_malformed_payload_as_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(json_response(r#"{"results": "not an array"}"#))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::new(
        reqwest::Client::new(),
        format!("{}/geocode", server.uri()),
        "test-key".to_string(),
    );

    assert!(matches!(
        geocoder.geocode("98105").await,
        Err(Error::Upstream(_))
    ));
}

#[tokio::test]
async fn weather_provider_normalizes_daily_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wkey/47.66,-122.3"))
        .respond_with(json_response(
            r#"{
                "daily": { "data": [
                    { "time": 1578268800, "summary": "Clear throughout the day." },
                    { "time": 1578355200 },
                    { "time": 1578441600, "summary": "Light rain." }
                ]}
            }"#,
        ))
        .mount(&server)
        .await;

    let provider = DarkSkyProvider::new(reqwest::Client::new(), server.uri(), "wkey".to_string());
    assert_eq!(provider.category(), Category::Weather);

    let records = provider.fetch(&test_location(), 1234).await.unwrap();
    // The entry with no summary is skipped, not fatal.
    assert_eq!(records.len(), 2);
    match &records[0] {
        CategoryRecord::Weather(w) => {
            assert_eq!(w.forecast, "Clear throughout the day.");
            assert_eq!(w.formatted_date, "Mon Jan 06 2020");
            assert_eq!(w.created_at, 1234);
            assert_eq!(w.location_id, 1);
        }
        other => panic!("expected weather record, got {:?}", other),
    }
}

#[tokio::test]
async fn events_provider_skips_unnamed_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("location.address", "98105"))
        .respond_with(json_response(
            r#"{
                "events": [
                    {
                        "url": "https://example.com/e/1",
                        "name": { "text": "Wine Walk" },
                        "start": { "local": "2025-09-05T19:00:00" },
                        "summary": "A walk with wine."
                    },
                    { "url": "https://example.com/e/2" }
                ]
            }"#,
        ))
        .mount(&server)
        .await;

    let provider = EventbriteProvider::new(
        reqwest::Client::new(),
        format!("{}/events", server.uri()),
        "token".to_string(),
    );
    assert_eq!(provider.category(), Category::Events);

    let records = provider.fetch(&test_location(), 50).await.unwrap();
    assert_eq!(records.len(), 1);
    match &records[0] {
        CategoryRecord::Event(e) => {
            assert_eq!(e.name, "Wine Walk");
            assert_eq!(e.event_date, "Fri Sep 05 2025");
        }
        other => panic!("expected event record, got {:?}", other),
    }
}

#[tokio::test]
async fn movies_provider_applies_documented_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .and(query_param("query", "98105"))
        .respond_with(json_response(
            r#"{
                "results": [
                    { "title": "Obscure Film" },
                    { "overview": "No title here" }
                ]
            }"#,
        ))
        .mount(&server)
        .await;

    let provider = TmdbProvider::new(
        reqwest::Client::new(),
        format!("{}/movies", server.uri()),
        "mkey".to_string(),
    );
    assert_eq!(provider.category(), Category::Movies);

    let records = provider.fetch(&test_location(), 0).await.unwrap();
    assert_eq!(records.len(), 1);
    match &records[0] {
        CategoryRecord::Movie(m) => {
            assert_eq!(m.title, "Obscure Film");
            assert_eq!(m.total_votes, 0);
            assert!(m.image_url.is_none());
        }
        other => panic!("expected movie record, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_upstream_result_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(json_response(r#"{"events": []}"#))
        .mount(&server)
        .await;

    let provider = EventbriteProvider::new(
        reqwest::Client::new(),
        format!("{}/events", server.uri()),
        "token".to_string(),
    );
    let records = provider.fetch(&test_location(), 0).await.unwrap();
    assert!(records.is_empty());
}
