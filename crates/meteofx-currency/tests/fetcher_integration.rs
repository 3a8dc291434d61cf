//! Integration tests for RateFetcher using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use meteofx_core::SourceTransform;
use meteofx_currency::{
    mock_rates, validate_rates, RateFetcher, RateOrigin, RateSource, RatesError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(name: &str, server: &MockServer, route: &str) -> RateSource {
    RateSource {
        name: name.to_string(),
        url: format!("{}{}", server.uri(), route),
        base: "USD".to_string(),
        transform: SourceTransform::InjectBaseRate,
    }
}

fn frankfurter_body() -> serde_json::Value {
    serde_json::json!({
        "amount": 1.0,
        "base": "USD",
        "date": "2024-05-01",
        "rates": { "EUR": 0.92, "GBP": 0.79, "JPY": 155.1 }
    })
}

#[tokio::test]
async fn test_first_source_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(frankfurter_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secondary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(frankfurter_body()))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = RateFetcher::new(
        vec![
            source("primary", &server, "/primary"),
            source("secondary", &server, "/secondary"),
        ],
        Duration::from_secs(5),
    )
    .unwrap();

    let outcome = fetcher.fetch_exchange_rates().await;
    assert_eq!(outcome.origin, RateOrigin::Source("primary".to_string()));
    assert_eq!(outcome.payload["rates"]["USD"], serde_json::json!(1.0));
    assert_eq!(outcome.payload["rates"]["EUR"], serde_json::json!(0.92));
}

#[tokio::test]
async fn test_failed_source_moves_to_next() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/healthy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(frankfurter_body()))
        .mount(&server)
        .await;

    let fetcher = RateFetcher::new(
        vec![
            source("broken", &server, "/broken"),
            source("healthy", &server, "/healthy"),
        ],
        Duration::from_secs(5),
    )
    .unwrap();

    let outcome = fetcher.fetch_exchange_rates().await;
    assert_eq!(outcome.origin, RateOrigin::Source("healthy".to_string()));
}

#[tokio::test]
async fn test_sole_source_failure_returns_mock() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher =
        RateFetcher::new(vec![source("only", &server, "/latest")], Duration::from_secs(5))
            .unwrap();

    let outcome = fetcher.fetch_exchange_rates().await;
    assert_eq!(outcome.origin, RateOrigin::Fallback);
    assert_eq!(outcome.payload, mock_rates());

    let set = validate_rates(&outcome.payload).unwrap();
    assert!(!set.rates.is_empty());
    assert!(set
        .rates
        .iter()
        .all(|(code, rate)| code.len() == 3
            && code.chars().all(|c| c.is_ascii_uppercase())
            && rate.is_finite()
            && *rate > 0.0));
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(frankfurter_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = RateFetcher::new(vec![source("slow", &server, "/slow")], Duration::from_millis(100))
        .unwrap();

    let err = fetcher
        .fetch_from_source(&fetcher.sources()[0])
        .await
        .unwrap_err();
    assert!(matches!(err, RatesError::Network(_)), "unexpected error: {}", err);

    let outcome = fetcher.fetch_exchange_rates().await;
    assert_eq!(outcome.origin, RateOrigin::Fallback);
}

#[tokio::test]
async fn test_undecodable_body_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let fetcher =
        RateFetcher::new(vec![source("html", &server, "/html")], Duration::from_secs(5)).unwrap();

    let err = fetcher
        .fetch_from_source(&fetcher.sources()[0])
        .await
        .unwrap_err();
    assert!(matches!(err, RatesError::Parse { .. }));
}

#[tokio::test]
async fn test_latest_sanitizes_rates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "base": "USD",
            "rates": { "EUR": 0.92, "bad": 1.0, "GBP": -3 }
        })))
        .mount(&server)
        .await;

    let fetcher =
        RateFetcher::new(vec![source("only", &server, "/latest")], Duration::from_secs(5))
            .unwrap();

    let set = fetcher.latest().await.unwrap();
    assert_eq!(set.base, "USD");
    assert_eq!(set.rates.len(), 2);
    assert_eq!(set.rate("USD"), Some(1.0));
    assert_eq!(set.rate("EUR"), Some(0.92));
}

#[tokio::test]
async fn test_latest_rejects_unusable_identity_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "base": "USD",
            "rates": { "eur": 0.92 }
        })))
        .mount(&server)
        .await;

    let mut only = source("only", &server, "/latest");
    only.transform = SourceTransform::Identity;
    let fetcher = RateFetcher::new(vec![only], Duration::from_secs(5)).unwrap();

    let err = fetcher.latest().await.unwrap_err();
    assert!(matches!(err, RatesError::Rejected(_)));
}
