//! End-to-end search tests: token exchange, search call, normalisation and
//! the diacritic retry, all against one mock upstream.

use std::sync::Arc;

use nominis_search::{
    EuipoConfig, ManualClock, SearchError, SearchQuery, TrademarkSearch, UpstreamFailure,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/trademark-search/trademarks";

async fn upstream() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oidc/accessToken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-xyz", "expires_in": 3600})),
        )
        .mount(&server)
        .await;
    server
}

fn service(server: &MockServer) -> TrademarkSearch {
    let config = EuipoConfig::default()
        .with_base_url(&server.uri())
        .with_credentials("my-id", "my-secret");
    TrademarkSearch::with_clock(config, Arc::new(ManualClock::new(1_700_000_000))).expect("service")
}

fn empty() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"trademarks": [], "totalElements": 0}))
}

#[tokio::test]
async fn normalises_and_filters_upstream_records() {
    let server = upstream().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("text", "Acme"))
        .and(header("authorization", "Bearer tok-xyz"))
        .and(header("x-ibm-client-id", "my-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trademarks": [
                {
                    "applicationNumber": "018000001",
                    "wordMarkSpecification": {"verbalElement": "ACME"},
                    "status": "REGISTERED",
                    "niceClasses": [25, 9],
                    "markFeature": "WORD",
                    "applicationDate": "2020-01-01"
                },
                {
                    "applicationNumber": "018000002",
                    "title": "Acme Cosmetics",
                    "status": "FILED",
                    "niceClasses": [3]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new("Acme")
        .unwrap()
        .with_categories([9, 35])
        .unwrap();
    let result = service(&server).search(&query).await.expect("search");

    assert_eq!(result.query, "Acme");
    assert!(!result.retried);
    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.application_number.as_deref(), Some("018000001"));
    assert_eq!(record.label.as_deref(), Some("ACME"));
    assert_eq!(record.categories, vec![25, 9]);
    assert_eq!(record.registration_date, None);
}

#[tokio::test]
async fn empty_accented_query_retries_exactly_once_without_accents() {
    let server = upstream().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("text", "Nuvilù"))
        .respond_with(empty())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("text", "Nuvilu"))
        .and(query_param("page", "2"))
        .and(query_param("size", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trademarks": [{"applicationNumber": "1", "markText": "NUVILU"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new("Nuvilù")
        .unwrap()
        .with_page(2)
        .with_page_size(25)
        .unwrap();
    let result = service(&server).search(&query).await.expect("search");

    assert!(result.retried);
    assert_eq!(result.query, "Nuvilù");
    assert_eq!(result.effective_text, "Nuvilu");
    assert_eq!(result.records[0].label.as_deref(), Some("NUVILU"));
}

#[tokio::test]
async fn empty_plain_query_is_not_retried() {
    let server = upstream().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(empty())
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new("Acme").unwrap();
    let result = service(&server).search(&query).await.expect("search");
    assert!(result.records.is_empty());
    assert!(!result.retried);
}

#[tokio::test]
async fn rate_limit_is_passed_through_exactly() {
    let server = upstream().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string(r#"{"error":"rate limited"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery::new("Nuvilù").unwrap();
    let err = service(&server).search(&query).await.unwrap_err();
    match err {
        SearchError::UpstreamSearch(UpstreamFailure::Rejected { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, r#"{"error":"rate limited"}"#);
        }
        other => panic!("expected upstream search rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn token_is_reused_across_searches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oidc/accessToken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-xyz", "expires_in": 3600})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(empty())
        .expect(3)
        .mount(&server)
        .await;

    let service = service(&server);
    let query = SearchQuery::new("Acme").unwrap();
    for _ in 0..3 {
        service.search(&query).await.expect("search");
    }
}

#[tokio::test]
async fn auth_rejection_surfaces_before_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_scope"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(empty())
        .expect(0)
        .mount(&server)
        .await;

    let query = SearchQuery::new("Acme").unwrap();
    let err = service(&server).search(&query).await.unwrap_err();
    assert_eq!(err.code(), "UPSTREAM_AUTH");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.body(), Some("invalid_scope"));
}

#[tokio::test]
async fn configured_status_filter_drops_dead_marks() {
    let server = upstream().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trademarks": [
                {"applicationNumber": "1", "status": "EXPIRED"},
                {"applicationNumber": "2", "status": "OPPOSITION"}
            ]
        })))
        .mount(&server)
        .await;

    let config = EuipoConfig::default()
        .with_base_url(&server.uri())
        .with_credentials("my-id", "my-secret")
        .with_live_status_filter();
    let service = TrademarkSearch::new(config).expect("service");
    let result = service
        .search(&SearchQuery::new("Acme").unwrap())
        .await
        .expect("search");
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].application_number.as_deref(), Some("2"));
}
