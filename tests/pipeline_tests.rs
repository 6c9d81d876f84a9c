//! End-to-end pipeline tests: acquisition through normalization through the
//! feed envelope, against a mock server standing in for both the GraphQL
//! endpoint and the flat-file host.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gfn_datafeed::{CatalogClient, CatalogConfig, CatalogError};

const PAGE_SIZE: u32 = 3;

fn create_test_client(server: &MockServer) -> CatalogClient {
    let config = CatalogConfig::builder()
        .graphql_url(format!("{}/graphql", server.uri()))
        .flat_file_url(format!("{}/gfnpc.json", server.uri()))
        .page_size(PAGE_SIZE)
        .max_attempts(2)
        .initial_backoff(Duration::from_millis(1))
        .build()
        .unwrap();
    CatalogClient::new(config)
}

/// Introspection is unavailable and the first template probe passes.
async fn mount_selector_preamble(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("__schema"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("first: 1,"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "apps": { "items": [] } } })),
        )
        .mount(server)
        .await;
}

async fn mount_single_page(server: &MockServer, items: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains(format!("first: {PAGE_SIZE},")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "apps": {
                    "numberReturned": items.len(),
                    "pageInfo": {
                        "hasNextPage": false,
                        "endCursor": "",
                        "totalCount": items.len()
                    },
                    "items": items
                }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sparse_record_produces_minimal_entity() {
    let server = MockServer::start().await;
    mount_selector_preamble(&server).await;
    mount_single_page(
        &server,
        vec![json!({
            "title": "Alpha",
            "id": "123",
            "variants": [
                { "appStore": "STEAM", "gfn": { "status": "AVAILABLE" } }
            ]
        })],
    )
    .await;

    let client = create_test_client(&server);
    let feed = client.build_feed().await.unwrap();
    let value = serde_json::to_value(&feed).unwrap();

    let game = &value["dataFeedElement"][0];
    assert_eq!(game["name"], "Alpha");
    assert_eq!(game["@id"], "gfn-123");
    assert_eq!(game["@type"], "VideoGame");
    assert_eq!(game["applicationCategory"], "Game");

    // Absent source data is omitted, never serialized as null.
    assert!(game.get("image").is_none());
    assert!(game.get("contentRating").is_none());
    assert!(game.get("description").is_none());
    assert!(game.get("publisher").is_none());

    // The primary streaming edition plus one surviving variant.
    let editions = game["exampleOfWork"].as_array().unwrap();
    assert_eq!(editions.len(), 2);
    assert_eq!(editions[0]["name"], "Alpha (GeForce NOW)");
    assert_eq!(editions[1]["name"], "Alpha (STEAM)");
}

#[tokio::test]
async fn test_rich_record_is_fully_mapped() {
    let server = MockServer::start().await;
    mount_selector_preamble(&server).await;
    mount_single_page(
        &server,
        vec![json!({
            "id": "9",
            "cmsId": "cms-9",
            "title": "Portal",
            "longDescription": "A puzzle game.",
            "publisherName": "Valve",
            "developerName": "Valve",
            "genres": ["Puzzle"],
            "contentRatings": [
                { "type": "PEGI", "categoryKey": "12" },
                { "type": "ESRB", "categoryKey": "EVERYONE_10" }
            ],
            "images": { "GAME_BOX_ART": "https://img.example/box.jpg" },
            "computedValues": { "earliestReleaseDate": "2007-10-10" },
            "maxOnlinePlayers": 2,
            "variants": [
                { "appStore": "STEAM", "gfn": { "status": "RETIRED" } }
            ]
        })],
    )
    .await;

    let client = create_test_client(&server);
    let feed = client.build_feed().await.unwrap();
    let value = serde_json::to_value(&feed).unwrap();

    let game = &value["dataFeedElement"][0];
    assert_eq!(game["@id"], "gfn-9");
    assert!(game["url"]
        .as_str()
        .unwrap()
        .ends_with("deeplink?game-id=cms-9"));
    assert_eq!(game["contentRating"], "ESRB EVERYONE_10");
    assert_eq!(game["image"], "https://img.example/box.jpg");
    assert_eq!(game["publisher"]["name"], "Valve");
    assert_eq!(game["contributor"]["roleName"], "developer");
    assert_eq!(game["datePublished"], "2007-10-10");
    assert_eq!(game["numberOfPlayers"], 2);

    // The retired variant is filtered; only the streaming edition remains.
    assert_eq!(game["exampleOfWork"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_graphql_shapes_fall_back_to_flat_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gfnpc.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 100, "title": "Flat Game", "publisher": "Pub" }
        ])))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let acquisition = client.fetch_games().await.unwrap();

    assert!(acquisition.complete);
    assert_eq!(acquisition.records.len(), 1);
    assert_eq!(acquisition.records[0]["title"], "Flat Game");
}

#[tokio::test]
async fn test_flat_records_normalize_through_the_same_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gfnpc.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 100,
                "title": "Flat Game",
                "publisher": "Pub",
                "steamUrl": "https://store.steampowered.com/app/100"
            }
        ])))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let feed = client.build_feed().await.unwrap();
    let value = serde_json::to_value(&feed).unwrap();

    let game = &value["dataFeedElement"][0];
    assert_eq!(game["@id"], "gfn-100");
    assert_eq!(game["name"], "Flat Game");
    assert_eq!(game["publisher"]["name"], "Pub");
    let same_as = game["sameAs"].as_array().unwrap();
    assert!(same_as
        .iter()
        .any(|url| url == "https://store.steampowered.com/app/100"));
}

#[tokio::test]
async fn test_graphql_failure_before_items_falls_back() {
    let server = MockServer::start().await;
    // A shape is selected, but every page request then fails.
    mount_selector_preamble(&server).await;
    Mock::given(method("GET"))
        .and(path("/gfnpc.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "title": "Flat" }])),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let acquisition = client.fetch_games().await.unwrap();

    assert!(acquisition.complete);
    assert_eq!(acquisition.records.len(), 1);
}

#[tokio::test]
async fn test_partial_pagination_is_flagged_not_retried_as_flat() {
    let server = MockServer::start().await;
    mount_selector_preamble(&server).await;
    // First page succeeds with a continuation; the next page never resolves.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("after: \\\"\\\""))
        .and(body_string_contains(format!("first: {PAGE_SIZE},")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "apps": {
                    "numberReturned": 2,
                    "pageInfo": {
                        "hasNextPage": true,
                        "endCursor": "cur-1",
                        "totalCount": 4
                    },
                    "items": [
                        { "id": "a", "title": "A" },
                        { "id": "b", "title": "B" }
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let acquisition = client.fetch_games().await.unwrap();

    assert!(!acquisition.complete);
    assert_eq!(acquisition.records.len(), 2);
}

#[tokio::test]
async fn test_total_failure_surfaces_catalog_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gfnpc.json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client.fetch_games().await.unwrap_err();

    assert!(matches!(error, CatalogError::AllPathsExhausted(_)));
}
