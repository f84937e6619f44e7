//! HTTP tests for the `/extracted` and `/health` routes.

mod common;

use apidoc_extraction::testing::{docs_page, MockFetcher};
use apidoc_extraction::{ParamStyle, SynthesisOptions};
use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

fn pets_doc() -> Value {
    json!({
        "swagger": "2.0",
        "basePath": "/api",
        "paths": {
            "/pets/{petId}": {
                "parameters": [
                    {"name": "petId", "in": "path", "required": true, "type": "string"}
                ],
                "get": {
                    "parameters": [
                        {"name": "limit", "in": "query", "type": "number"},
                        {"name": "verbose", "in": "query", "type": "boolean"}
                    ]
                },
                "put": {
                    "parameters": [
                        {"name": "pet", "in": "body", "schema": {"$ref": "#/definitions/Pet"}}
                    ]
                }
            }
        },
        "definitions": {
            "Pet": {
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "number"}
                }
            }
        }
    })
}

fn pets_app() -> TestApp {
    TestApp::new(MockFetcher::new().with_page(DOCS_URL, docs_page(&pets_doc())))
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new(MockFetcher::new());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn extracted_returns_one_entry_per_operation() {
    let app = pets_app();

    let (status, body) = app.get(&extracted_uri(DOCS_URL)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "method": "GET",
                "path": "/api/pets/{petId}",
                "body": null,
                "query": {"limit": "<unset>", "verbose": "<unset>"},
                "params": {"petId": null}
            },
            {
                "method": "PUT",
                "path": "/api/pets/{petId}",
                "pet": {"name": "", "age": 0},
                "params": {"petId": null}
            }
        ])
    );
    assert_eq!(app.fetcher.calls(), vec![DOCS_URL.to_string()]);
}

#[tokio::test]
async fn params_query_overrides_configured_style() {
    let app = pets_app();

    let (status, body) = app
        .get(&format!("{}&params=inferred", extracted_uri(DOCS_URL)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["query"], json!({"limit": 0, "verbose": false}));
    assert_eq!(body[0]["params"], json!({"petId": ""}));
}

#[tokio::test]
async fn configured_style_applies_without_override() {
    let fetcher = MockFetcher::new().with_page(DOCS_URL, docs_page(&pets_doc()));
    let app = TestApp::with_options(
        fetcher,
        SynthesisOptions::new().with_param_style(ParamStyle::Inferred),
    );

    let (status, body) = app.get(&extracted_uri(DOCS_URL)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["query"], json!({"limit": 0, "verbose": false}));
}

#[tokio::test]
async fn unknown_params_style_is_bad_request() {
    let app = pets_app();

    let (status, body) = app
        .get(&format!("{}&params=random", extracted_uri(DOCS_URL)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "request");
    assert!(app.fetcher.calls().is_empty());
}

#[tokio::test]
async fn missing_swagger_url_is_bad_request() {
    let app = pets_app();

    for uri in ["/extracted", "/extracted?swaggerUrl=", "/extracted?swaggerUrl=%20%20"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["kind"], "request");
        assert!(body["error"].as_str().unwrap().contains("swaggerUrl"));
    }
    assert!(app.fetcher.calls().is_empty());
}

#[tokio::test]
async fn fetch_failure_is_bad_gateway() {
    let app = TestApp::new(MockFetcher::new().with_status(DOCS_URL, 404));

    let (status, body) = app.get(&extracted_uri(DOCS_URL)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "fetch");
    assert_eq!(body["error"], "fetch failed");
}

#[tokio::test]
async fn page_without_options_is_unprocessable() {
    let app = TestApp::new(
        MockFetcher::new().with_page(DOCS_URL, "<html><body>No docs here</body></html>"),
    );

    let (status, body) = app.get(&extracted_uri(DOCS_URL)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "extraction");
    assert_eq!(body["error"], "pattern not found");
}

#[tokio::test]
async fn description_without_paths_is_unprocessable() {
    let page = docs_page(&json!({"swagger": "2.0", "info": {"title": "empty"}}));
    let app = TestApp::new(MockFetcher::new().with_page(DOCS_URL, page));

    let (status, body) = app.get(&extracted_uri(DOCS_URL)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "synthesis");
}

#[tokio::test]
async fn posted_page_text_is_synthesized_without_fetching() {
    let app = TestApp::new(MockFetcher::new());
    let page = r#"
        var options = {
          // rendered by the docs middleware
          swaggerDoc: {
            basePath: '/v1',
            paths: { '/ping': { get: {} } },
          },
          customOptions: {},
        };
    "#;

    let (status, body) = app.post_text("/extracted", page).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"method": "GET", "path": "/v1/ping", "body": null}])
    );
    assert!(app.fetcher.calls().is_empty());
}

#[tokio::test]
async fn posted_text_without_options_is_unprocessable() {
    let app = TestApp::new(MockFetcher::new());

    let (status, body) = app.post_text("/extracted", "console.log('hi');").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "extraction");
}
