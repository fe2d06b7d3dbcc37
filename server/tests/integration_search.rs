use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lexis_core::{load_corpus, SearchConfig};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_app() -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    fs::write(
        &path,
        concat!(
            "{\"pid\": \"P1\", \"title\": \"Blue Running Shoes\", \"description\": \"Comfortable sport shoe\", \"selling_price\": \"2,499\"}\n",
            "{\"pid\": \"P2\", \"title\": \"Red Dress\", \"description\": null, \"average_rating\": 4.1}\n",
            "{\"pid\": \"P3\", \"title\": \"Leather Belt\", \"description\": \"Pairs well with shoes\"}\n",
        ),
    )
    .unwrap();
    let corpus = load_corpus(&path).unwrap();
    server::build_app(corpus, SearchConfig::default()).unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, body) = call(build_tiny_app(), "/search?q=cheap%20shoes&k=5&search_id=42").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["pid"], "P1");
    assert_eq!(arr[1]["pid"], "P3");
    assert_eq!(arr[0]["rank"], 1);
    assert_eq!(arr[0]["url"], "doc_details?pid=P1&search_id=42&rank=1");
    assert_eq!(arr[0]["price"], 2499.0);
    assert!(arr[0]["score"].as_f64().unwrap() >= arr[1]["score"].as_f64().unwrap());
    assert_eq!(arr[1]["snippet"], "Pairs well with <em>shoes</em>");
    assert_eq!(json["search_id"], "42");
}

#[tokio::test]
async fn search_respects_k_and_generates_ids() {
    let (status, body) = call(build_tiny_app(), "/search?q=shoes&k=1").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    // P1 and P3 both mention shoes; only the top one is returned
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["search_id"], "1");
}

#[tokio::test]
async fn no_match_is_an_empty_list() {
    let (status, body) = call(build_tiny_app(), "/search?q=laptop").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn doc_details_and_missing_doc() {
    let app = build_tiny_app();
    let (status, body) = call(app.clone(), "/doc/P2?search_id=9&rank=3").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["title"], "Red Dress");
    assert_eq!(json["description"], "");
    assert_eq!(json["rating"], 4.1);
    assert_eq!(json["rank"], 3);

    let (status, _) = call(app, "/doc/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health() {
    let (status, body) = call(build_tiny_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}
