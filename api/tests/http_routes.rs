use std::{future::Future, path::Path, pin::Pin, sync::Arc};

use api::{core::app_state::AppState, router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use faq_qa::{AnswerGenerator, PipelineBuilder, PipelineHandle, QaConfig, QaError};
use faq_store::{HashEmbedder, StoreConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

struct CannedGenerator;

impl AnswerGenerator for CannedGenerator {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>> {
        Box::pin(async { Ok("X is Y, according to the FAQ.".to_string()) })
    }

    fn model_version(&self) -> &str {
        "canned-1"
    }
}

fn app(root: &Path) -> Router {
    let builder = PipelineBuilder::new(
        StoreConfig::local(root.join("chroma_store"), "faqs"),
        QaConfig::default(),
        Arc::new(HashEmbedder::new(64)),
        Arc::new(CannedGenerator),
    );
    let state = AppState::new(Arc::new(PipelineHandle::new(builder)), None);
    router(Arc::new(state))
}

fn write_csv(root: &Path, body: &str) -> String {
    let p = root.join("faq.csv");
    std::fs::write(&p, body).unwrap();
    p.to_string_lossy().into_owned()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn ingest_ask_list_delete_flow() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let csv = write_csv(
        tmp.path(),
        "Question,Answer\nWhat is X?,X is Y.\nWhat is X?,X is Y.\nHow do refunds work?,Within 30 days.\n",
    );

    let (status, _, body) = send(&app, post_json("/ingest_csv", json!({ "file_path": csv }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["rows"], 2);
    assert_eq!(body["rows_read"], 3);
    assert_eq!(body["skipped_duplicates"], 1);

    let (status, _, body) = send(
        &app,
        post_json("/ask_question", json!({ "question": "What is X?", "top_k": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["top_faqs"].as_array().unwrap().len(), 1);
    assert_eq!(body["top_faqs"][0]["question"], "What is X?");
    assert_eq!(body["top_faqs"][0]["answer"], "X is Y.");
    assert!(body["top_faqs"][0]["score"].is_number());
    assert_eq!(body["model_answer"], "X is Y, according to the FAQ.");
    assert_eq!(body["model_version"], "canned-1");
    assert!(body["query_timestamp"].is_string());

    let (status, _, body) = send(&app, get("/list_faqs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, _, body) = send(&app, post_json("/delete_faqs", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["message"].is_string());
    assert!(!tmp.path().join("chroma_store").exists());

    let (_, _, body) = send(&app, get("/list_faqs")).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["faqs"], json!([]));

    let (status, _, _) = send(&app, post_json("/delete_faqs", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn ingest_input_errors_are_400() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());

    let (status, headers, body) = send(&app, post_json("/ingest_csv", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(headers.contains_key("x-request-id"));

    let missing = tmp.path().join("nope.csv").to_string_lossy().into_owned();
    let (status, _, body) = send(&app, post_json("/ingest_csv", json!({ "file_path": missing }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INPUT_ERROR");

    let bad = write_csv(tmp.path(), "Question,Reply\nq,r\n");
    let (status, _, body) = send(&app, post_json("/ingest_csv", json!({ "file_path": bad }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Answer"));

    let (_, _, body) = send(&app, get("/list_faqs")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn incremental_mode_skips_known_questions() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let csv = write_csv(tmp.path(), "Question,Answer\nWhat is X?,X is Y.\n");

    for expected in [1, 0] {
        let (status, _, body) = send(
            &app,
            post_json("/ingest_csv", json!({ "file_path": csv, "dedup_mode": "incremental" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], expected);
    }
    let (_, _, body) = send(&app, get("/list_faqs")).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn ask_validates_input() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());

    let (status, _, body) = send(&app, post_json("/ask_question", json!({ "question": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _, body) = send(
        &app,
        post_json("/ask_question", json!({ "question": "q", "top_k": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INPUT_ERROR");
}

#[tokio::test]
async fn ask_on_empty_store_still_answers() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());

    let (status, _, body) = send(&app, post_json("/ask_question", json!({ "question": "Anything?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["top_faqs"], json!([]));
    assert!(!body["model_answer"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_enveloped() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());

    let req = Request::post("/ask_question")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, headers, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn health_reports_ready() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());

    let (status, _, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["backend"], "local");
    assert_eq!(body["model_version"], "canned-1");
    assert_eq!(body["models"], json!([]));
}

#[tokio::test]
async fn health_fails_when_pipeline_cannot_build() {
    let tmp = tempfile::tempdir().unwrap();
    let store_dir = tmp.path().join("chroma_store");
    std::fs::create_dir_all(&store_dir).unwrap();
    std::fs::write(store_dir.join("faqs.jsonl"), "corrupt\n").unwrap();
    let app = app(tmp.path());

    let (status, _, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PROCESSING_ERROR");
}
