//! End-to-end API flows against fake embedding and LLM providers

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use qa_agent::{
    providers::{EmbeddingProvider, LlmProvider, LocalVectorStore},
    retrieval::VectorStore,
    server::{state::AppState, QaServer},
    QaConfig, Result,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const KEYWORDS: [&str; 4] = ["discount", "shipping", "payment", "button"];
const BOUNDARY: &str = "qa-agent-test-boundary";

/// Embeds text as keyword counts
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS.iter().map(|k| lower.matches(k).count() as f32).collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORDS.len()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Returns a canned response and records every call
struct ScriptedLlm {
    response: String,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedLlm {
    fn new(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: response.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        self.calls
            .lock()
            .push((prompt.to_string(), system_prompt.map(str::to_string)));
        Ok(self.response.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }
}

fn app_state(llm: Option<Arc<ScriptedLlm>>) -> AppState {
    let store = LocalVectorStore::new(Arc::new(VectorStore::in_memory(KEYWORDS.len())));
    AppState::with_providers(
        QaConfig::default(),
        Arc::new(KeywordEmbedder),
        Arc::new(store),
        llm.map(|llm| llm as Arc<dyn LlmProvider>),
    )
}

fn router(state: &AppState) -> Router {
    QaServer::with_state(state.clone()).build_router()
}

fn multipart(files: &[(&str, &str)]) -> Request<Body> {
    multipart_to("/api/upload/documents", "files", files)
}

fn multipart_to(uri: &str, field: &str, files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (filename, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

const PRODUCT_SPECS: &str = "# Product Specs\n\nThe discount code SAVE15 gives 15% off.\n\nStandard shipping is free. Express shipping costs $10.";
const CHECKOUT: &str = "<html><body><input id=\"discount-code\" name=\"code\"><button id=\"pay-now\">Pay</button></body></html>";

#[tokio::test]
async fn root_and_health() {
    let state = app_state(None);
    let app = router(&state);

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "QA Agent API"}));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // no LLM configured
    let response = app.clone().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cases_require_documents() {
    let state = app_state(Some(ScriptedLlm::new("[]")));
    let app = router(&state);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/generate/test-cases", json!({"query": "discounts"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "empty_knowledge_base");
    assert_eq!(
        body["error"]["message"],
        "Knowledge base is empty. Please upload documents first."
    );
}

#[tokio::test]
async fn upload_reports_each_file() {
    let state = app_state(None);
    let app = router(&state);

    let (status, body) = send(
        &app,
        multipart(&[("product_specs.md", PRODUCT_SPECS), ("tool.exe", "MZ")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["filename"], "product_specs.md");
    assert_eq!(results[0]["status"], "success");
    assert!(results[0]["chunks_created"].as_u64().unwrap() >= 1);
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[1]["message"], "Unsupported file type: .exe");

    let (_, stats) = send(&app, get("/api/stats")).await;
    assert_eq!(stats["knowledge_base"]["unique_sources"], 1);
    assert_eq!(stats["html_files"], json!([]));

    let (_, sources) = send(&app, get("/api/sources")).await;
    assert_eq!(sources, json!({"sources": ["product_specs.md"]}));

    let (status, search) = send(&app, get("/api/search?query=shipping%20cost&n_results=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(search["query"], "shipping cost");
    let hits = search["results"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0]["content"].as_str().unwrap().contains("Express shipping"));
    assert_eq!(hits[0]["metadata"]["source_document"], "product_specs.md");
}

#[tokio::test]
async fn generates_grounded_test_cases() {
    let llm = ScriptedLlm::new(
        r#"Here are the test cases:
[{"test_id": "TC-001", "feature": "Discount Code", "test_steps": ["Enter SAVE15"], "grounded_in": "product_specs.md"}]"#,
    );
    let state = app_state(Some(llm.clone()));
    let app = router(&state);
    send(&app, multipart(&[("product_specs.md", PRODUCT_SPECS)])).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/generate/test-cases",
            json!({"query": "discount code", "n_context": 3}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parse_error"], false);
    assert_eq!(body["test_cases"][0]["test_id"], "TC-001");
    assert_eq!(body["sources_used"], json!(["product_specs.md"]));
    assert!(body["raw_response"].as_str().unwrap().starts_with("Here are"));

    let calls = llm.calls.lock();
    assert_eq!(calls.len(), 1);
    let (prompt, system) = &calls[0];
    assert!(prompt.contains("USER REQUEST: discount code"));
    assert!(prompt.contains("[Source: product_specs.md]"));
    assert!(system.as_deref().unwrap().contains("expert QA engineer"));
}

#[tokio::test]
async fn unparsable_test_cases_are_flagged() {
    let state = app_state(Some(ScriptedLlm::new("Sorry, I can't do that.")));
    let app = router(&state);
    send(&app, multipart(&[("product_specs.md", PRODUCT_SPECS)])).await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/generate/test-cases", json!({"query": "shipping"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parse_error"], true);
    assert_eq!(body["test_cases"], json!([]));
    assert_eq!(body["raw_response"], "Sorry, I can't do that.");
}

#[tokio::test]
async fn generation_without_llm_is_unavailable() {
    let state = app_state(None);
    let app = router(&state);
    send(&app, multipart(&[("product_specs.md", PRODUCT_SPECS)])).await;

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/generate/test-cases", json!({"query": "shipping"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "config_error");
}

#[tokio::test]
async fn selenium_script_from_uploaded_page() {
    let llm = ScriptedLlm::new("Script:\n```python\nfrom selenium import webdriver\n```\nEnjoy");
    let state = app_state(Some(llm.clone()));
    let app = router(&state);

    let (status, upload) = send(
        &app,
        multipart_to("/api/upload/html", "file", &[("checkout.html", CHECKOUT)]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upload["html_stored"], true);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/generate/selenium-script",
            json!({"test_case": {"test_id": "TC-007", "feature": "Pay button"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "test_case_id": "TC-007", "script": "from selenium import webdriver"})
    );

    let calls = llm.calls.lock();
    let (prompt, system) = &calls[0];
    assert!(prompt.contains(&format!("HTML STRUCTURE (use these exact selectors):\n{}", CHECKOUT)));
    assert!(system.as_deref().unwrap().contains("Selenium automation engineer"));

    let (_, stats) = send(&app, get("/api/stats")).await;
    assert_eq!(stats["html_files"], json!(["checkout.html"]));
}

#[tokio::test]
async fn selenium_script_accepts_numeric_test_id() {
    let llm = ScriptedLlm::new("driver.get('checkout.html')");
    let state = app_state(Some(llm.clone()));
    state.store_html("checkout.html", CHECKOUT.to_string());
    let app = router(&state);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/generate/selenium-script",
            json!({"test_case": {"test_id": 12, "feature": "Pay button", "test_steps": ["Click pay", 2]}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["test_case_id"], "12");

    let calls = llm.calls.lock();
    assert!(calls[0].0.contains("\"test_id\": 12"));
}

#[tokio::test]
async fn selenium_script_falls_back_to_stored_chunks() {
    let llm = ScriptedLlm::new("driver.quit()");
    let state = app_state(Some(llm.clone()));
    state
        .ingest("checkout.html", CHECKOUT.as_bytes().to_vec())
        .await
        .unwrap();
    let app = router(&state);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/generate/selenium-script",
            json!({"test_case": {"feature": "Discount"}, "html_filename": "checkout.html"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["test_case_id"], "unknown");
    assert_eq!(body["script"], "driver.quit()");
    assert!(llm.calls.lock()[0].0.contains("HTML STRUCTURE FOR checkout.html"));
}

#[tokio::test]
async fn selenium_script_for_missing_page() {
    let state = app_state(Some(ScriptedLlm::new("")));
    let app = router(&state);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/generate/selenium-script",
            json!({"test_case": {"test_id": "TC-001"}, "html_filename": "missing.html"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "HTML file 'missing.html' not found");
}

#[tokio::test]
async fn clear_drops_documents_and_pages() {
    let state = app_state(None);
    let app = router(&state);
    send(&app, multipart(&[("product_specs.md", PRODUCT_SPECS)])).await;
    send(
        &app,
        multipart_to("/api/upload/html", "file", &[("checkout.html", CHECKOUT)]),
    )
    .await;

    let (status, body) = send(&app, json_request(Method::DELETE, "/api/clear", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Knowledge base cleared");

    let (_, build) = send(&app, json_request(Method::POST, "/api/build-knowledge-base", json!({}))).await;
    assert_eq!(build["message"], "Knowledge base is ready");
    assert_eq!(build["stats"]["total_chunks"], 0);
    assert!(state.html_files().is_empty());
}
