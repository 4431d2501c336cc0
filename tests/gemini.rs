use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use lifesync::errors::{EMPTY_INSIGHT_MESSAGE, INSIGHT_FAILURE_MESSAGE, INSUFFICIENT_DATA_MESSAGE};
use lifesync::{AppState, Config, DailyRecordPatch, GeminiClient, Insight, InsightError, LogStore, TextGenerator};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

const API_KEY: &str = "test-key";
const STUB_REPLY: &str = "### 🔎 Reality Check\nStudy beat scrolling today.";

struct StubService {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubService {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

// Runs on its own thread so every #[tokio::test] runtime can share it.
static SERVICE: Lazy<StubService> = Lazy::new(|| {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind stub port");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().expect("stub address");
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/v1beta/models/:call", post(generate))
        .with_state(Arc::clone(&hits));

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("stub runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("stub server");
        });
    });

    StubService {
        base_url: format!("http://{addr}/v1beta"),
        hits,
    }
});

async fn generate(
    State(hits): State<Arc<AtomicUsize>>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    hits.fetch_add(1, Ordering::SeqCst);

    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }
    let prompt_ok = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .is_some_and(|text| text.contains("Tomorrow's Mission"));
    let config_ok = body["generationConfig"]["thinkingConfig"]["thinkingBudget"] == 0;
    if !prompt_ok || !config_ok {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad body" })));
    }

    match call.strip_suffix(":generateContent") {
        Some("stub-ok") => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": STUB_REPLY }] } }]
            })),
        ),
        Some("stub-empty") => (StatusCode::OK, Json(json!({ "candidates": [] }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown model" }))),
    }
}

fn client(model: &str, api_key: Option<&str>) -> GeminiClient {
    GeminiClient::new(&Config {
        api_base: SERVICE.base_url.clone(),
        api_key: api_key.map(str::to_string),
        model: model.to_string(),
        ..Config::default()
    })
}

fn state_with_days(days: &[&str]) -> AppState {
    let mut store = LogStore::new("unused/lifesync_logs.json");
    for day in days {
        store
            .apply(
                day,
                DailyRecordPatch {
                    study_minutes: Some(60),
                    instagram_minutes: Some(20),
                    ..Default::default()
                },
            )
            .unwrap();
    }
    AppState::new(Config::default(), store)
}

#[tokio::test]
async fn gemini_returns_candidate_text() {
    let _guard = TEST_LOCK.lock().await;
    let text = client("stub-ok", Some(API_KEY))
        .generate("### ⚔️ Tomorrow's Mission")
        .await
        .unwrap();
    assert_eq!(text, STUB_REPLY);
}

#[tokio::test]
async fn insight_flows_through_app_state() {
    let _guard = TEST_LOCK.lock().await;
    let state = state_with_days(&["2024-05-02", "2024-05-01"]);

    let insight = state
        .generate_insight(&client("stub-ok", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(insight, Insight::Generated(STUB_REPLY.to_string()));

    let saved = state.save_insight("2024-05-02", insight.text()).await.unwrap();
    assert_eq!(saved.ai_mentor_insight.as_deref(), Some(STUB_REPLY));
    assert_eq!(saved.study_minutes, 60);
}

#[tokio::test]
async fn empty_candidates_use_empty_fallback() {
    let _guard = TEST_LOCK.lock().await;
    let state = state_with_days(&["2024-05-01"]);
    let gemini = client("stub-empty", Some(API_KEY));

    let err = state.generate_insight(&gemini).await.unwrap_err();
    assert!(matches!(err, InsightError::EmptyResponse));
    assert_eq!(state.request_insight(&gemini).await, EMPTY_INSIGHT_MESSAGE);
}

#[tokio::test]
async fn rejected_key_uses_failure_fallback() {
    let _guard = TEST_LOCK.lock().await;
    lifesync::logging::init();
    let state = state_with_days(&["2024-05-01"]);
    let gemini = client("stub-ok", Some("wrong-key"));

    let err = state.generate_insight(&gemini).await.unwrap_err();
    assert!(matches!(err, InsightError::Status { status: 401, .. }));
    assert!(err.is_call_failure());
    assert_eq!(state.request_insight(&gemini).await, INSIGHT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn empty_store_never_calls_service() {
    let _guard = TEST_LOCK.lock().await;
    let state = state_with_days(&[]);
    let before = SERVICE.hits();

    let text = state.request_insight(&client("stub-ok", Some(API_KEY))).await;
    assert_eq!(text, INSUFFICIENT_DATA_MESSAGE);
    assert_eq!(SERVICE.hits(), before);
}

#[tokio::test]
async fn missing_key_never_calls_service() {
    let _guard = TEST_LOCK.lock().await;
    let state = state_with_days(&["2024-05-01"]);
    let before = SERVICE.hits();

    let text = state.request_insight(&client("stub-ok", None)).await;
    assert_eq!(text, INSIGHT_FAILURE_MESSAGE);
    assert_eq!(SERVICE.hits(), before);
}
