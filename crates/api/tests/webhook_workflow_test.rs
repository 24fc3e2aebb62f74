use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use sigrelay_api::server::{AppState, build_router};
use sigrelay_api::types::{ApiErrorResponse, WebhookRequest, WebhookResponse};
use sigrelay_cache::mem::MemDedupStore;
use sigrelay_core::cache::port::DedupStore;
use sigrelay_core::common::time::FakeClockProvider;
use sigrelay_core::dedup::Deduplicator;
use sigrelay_core::notify::error::NotifyError;
use sigrelay_core::notify::port::{Delivery, Notifier};

const SECRET: &str = "test_secret";

/// 记录所有发送内容的模拟通知器，可切换为失败模式
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<Delivery, NotifyError> {
        self.sent.lock().await.push(message.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Platform("Telegram API error (500): boom".into()));
        }
        Ok(Delivery {
            message_id: Some(1),
            response: json!({"ok": true}),
        })
    }
}

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<FakeClockProvider>,
    store: Arc<MemDedupStore>,
}

impl TestServer {
    async fn post(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/webhook", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    async fn sent_count(&self) -> usize {
        self.notifier.sent.lock().await.len()
    }
}

// 帮助函数：在随机端口启动测试服务器
async fn spawn_test_server() -> TestServer {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
    // 工作区内 reqwest 可能启用 rustls-no-provider，需先安装加密提供者
    let _ = rustls::crypto::ring::default_provider().install_default();

    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let store = Arc::new(MemDedupStore::new());

    let state = AppState {
        secret: Arc::from(SECRET),
        deduplicator: Deduplicator::new(store.clone()),
        notifier: notifier.clone(),
        clock: clock.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        notifier,
        clock,
        store,
    }
}

fn signal(symbol: &str, action: &str) -> Value {
    serde_json::to_value(WebhookRequest {
        secret: SECRET.to_string(),
        symbol: Some(symbol.to_string()),
        action: Some(action.to_string()),
        timeframe: Some("15m".to_string()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_liveness() {
    let server = spawn_test_server().await;
    let res = server.client.get(&server.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Telegram Signal Bot is running");
}

#[tokio::test]
async fn test_full_signal_is_formatted_and_sent() {
    let server = spawn_test_server().await;

    let body = serde_json::to_value(WebhookRequest {
        secret: SECRET.to_string(),
        symbol: Some("BTCUSD".to_string()),
        action: Some("sell".to_string()),
        exchange: Some("BINANCE".to_string()),
        timeframe: Some("15m".to_string()),
        expiry_minutes: Some(30.0),
        confidence: Some(0.82),
        note: Some("breakout".to_string()),
    })
    .unwrap();

    let res = server.post(&body).await;
    assert_eq!(res.status(), StatusCode::OK);
    let payload: Value = res.json().await.unwrap();
    assert_eq!(payload, json!({"ok": true, "sent": true}));

    let sent = server.notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        "🔴 *SELL SIGNAL!* 🔴\n\
         *BTCUSD* BINANCE\n\
         Timeframe: `15m`\n\
         Suggested expiry: 30.0 min\n\
         Confidence: 82%\n\
         Note: breakout\n\
         Timestamp: 2024-06-01 12:00:00 UTC"
    );
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let server = spawn_test_server().await;

    let res = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .header("content-type", "text/plain")
        .body(format!("secret={}", SECRET))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: ApiErrorResponse = res.json().await.unwrap();
    assert!(!err.ok);
    assert_eq!(err.error, "Expected JSON payload");

    // 声明为 JSON 但内容无法解析
    let res = server
        .client
        .post(format!("{}/webhook", server.base_url))
        .header("content-type", "application/json")
        .body("{\"secret\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err, json!({"ok": false, "error": "Expected JSON payload"}));

    assert_eq!(server.sent_count().await, 0);
}

#[tokio::test]
async fn test_secret_mismatch_is_forbidden() {
    let server = spawn_test_server().await;

    let mut body = signal("ETHUSD", "buy");
    body["secret"] = json!("wrong");
    let res = server.post(&body).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err, json!({"ok": false, "error": "Invalid secret"}));

    // 缺失密钥
    let res = server.post(&json!({"symbol": "ETHUSD", "action": "buy"})).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // 非字符串密钥
    let res = server.post(&json!({"secret": 12345})).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    assert_eq!(server.sent_count().await, 0);
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn test_duplicates_within_window_are_skipped() {
    let server = spawn_test_server().await;
    let body = signal("BTCUSD", "buy");

    let res = server.post(&body).await;
    let first: WebhookResponse = res.json().await.unwrap();
    assert_eq!(first, WebhookResponse::sent());

    server.clock.advance(Duration::seconds(5));
    let res = server.post(&body).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second: Value = res.json().await.unwrap();
    assert_eq!(second, json!({"ok": true, "skipped": "duplicate"}));
    assert_eq!(server.sent_count().await, 1);

    // 不同 action 大小写视为不同 key
    let res = server.post(&signal("BTCUSD", "BUY")).await;
    let third: WebhookResponse = res.json().await.unwrap();
    assert_eq!(third, WebhookResponse::sent());
    assert_eq!(server.sent_count().await, 2);
}

#[tokio::test]
async fn test_absent_and_empty_timeframe_are_different_keys() {
    let server = spawn_test_server().await;

    let absent = json!({"secret": SECRET, "symbol": "X", "action": "buy"});
    let res = server.post(&absent).await;
    let first: WebhookResponse = res.json().await.unwrap();
    assert_eq!(first, WebhookResponse::sent());

    let empty = json!({"secret": SECRET, "symbol": "X", "action": "buy", "timeframe": ""});
    let res = server.post(&empty).await;
    let second: WebhookResponse = res.json().await.unwrap();
    assert_eq!(second, WebhookResponse::sent());
    assert_eq!(server.sent_count().await, 2);

    // null 与缺失等价
    let null = json!({"secret": SECRET, "symbol": "X", "action": "buy", "timeframe": null});
    let res = server.post(&null).await;
    let third: WebhookResponse = res.json().await.unwrap();
    assert_eq!(third, WebhookResponse::duplicate());
    assert!(server.store.last_seen("X|buy|None").await.unwrap().is_some());
}

#[tokio::test]
async fn test_same_key_after_window_is_sent_again() {
    let server = spawn_test_server().await;
    let body = signal("XAUUSD", "sell");

    server.post(&body).await;
    server.clock.advance(Duration::seconds(6));
    let res = server.post(&body).await;
    let again: WebhookResponse = res.json().await.unwrap();
    assert_eq!(again, WebhookResponse::sent());
    assert_eq!(server.sent_count().await, 2);
}

#[tokio::test]
async fn test_delivery_failure_consumes_dedup_slot() {
    let server = spawn_test_server().await;
    server.notifier.fail.store(true, Ordering::SeqCst);
    let body = signal("SOLUSD", "buy");

    let res = server.post(&body).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let err: Value = res.json().await.unwrap();
    assert_eq!(
        err,
        json!({"ok": false, "error": "Failed to deliver notification"})
    );
    assert!(
        server
            .store
            .last_seen("SOLUSD|buy|15m")
            .await
            .unwrap()
            .is_some()
    );

    // 恢复后窗口内重试仍被视为重复
    server.notifier.fail.store(false, Ordering::SeqCst);
    server.clock.advance(Duration::seconds(1));
    let res = server.post(&body).await;
    let retry: WebhookResponse = res.json().await.unwrap();
    assert_eq!(retry, WebhookResponse::duplicate());
    assert_eq!(server.sent_count().await, 1);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let server = spawn_test_server().await;
    let res = server
        .client
        .get(format!("{}/api-docs/openapi.json", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: Value = res.json().await.unwrap();
    assert!(doc["paths"].get("/webhook").is_some());
    assert!(doc["paths"].get("/").is_some());
}
