use hwwatch_channels::telegram::TelegramSink;
use hwwatch_core::{ChatSink, Notifier, PollError, SentErrorLog};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sink_for(server: &MockServer) -> TelegramSink {
    let url = url::Url::parse(&server.uri()).unwrap();
    TelegramSink::new("123:test-token", "42").with_api_url(url)
}

#[tokio::test]
async fn api_error_surfaces_as_send_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let sink = sink_for(&server);
    assert!(sink.send_text("hello").await.is_err());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .url
        .path()
        .to_ascii_lowercase()
        .ends_with("/bot123:test-token/sendmessage"));
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["chat_id"], 42);
    assert_eq!(body["text"], "hello");
}

#[tokio::test]
async fn notifier_records_telegram_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let notifier = Notifier::new(sink_for(&server));
    let mut log = SentErrorLog::new();
    let err = notifier.notify("status", &mut log).await.unwrap_err();

    assert!(matches!(err, PollError::Send { .. }));
    assert!(log.contains(&err.to_string()));
}
