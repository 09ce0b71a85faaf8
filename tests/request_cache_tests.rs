//! Integration Tests for RequestCache
//!
//! Drives the public service API over a scripted transport that records
//! every request it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use json_request_cache::{
    Headers, Method, Params, RequestCache, RequestError, Transport, TransportError,
    TransportRequest,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

// == Helper Types ==

enum Reply {
    Body(&'static str),
    Fail(&'static str),
}

/// Transport that replays scripted replies, then falls back to a default body.
struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<TransportRequest>>,
    default_body: &'static str,
    delay: Duration,
}

impl ScriptedTransport {
    fn new(default_body: &'static str) -> Arc<Self> {
        Self::with_delay(default_body, Duration::ZERO)
    }

    fn with_delay(default_body: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            default_body,
            delay,
        })
    }

    fn script(self: &Arc<Self>, replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        self.replies.lock().unwrap().extend(replies);
        self.clone()
    }

    fn sent(&self) -> Vec<TransportRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn dispatch_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Body(body)) => Ok(body.to_string()),
            Some(Reply::Fail(message)) => Err(TransportError::Other(message.to_string())),
            None => Ok(self.default_body.to_string()),
        }
    }
}

// == Helper Functions ==

const URL: &str = "https://api.example.com/items";

fn ab() -> Params {
    let mut params = Params::new();
    params.insert("a".to_string(), json!("1"));
    params.insert("b".to_string(), json!("2"));
    params
}

// == Cache Behavior ==

#[tokio::test]
async fn test_cache_disabled_by_default_dispatches_every_call() {
    let transport = ScriptedTransport::new(r#"{"n":1}"#);
    let service = RequestCache::new(transport.clone());

    assert_ok!(service.get(URL, Some(&ab()), None).await);
    assert_ok!(service.get(URL, Some(&ab()), None).await);

    assert_eq!(transport.dispatch_count(), 2);
}

#[tokio::test]
async fn test_cached_response_served_within_ttl() {
    let transport = ScriptedTransport::new(r#"{"n":0}"#).script([Reply::Body(r#"{"n":1}"#)]);
    let service = RequestCache::new(transport.clone());
    service.set_cache(5.0).await;

    let first = service.get(URL, Some(&ab()), None).await.unwrap();
    let second = service.get(URL, Some(&ab()), None).await.unwrap();

    assert_eq!(first, json!({"n": 1}));
    assert_eq!(second, json!({"n": 1}));
    assert_eq!(transport.dispatch_count(), 1);

    let stats = service.stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.stores, 1);
}

#[tokio::test]
async fn test_expired_response_dispatches_again() {
    let transport =
        ScriptedTransport::new(r#"{"n":0}"#).script([Reply::Body(r#"{"n":1}"#), Reply::Body(r#"{"n":2}"#)]);
    let service = RequestCache::new(transport.clone());
    service.set_cache(0.2).await;

    assert_eq!(service.get(URL, None, None).await.unwrap(), json!({"n": 1}));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(service.get(URL, None, None).await.unwrap(), json!({"n": 2}));

    assert_eq!(transport.dispatch_count(), 2);
}

#[tokio::test]
async fn test_different_params_use_different_entries() {
    let transport = ScriptedTransport::new("[]");
    let service = RequestCache::new(transport.clone());
    service.set_cache(60.0).await;

    let mut page2 = Params::new();
    page2.insert("page".to_string(), json!(2));

    assert_ok!(service.get(URL, Some(&ab()), None).await);
    assert_ok!(service.get(URL, Some(&page2), None).await);
    assert_ok!(service.get(URL, None, None).await);
    assert_ok!(service.get(URL, Some(&ab()), None).await);

    assert_eq!(transport.dispatch_count(), 3);
    assert_eq!(service.stats().await.total_entries, 3);
}

#[tokio::test]
async fn test_disabling_cache_hides_entries() {
    let transport = ScriptedTransport::new(r#"{"ok":true}"#);
    let service = RequestCache::new(transport.clone());
    service.set_cache(60.0).await;
    assert_ok!(service.get(URL, None, None).await);

    service.set_cache(0.0).await;
    assert_ok!(service.get(URL, None, None).await);
    assert_eq!(transport.dispatch_count(), 2, "Disabled cache is bypassed");
    assert_eq!(service.stats().await.total_entries, 1, "Entries are kept while disabled");

    service.set_cache(60.0).await;
    assert_ok!(service.get(URL, None, None).await);
    assert_eq!(transport.dispatch_count(), 2, "Re-enabled cache serves the kept entry");
}

#[tokio::test]
async fn test_clear_drops_entries() {
    let transport = ScriptedTransport::new("{}");
    let service = RequestCache::new(transport.clone());
    service.set_cache(60.0).await;

    assert_ok!(service.get(URL, None, None).await);
    service.clear().await;
    assert_ok!(service.get(URL, None, None).await);

    assert_eq!(transport.dispatch_count(), 2);
}

// == Sweep Scheduling ==

#[tokio::test(start_paused = true)]
async fn test_reconfiguring_ttl_keeps_a_single_sweep() {
    let service = RequestCache::new(ScriptedTransport::new("{}"));

    service.set_cache(1.0).await;
    service.set_cache(1.0).await;
    service.set_cache(1.0).await;
    tokio::time::sleep(Duration::from_millis(3500)).await;

    assert_eq!(service.stats().await.sweeps, 3, "One sweep per second, not three");
}

#[tokio::test(start_paused = true)]
async fn test_new_ttl_reschedules_sweep() {
    let service = RequestCache::new(ScriptedTransport::new("{}"));

    service.set_cache(1.0).await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(service.stats().await.sweeps, 1);

    service.set_cache(10.0).await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(service.stats().await.sweeps, 1, "Old 1s schedule was cancelled");

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(service.stats().await.sweeps, 2);
}

#[tokio::test(start_paused = true)]
async fn test_disabling_cache_stops_sweep() {
    let service = RequestCache::new(ScriptedTransport::new("{}"));

    service.set_cache(1.0).await;
    service.set_cache(-1.0).await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(service.stats().await.sweeps, 0);
}

// == Request Building ==

#[tokio::test]
async fn test_get_moves_params_into_query() {
    let transport = ScriptedTransport::new("{}");
    let service = RequestCache::new(transport.clone());

    assert_ok!(service.get(URL, Some(&ab()), None).await);

    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, format!("{URL}?&a=1&b=2"));
    assert_eq!(sent[0].body, None);
}

#[tokio::test]
async fn test_post_sends_params_as_body() {
    let transport = ScriptedTransport::new("{}");
    let service = RequestCache::new(transport.clone());

    assert_ok!(service.post(URL, Some(&ab()), None).await);

    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].url, URL);
    assert_eq!(sent[0].body, Some(ab()));
}

#[tokio::test]
async fn test_only_non_empty_headers_are_sent() {
    let transport = ScriptedTransport::new("{}");
    let service = RequestCache::new(transport.clone());
    let mut headers = Headers::new();
    headers.insert("Authorization".to_string(), "Bearer t0k3n".to_string());
    headers.insert("X-Unset".to_string(), String::new());

    assert_ok!(service.post(URL, None, Some(&headers)).await);

    let sent = transport.sent();
    assert_eq!(
        sent[0].headers,
        vec![("Authorization".to_string(), "Bearer t0k3n".to_string())]
    );
    assert_eq!(sent[0].body, None);
}

#[tokio::test]
async fn test_timeout_applies_to_later_requests_only() {
    let transport = ScriptedTransport::new("{}");
    let service = RequestCache::new(transport.clone());

    assert_ok!(service.get(URL, None, None).await);
    service.set_timeout(10.0).await;
    assert_ok!(service.get(URL, None, None).await);
    service.set_timeout(30.0).await;
    assert_ok!(service.get(URL, None, None).await);

    let timeouts: Vec<_> = transport.sent().iter().map(|r| r.timeout).collect();
    assert_eq!(
        timeouts,
        vec![
            Some(Duration::from_secs(40)),
            Some(Duration::from_secs(10)),
            Some(Duration::from_secs(30)),
        ]
    );
}

// == Errors ==

#[tokio::test]
async fn test_invalid_json_is_parse_error_and_not_cached() {
    let transport = ScriptedTransport::new(r#"{"ok":true}"#).script([Reply::Body("not-json")]);
    let service = RequestCache::new(transport.clone());
    service.set_cache(60.0).await;

    let err = assert_err!(service.get(URL, None, None).await);
    match &err {
        RequestError::Parse { raw, .. } => assert_eq!(raw, "not-json"),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert_eq!(service.stats().await.total_entries, 0);

    assert_eq!(service.get(URL, None, None).await.unwrap(), json!({"ok": true}));
    assert_eq!(transport.dispatch_count(), 2);
}

#[tokio::test]
async fn test_transport_failure_is_transport_error_and_not_cached() {
    let transport = ScriptedTransport::new(r#"{"ok":true}"#).script([Reply::Fail("connection refused")]);
    let service = RequestCache::new(transport.clone());
    service.set_cache(60.0).await;

    let err = assert_err!(service.get(URL, Some(&ab()), None).await);
    assert!(err.is_transport());
    assert!(!err.is_parse());
    assert_eq!(service.stats().await.total_entries, 0);

    // A failed request leaves the service usable
    assert_eq!(service.get(URL, Some(&ab()), None).await.unwrap(), json!({"ok": true}));
    assert_ok!(service.get(URL, Some(&ab()), None).await);
    assert_eq!(transport.dispatch_count(), 2);
}

// == Known Limitations ==

#[tokio::test]
async fn test_concurrent_misses_are_not_coalesced() {
    let transport = ScriptedTransport::with_delay(r#"{"ok":true}"#, Duration::from_millis(50));
    let service = RequestCache::new(transport.clone());
    service.set_cache(60.0).await;

    let (params_a, params_b) = (ab(), ab());
    let (first, second) = tokio::join!(
        service.get(URL, Some(&params_a), None),
        service.get(URL, Some(&params_b), None)
    );
    assert_ok!(first);
    assert_ok!(second);

    // Both requests missed and reached the network
    assert_eq!(transport.dispatch_count(), 2);
    assert_eq!(service.stats().await.total_entries, 1);
}
