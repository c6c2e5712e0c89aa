use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;

use price_alert::{
    AlertLedger, AlertMessage, AlertSink, Direction, FetchError, MonitorPlan, NotifyError,
    PriceSource, Quote, StopRule, TokenWatch,
    services::{alert_monitor, dexscreener::DexScreenerClient, pushover::PushoverClient},
};

type Received = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn messages(
    State(received): State<Received>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let user = form.get("user").cloned().unwrap_or_default();
    received.lock().unwrap().push(form);

    match user.as_str() {
        "u-bad" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "user": "invalid", "errors": ["user identifier is invalid"], "status": 0 })),
        )
            .into_response(),
        "u-empty" => StatusCode::OK.into_response(),
        "u-odd" => Json(json!({ "status": 0, "errors": ["application token is invalid"] })).into_response(),
        _ => Json(json!({ "status": 1, "request": "5042853c-402d-4a18-abcb-168734a801de", "receipt": "rLqVuqTRh62UzxtmqiaLzQmVcPgiCy" }))
            .into_response(),
    }
}

async fn pushover(user: &str) -> (PushoverClient, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/1/messages.json", post(messages))
        .with_state(received.clone());
    let base = spawn_server(app).await;

    let client = PushoverClient::new(base, "a-token".to_string(), user.to_string(), Duration::from_secs(2)).unwrap();
    (client, received)
}

fn message() -> AlertMessage {
    AlertMessage {
        title: "🚀 PRICE ALERT: MEME".to_string(),
        body: "🚀 MEME reached $0.03!".to_string(),
    }
}

#[tokio::test]
async fn sends_emergency_form_fields() {
    let (client, received) = pushover("u-key").await;

    let receipt = client.send(&message()).await.unwrap();
    assert_eq!(receipt.status, Some(1));
    assert_eq!(receipt.receipt.as_deref(), Some("rLqVuqTRh62UzxtmqiaLzQmVcPgiCy"));

    let forms = received.lock().unwrap().clone();
    assert_eq!(forms.len(), 1);

    let form = &forms[0];
    assert_eq!(form["token"], "a-token");
    assert_eq!(form["user"], "u-key");
    assert_eq!(form["title"], "🚀 PRICE ALERT: MEME");
    assert_eq!(form["message"], "🚀 MEME reached $0.03!");
    assert_eq!(form["sound"], "siren");
    assert_eq!(form["priority"], "2");
    assert_eq!(form["retry"], "30");
    assert_eq!(form["expire"], "3600");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (client, _received) = pushover("u-bad").await;

    match client.deliver(&message()).await {
        Err(NotifyError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("user identifier is invalid"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn explicit_status_zero_is_rejected() {
    let (client, _received) = pushover("u-odd").await;

    match client.deliver(&message()).await {
        Err(NotifyError::Rejected(reason)) => assert_eq!(reason, "application token is invalid"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn accepted_message_with_empty_body_counts_as_sent() {
    let (client, received) = pushover("u-empty").await;

    let receipt = client.send(&message()).await.unwrap();
    assert_eq!(receipt.status, None);

    // once marked, the next cycle must not page again
    struct FixedPrice;
    impl PriceSource for FixedPrice {
        async fn fetch_quote(&self, _address: &str) -> Result<Quote, FetchError> {
            Ok(Quote {
                price: 0.05,
                symbol: "MEME".to_string(),
                name: "My Meme".to_string(),
            })
        }
    }

    let watches = vec![TokenWatch::new("meme", 0.03, Direction::Above)];
    let mut ledger = AlertLedger::new();
    let first = alert_monitor::run_cycle(&FixedPrice, &client, &watches, &mut ledger).await;
    let second = alert_monitor::run_cycle(&FixedPrice, &client, &watches, &mut ledger).await;

    assert_eq!(first.fired, vec!["meme".to_string()]);
    assert_eq!(second.checked, 0);
    assert!(ledger.has_fired("meme"));
    assert_eq!(received.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn monitor_end_to_end_against_mock_services() {
    let prices = Arc::new(Mutex::new(vec!["0.02", "0.025", "0.031"].into_iter()));
    let price_app = Router::new()
        .route(
            "/latest/dex/tokens/:address",
            get(|State(prices): State<Arc<Mutex<std::vec::IntoIter<&'static str>>>>| async move {
                let price = prices.lock().unwrap().next().unwrap_or("0.031");
                Json(json!({ "pairs": [ { "priceUsd": price, "baseToken": { "name": "My Meme", "symbol": "MEME" } } ] }))
            }),
        )
        .with_state(prices);
    let price_base = spawn_server(price_app).await;

    let source = DexScreenerClient::new(price_base, Duration::from_secs(2)).unwrap();
    let (sink, received) = pushover("u-key").await;

    let plan = MonitorPlan::new(
        vec![TokenWatch::new("meme", 0.03, Direction::Above).with_name("MyMemeCoin")],
        Duration::from_millis(10),
    )
    .with_stop_rule(StopRule::FirstAlert)
    .with_max_cycles(Some(10));

    let summary = alert_monitor::run(&source, &sink, &plan, AlertLedger::new()).await;

    assert!(summary.completed);
    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.notifications_sent, 1);

    let forms = received.lock().unwrap().clone();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["title"], "🚀 PRICE ALERT: MEME");
    assert!(forms[0]["message"].starts_with("🚀 MEME reached $0.03!\n\nCurrent price: $0.031000\nTime: "));
}
