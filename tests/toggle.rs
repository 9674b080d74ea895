use axum::{Json, Router, http::StatusCode, routing::post};
use like_toggle::{
    AppState, ClientConfig, CsrfToken, Labels, Page, SharedPage, ToggleAction, ToggleError,
    ToggleOutcome, models::{AppData, FeedEntry, Tweet}, router,
};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

const TOKEN: &str = "toggle-test-token";

async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

fn seeded_state(name: &str, liked_by: &[&str]) -> AppState {
    let mut path = std::env::temp_dir();
    path.push(format!("like_toggle_{}_{name}.json", std::process::id()));
    seeded_state_at(path, liked_by)
}

fn seeded_state_at(path: std::path::PathBuf, liked_by: &[&str]) -> AppState {
    let mut data = AppData::default();
    data.next_id = 43;
    data.tweets.insert(
        42,
        Tweet {
            id: 42,
            author: "alice".into(),
            content: "hello".into(),
            created_at: chrono::Utc::now(),
            liked_by: liked_by.iter().map(|user| user.to_string()).collect(),
        },
    );
    AppState::new(path, data)
}

/// Loads the feed and the csrf cookie the way a browser would on page load.
async fn load_page(base_url: &Url, labels: &Labels) -> (SharedPage, CsrfToken) {
    let client = Client::new();
    let index = client.get(base_url.clone()).send().await.unwrap();
    let cookies = index
        .headers()
        .get("set-cookie")
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    let csrf = CsrfToken::from_cookies(&cookies).unwrap();

    let entries: Vec<FeedEntry> = client
        .get(base_url.join("/api/tweets").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    (Arc::new(Mutex::new(Page::from_feed(&entries, labels))), csrf)
}

#[tokio::test]
async fn like_then_unlike_round_trip() {
    let base_url = serve(router(seeded_state("round_trip", &["bob", "carol"]))).await;
    let labels = Labels::default();
    let (page, csrf) = load_page(&base_url, &labels).await;
    let action = ToggleAction::new(ClientConfig::new(base_url), csrf);

    let first = action.activate(&page, 42).await.unwrap();
    let ToggleOutcome::Applied(result) = first else {
        panic!("first activation was skipped");
    };
    assert!(result.is_active);
    assert_eq!(result.count, 3);
    {
        let page = page.lock().await;
        let target = page.target(42).unwrap();
        assert_eq!(target.action_url, "/tweets/42/unlike/");
        assert_eq!(target.label, labels.active);
        assert!(!target.in_flight);
        assert_eq!(page.counter("count_42"), Some("3"));
    }

    let second = action.activate(&page, 42).await.unwrap();
    assert!(matches!(second, ToggleOutcome::Applied(result) if !result.is_active));
    let page = page.lock().await;
    let target = page.target(42).unwrap();
    assert_eq!(target.action_url, "/tweets/42/like/");
    assert_eq!(target.label, labels.inactive);
    assert_eq!(page.counter("count_42"), Some("2"));
}

#[tokio::test]
async fn transport_failure_leaves_page_untouched() {
    let base_url = serve(router(seeded_state("transport", &[]))).await;
    let (page, csrf) = load_page(&base_url, &Labels::default()).await;
    let before = page.lock().await.clone();

    let unused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_url = Url::parse(&format!("http://{}", unused.local_addr().unwrap())).unwrap();
    drop(unused);
    let action = ToggleAction::new(ClientConfig::new(dead_url), csrf);

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::Transport(_)));
    assert_eq!(*page.lock().await, before);
}

#[tokio::test]
async fn missing_tweet_is_a_status_error() {
    let base_url = serve(router(seeded_state("missing", &[]))).await;
    let (page, csrf) = load_page(&base_url, &Labels::default()).await;
    page.lock().await.target_mut(42).unwrap().action_url = "/tweets/4242/like/".into();
    let before = page.lock().await.clone();
    let action = ToggleAction::new(ClientConfig::new(base_url), csrf);

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::ResponseStatus(status) if status == StatusCode::NOT_FOUND));
    assert_eq!(*page.lock().await, before);
}

#[tokio::test]
async fn failed_save_keeps_server_and_page_unliked() {
    let state = seeded_state_at("/like_toggle_no_such_dir/likes.json".into(), &[]);
    let base_url = serve(router(state)).await;
    let (page, csrf) = load_page(&base_url, &Labels::default()).await;
    let before = page.lock().await.clone();
    let action = ToggleAction::new(ClientConfig::new(base_url.clone()), csrf);

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::ResponseStatus(status) if status.is_server_error()));
    assert_eq!(*page.lock().await, before);

    let seen: FeedEntry = Client::new()
        .get(base_url.join("/api/tweets/42").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!seen.is_liked);
    assert_eq!(seen.liked_count, 0);
}

#[tokio::test]
async fn cancelled_activation_frees_button() {
    let app = Router::new().route(
        "/tweets/42/like/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let base_url = serve(app).await;
    let page = seeded_page();
    let before = page.lock().await.clone();
    let config = ClientConfig::new(base_url).with_timeout(Duration::from_millis(200));
    let action = ToggleAction::new(config, CsrfToken::new(TOKEN));

    let cancelled = tokio::time::timeout(Duration::from_millis(50), action.activate(&page, 42)).await;
    assert!(cancelled.is_err());
    assert_eq!(*page.lock().await, before);

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::Transport(_)));
    assert!(!page.lock().await.target(42).unwrap().in_flight);
}

#[tokio::test]
async fn server_error_leaves_page_untouched() {
    let app = Router::new().route(
        "/tweets/42/like/",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = serve(app).await;
    let page = seeded_page();
    let before = page.lock().await.clone();
    let action = ToggleAction::new(ClientConfig::new(base_url), CsrfToken::new(TOKEN));

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::ResponseStatus(status) if status.is_server_error()));
    assert_eq!(*page.lock().await, before);
}

#[tokio::test]
async fn malformed_body_leaves_page_untouched() {
    let app = Router::new().route(
        "/tweets/42/like/",
        post(|| async { Json(serde_json::json!({ "tweet_id": 42, "liked": "yes" })) }),
    );
    let base_url = serve(app).await;
    let page = seeded_page();
    let before = page.lock().await.clone();
    let action = ToggleAction::new(ClientConfig::new(base_url), CsrfToken::new(TOKEN));

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::MalformedResponse(_)));
    assert_eq!(*page.lock().await, before);
}

#[tokio::test]
async fn request_carries_csrf_header_cookie_and_json_type() {
    let app = Router::new().route(
        "/tweets/42/like/",
        post(|headers: axum::http::HeaderMap| async move {
            let token = headers.get("x-csrf-token").and_then(|v| v.to_str().ok());
            let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());
            let cookie = headers.get("cookie").and_then(|v| v.to_str().ok());
            let expected_cookie = format!("csrftoken={TOKEN}");
            if token != Some(TOKEN)
                || content_type != Some("application/json")
                || cookie != Some(expected_cookie.as_str())
            {
                return Err(StatusCode::BAD_REQUEST);
            }
            Ok(Json(serde_json::json!({ "tweet_id": 42, "is_liked": true, "liked_count": 7 })))
        }),
    );
    let base_url = serve(app).await;
    let page = seeded_page();
    let action = ToggleAction::new(ClientConfig::new(base_url), CsrfToken::new(TOKEN));

    action.activate(&page, 42).await.unwrap();
    let page = page.lock().await;
    assert_eq!(page.target(42).unwrap().action_url, "/tweets/42/unlike/");
    assert_eq!(page.counter("count_42"), Some("7"));
}

#[tokio::test]
async fn second_click_while_in_flight_is_skipped() {
    let app = Router::new().route(
        "/tweets/42/like/",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Json(serde_json::json!({ "tweet_id": 42, "is_liked": true, "liked_count": 1 }))
        }),
    );
    let base_url = serve(app).await;
    let page = seeded_page();
    let action = ToggleAction::new(ClientConfig::new(base_url), CsrfToken::new(TOKEN));

    let (first, second) = tokio::join!(action.activate(&page, 42), action.activate(&page, 42));

    assert!(matches!(first.unwrap(), ToggleOutcome::Applied(_)));
    assert_eq!(second.unwrap(), ToggleOutcome::Skipped);
    let page = page.lock().await;
    assert_eq!(page.target(42).unwrap().action_url, "/tweets/42/unlike/");
    assert!(!page.target(42).unwrap().in_flight);
}

#[tokio::test]
async fn hung_request_times_out_and_frees_button() {
    let app = Router::new().route(
        "/tweets/42/like/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let base_url = serve(app).await;
    let page = seeded_page();
    let config = ClientConfig::new(base_url).with_timeout(Duration::from_millis(100));
    let action = ToggleAction::with_client(Client::new(), config, CsrfToken::new(TOKEN));

    let err = action.activate(&page, 42).await.unwrap_err();
    assert!(matches!(err, ToggleError::Transport(ref source) if source.is_timeout()));
    assert!(!page.lock().await.target(42).unwrap().in_flight);
}

fn seeded_page() -> SharedPage {
    let entries = vec![FeedEntry {
        id: 42,
        author: "alice".into(),
        content: "hello".into(),
        created_at: chrono::Utc::now(),
        is_liked: false,
        liked_count: 6,
        action_url: "/tweets/42/like/".into(),
    }];
    Arc::new(Mutex::new(Page::from_feed(&entries, &Labels::default())))
}
