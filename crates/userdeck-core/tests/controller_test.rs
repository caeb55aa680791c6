#![allow(clippy::unwrap_used)]
// Behavior tests for the `Directory` lifecycle using wiremock.
//
// Timing-sensitive tests use short real intervals with generous outer
// deadlines, so they hold up on slow CI machines.

use std::time::Duration;

use serde_json::json;
use tokio::time::{sleep, timeout};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use userdeck_core::{ConnectionState, Directory, DirectoryConfig, DirectoryError, InfoMessage};

const DEADLINE: Duration = Duration::from_secs(2);

// ── Helpers ─────────────────────────────────────────────────────────

fn test_config(server: &MockServer, reconnect_interval: Duration) -> DirectoryConfig {
    DirectoryConfig {
        endpoint: format!("{}/users", server.uri()).parse().unwrap(),
        probe_timeout: Duration::from_millis(200),
        fetch_timeout: Duration::from_millis(400),
        reconnect_interval,
        info_message_ttl: Duration::from_millis(300),
    }
}

fn users_body() -> serde_json::Value {
    json!([{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }])
}

async fn mount_probe_ok(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn mount_users(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .mount(server)
        .await;
}

// ── Load cycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_connects_and_publishes_users() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    mount_users(&server).await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    assert_eq!(dir.current_state(), ConnectionState::Checking);

    dir.load().await.unwrap();

    assert_eq!(dir.current_state(), ConnectionState::Connected);
    assert_eq!(dir.current_error(), None);
    assert!(!dir.is_loading());
    assert_eq!(dir.store().user_count(), 1);
    assert_eq!(dir.store().user_by_id(1).unwrap().name, "Leanne Graham");
    assert!(dir.store().fetched_at().is_some());
}

#[tokio::test]
async fn test_probe_failure_aborts_load_before_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // The data path must never be touched when the probe fails.
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(0)
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let result = dir.load().await;

    assert!(
        matches!(result, Err(DirectoryError::ConnectionFailed)),
        "expected ConnectionFailed, got: {result:?}"
    );
    assert_eq!(dir.current_error(), Some(DirectoryError::ConnectionFailed));
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);
    assert_eq!(dir.store().user_count(), 0);
    assert!(!dir.is_loading());

    server.verify().await;
}

#[tokio::test]
async fn test_fetch_timeout_degrades_to_disconnected() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users_body())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let started = std::time::Instant::now();
    let result = dir.load().await;

    assert!(
        matches!(result, Err(DirectoryError::Timeout)),
        "expected Timeout, got: {result:?}"
    );
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "fetch deadline did not abort the request"
    );
    assert_eq!(dir.current_error(), Some(DirectoryError::Timeout));
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);
    assert_eq!(dir.store().user_count(), 0);
}

#[tokio::test]
async fn test_fetch_http_error_is_preserved() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let result = dir.load().await;

    assert!(
        matches!(result, Err(DirectoryError::Http(503))),
        "expected Http(503), got: {result:?}"
    );
    assert_eq!(dir.current_error(), Some(DirectoryError::Http(503)));
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connection_refused_maps_to_connection_failed() {
    let server = MockServer::start().await;
    let config = test_config(&server, Duration::ZERO);
    drop(server); // free the port so the probe gets connection refused

    let dir = Directory::new(config).unwrap();
    let result = dir.load().await;

    assert!(
        matches!(result, Err(DirectoryError::ConnectionFailed)),
        "expected ConnectionFailed, got: {result:?}"
    );
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_loading_flag_toggles_during_load() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users_body())
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let mut loading_rx = dir.loading();
    assert!(!*loading_rx.borrow_and_update());

    let background = {
        let dir = dir.clone();
        tokio::spawn(async move { dir.load().await })
    };

    timeout(DEADLINE, loading_rx.wait_for(|l| *l))
        .await
        .expect("loading flag should rise")
        .unwrap();
    timeout(DEADLINE, loading_rx.wait_for(|l| !*l))
        .await
        .expect("loading flag should fall")
        .unwrap();

    background.await.unwrap().unwrap();
    assert!(!dir.is_loading());
}

#[tokio::test]
async fn test_overlapping_load_is_suppressed() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users_body())
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let mut loading_rx = dir.loading();

    let background = {
        let dir = dir.clone();
        tokio::spawn(async move { dir.load().await })
    };
    timeout(DEADLINE, loading_rx.wait_for(|l| *l))
        .await
        .expect("first load should start")
        .unwrap();

    // Second call lands while the first cycle holds the guard.
    dir.load().await.unwrap();

    background.await.unwrap().unwrap();
    assert_eq!(dir.store().user_count(), 1);
    server.verify().await;
}

// ── Retry ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_retry_bumps_counter_and_replaces_wholesale() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": "Leanne Graham" }])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "name": "Ervin Howell" },
            { "id": 3, "name": "Clementine Bauch" }
        ])))
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();

    dir.load().await.unwrap();
    assert_eq!(dir.attempt_count(), 0);
    assert!(dir.store().user_by_id(1).is_some());

    dir.retry().await.unwrap();
    assert_eq!(dir.attempt_count(), 1);
    // Wholesale replacement: the old record is gone, not merged.
    assert!(dir.store().user_by_id(1).is_none());
    assert!(dir.store().user_by_id(2).is_some());
    assert!(dir.store().user_by_id(3).is_some());
    assert_eq!(dir.store().user_count(), 2);

    // A retry against an unchanged backend publishes identical data.
    let before = dir.store().users_snapshot();
    dir.retry().await.unwrap();
    assert_eq!(dir.attempt_count(), 2);
    assert_eq!(dir.store().users_snapshot(), before);
}

// ── Info banner ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_info_banner_clears_after_success() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    mount_users(&server).await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let mut info_rx = dir.info_message();

    dir.load().await.unwrap();
    assert_eq!(dir.current_info(), Some(InfoMessage::LoadingData));

    timeout(DEADLINE, info_rx.wait_for(Option::is_none))
        .await
        .expect("banner should clear after the TTL")
        .unwrap();
}

#[tokio::test]
async fn test_info_banner_clears_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    let mut info_rx = dir.info_message();

    let _ = dir.load().await;
    // The probe failed before the data phase, so the banner never advanced.
    assert_eq!(dir.current_info(), Some(InfoMessage::Connecting));

    timeout(DEADLINE, info_rx.wait_for(Option::is_none))
        .await
        .expect("banner should clear even after a failed cycle")
        .unwrap();
}

// ── Passive reconnection ────────────────────────────────────────────

#[tokio::test]
async fn test_passive_probe_reconnects_without_reload() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::from_millis(150))).unwrap();
    let mut state_rx = dir.connection_state();

    let result = dir.load().await;
    assert!(matches!(result, Err(DirectoryError::ConnectionFailed)));
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);

    // The backend recovered; the next periodic probe should notice.
    timeout(
        DEADLINE,
        state_rx.wait_for(|s| *s == ConnectionState::Connected),
    )
    .await
    .expect("passive probe should flip the state within the deadline")
    .unwrap();

    // Probe-only: reconnection never reloads data or counts as a retry.
    assert_eq!(dir.store().user_count(), 0);
    assert_eq!(dir.attempt_count(), 0);

    dir.shutdown().await;
}

#[tokio::test]
async fn test_no_passive_probes_while_connected() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::from_millis(100))).unwrap();
    dir.load().await.unwrap();
    assert_eq!(dir.current_state(), ConnectionState::Connected);

    // Several reconnect periods pass; connected state must stay silent.
    sleep(Duration::from_millis(350)).await;
    server.verify().await;

    dir.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_passive_probing() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = Directory::new(test_config(&server, Duration::from_millis(100))).unwrap();
    let result = dir.load().await;
    assert!(matches!(result, Err(DirectoryError::ConnectionFailed)));

    dir.shutdown().await;

    server.reset().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    sleep(Duration::from_millis(350)).await;
    server.verify().await;
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);
}

// ── State freshness ─────────────────────────────────────────────────

#[tokio::test]
async fn test_state_tracks_latest_outcome() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    mount_users(&server).await;

    let dir = Directory::new(test_config(&server, Duration::ZERO)).unwrap();
    dir.load().await.unwrap();
    assert_eq!(dir.current_state(), ConnectionState::Connected);

    // The backend goes away; a later probe must not leave a stale verdict.
    server.reset().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!dir.probe().await);
    assert_eq!(dir.current_state(), ConnectionState::Disconnected);
    // A plain probe is state-only: fetched data and error are untouched.
    assert_eq!(dir.store().user_count(), 1);
    assert_eq!(dir.current_error(), None);
}

// ── One-shot ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_oneshot_loads_and_tears_down() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;
    mount_users(&server).await;

    let count = Directory::oneshot(test_config(&server, Duration::from_secs(30)), |dir| {
        async move { Ok(dir.store().user_count()) }
    })
    .await
    .unwrap();

    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_oneshot_propagates_load_failure() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = Directory::oneshot(test_config(&server, Duration::ZERO), |dir| {
        async move { Ok(dir.store().user_count()) }
    })
    .await;

    assert!(
        matches!(result, Err(DirectoryError::ConnectionFailed)),
        "expected ConnectionFailed, got: {result:?}"
    );
}
