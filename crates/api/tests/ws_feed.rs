//! End-to-end tests for the `/ws` event feed over a real socket.

mod common;

use std::time::Duration;

use common::build_test_app;
use futures::StreamExt;
use presence_core::geo::GeoLocation;
use presence_engine::PresenceEngine;
use tokio_tungstenite::tungstenite::Message;

async fn serve(router: axum::Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn wait_for_subscribers(app: &common::TestApp, expected: usize) {
    for _ in 0..100 {
        if app.hub.subscriber_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {expected} WebSocket subscribers");
}

#[tokio::test]
async fn status_update_reaches_every_socket() {
    let app = build_test_app();
    let dept = app.department("Engineering").await;
    let emp = app.employee(dept, "Yuki").await;
    let addr = serve(app.app()).await;

    let url = format!("ws://{addr}/ws");
    let (mut first, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
    let (mut second, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
    wait_for_subscribers(&app, 2).await;

    let engine = PresenceEngine::new(
        app.store.clone(),
        app.hub.clone(),
        app.config.presence.clone(),
    );
    engine
        .set_status(emp.id, "on-site", Some("desk 3"), GeoLocation::default())
        .await
        .unwrap();

    for socket in [&mut first, &mut second] {
        let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let Message::Text(text) = frame else {
            panic!("expected a text frame, got {frame:?}");
        };
        let event: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(event["type"], "STATUS_UPDATE");
        assert_eq!(event["data"]["employee_id"], emp.id);
        assert_eq!(event["data"]["status"]["comment"], "desk 3");
    }
}

#[tokio::test]
async fn closing_the_socket_unsubscribes() {
    let app = build_test_app();
    let addr = serve(app.app()).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    wait_for_subscribers(&app, 1).await;

    socket.close(None).await.unwrap();
    wait_for_subscribers(&app, 0).await;
}

#[tokio::test]
async fn hub_shutdown_closes_sockets() {
    let app = build_test_app();
    let addr = serve(app.app()).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    wait_for_subscribers(&app, 1).await;

    app.hub.shutdown_all().await;

    let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
        .await
        .unwrap();
    assert!(matches!(frame, Some(Ok(Message::Close(_))) | None));
}
