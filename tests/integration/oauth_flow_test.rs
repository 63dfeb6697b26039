//! End-to-end flows: a click opens the popup, the popup redirects with a
//! code, the code is exchanged at a mock token endpoint, and the token
//! reaches both the callback and the event bus.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::time::timeout;

use metry_oauth_connect::{AuthConfig, AuthWindow, ClickEvent, OAuthConnector, GOT_TOKEN_EVENT};

use crate::test_harness::{init_tracing, ScriptedOpener, ScriptedWindow};

fn authenticate_click() -> ClickEvent {
    ClickEvent::new().with_attribute("data-metry", "authenticate")
}

#[tokio::test]
async fn test_click_to_token_full_flow() -> Result<()> {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    let token = json!({
        "access_token": "at-123",
        "refresh_token": "rt-456",
        "expires_in": 3600
    });
    let mock = server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token.to_string())
        .create_async()
        .await;

    let window = ScriptedWindow::cross_origin();
    let opener = ScriptedOpener::new(window.clone());

    let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let callback_sink = Arc::clone(&received);

    let (clicks, _) = broadcast::channel(16);
    let (connector, _binding) = OAuthConnector::connect(
        AuthConfig::new("my-id", "my-secret", "https://example.com/cb")
            .with_base_url(server.url())
            .with_on_success(move |data| {
                callback_sink.lock().unwrap().push(data.clone());
            }),
        opener.clone(),
        clicks.subscribe(),
    );
    let mut events = connector.events().subscribe();

    // Click the authenticate element, let the popup sit cross-origin for a
    // few poll ticks, then redirect back with a code
    clicks.send(authenticate_click())?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    window.redirect_to("https://example.com/cb?code=ABC123&state=emAuth");

    let event = timeout(Duration::from_secs(5), events.recv()).await??;
    assert_eq!(event.name, GOT_TOKEN_EVENT);
    assert_eq!(event.detail, token);
    assert!(event.bubbles);
    assert!(event.cancelable);

    // Callback saw the same payload, and the popup was closed for the user
    assert_eq!(received.lock().unwrap().clone(), vec![token]);
    assert!(window.is_closed());
    assert_eq!(opener.open_count(), 1);

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_user_closing_popup_ends_flow_without_exchange() -> Result<()> {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .expect(0)
        .create_async()
        .await;

    let window = ScriptedWindow::cross_origin();
    let opener = ScriptedOpener::new(window.clone());

    let (clicks, _) = broadcast::channel(16);
    let (connector, _binding) = OAuthConnector::connect(
        AuthConfig::new("my-id", "my-secret", "https://example.com/cb")
            .with_base_url(server.url()),
        opener.clone(),
        clicks.subscribe(),
    );
    let mut events = connector.events().subscribe();

    clicks.send(authenticate_click())?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    window.user_close();

    // The flow ends silently: no token request, no event
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(events.try_recv().is_err());

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_refresh_flow_round_trip() -> Result<()> {
    init_tracing();

    let mut server = mockito::Server::new_async().await;
    let fresh = json!({"access_token": "fresh-token", "expires_in": 3600});
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(fresh.to_string())
        .create_async()
        .await;

    let window = ScriptedWindow::cross_origin();
    let opener = ScriptedOpener::new(window);

    let connector = OAuthConnector::new(
        AuthConfig::new("my-id", "my-secret", "https://example.com/cb")
            .with_base_url(server.url()),
        opener,
    );

    let data = connector.fetch_access_token("rt-456").await?;
    assert_eq!(data, fresh);
    Ok(())
}
