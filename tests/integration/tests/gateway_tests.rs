//! Gateway session integration tests
//!
//! Each test runs the engine over a real WebSocket against `MockGateway`.

use std::sync::Arc;
use std::time::Duration;

use bot_core::{Intents, OpenApi};
use bot_gateway::{
    run_forever, ConnectionState, GatewayClient, GatewayError, GatewayMessage, GreetingHandler,
    ProtocolSignal, Session, ShardConfig,
};
use bot_openapi::{HttpOpenApi, OpenApiConfig};
use integration_tests::*;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Single connection
// ============================================================================

#[tokio::test]
async fn test_identify_and_dispatch() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![
        Step::Send(ready_event("session-1", 1)),
        Step::Send(at_message_event(2, "first")),
        Step::Send(at_message_event(3, "second")),
    ])])
    .await
    .expect("Failed to start gateway");

    let handler = CollectingHandler::shared();
    let mut client = GatewayClient::new(fresh_session(&gateway.url()), handler.clone());
    let shutdown = client.shutdown_token();

    client.connect().await.expect("Failed to connect");
    client.authenticate().await.expect("Failed to identify");
    let listening = tokio::spawn(async move {
        let result = client.listen().await;
        (client, result)
    });

    handler.wait_for(2).await;
    shutdown.cancel();
    let (client, result) = listening.await.expect("listen task panicked");

    assert!(result.is_ok());
    assert_eq!(handler.contents(), ["first", "second"]);
    assert_eq!(handler.seen()[0].0, Some(2));

    let identify = gateway.handshake(0).expect("No handshake frame");
    assert_eq!(identify["op"], 2);
    assert_eq!(identify["d"]["token"], expected_credential());
    assert_eq!(identify["d"]["intents"], Intents::PUBLIC_GUILD_MESSAGES.bits());
    assert_eq!(identify["d"]["shard"], serde_json::json!([0, 1]));

    let next = client.session();
    assert_eq!(next.id, "session-1");
    assert_eq!(next.last_seq, 3);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn test_resume_with_known_session() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![
        Step::Send(resumed_event(11)),
        Step::Send(at_message_event(12, "replayed")),
    ])])
    .await
    .expect("Failed to start gateway");

    let handler = CollectingHandler::shared();
    let session = resumable_session(&gateway.url(), "session-9", 10);
    let mut client = GatewayClient::new(session, handler.clone());
    let shutdown = client.shutdown_token();

    client.connect().await.expect("Failed to connect");
    client.authenticate().await.expect("Failed to resume");
    let listening = tokio::spawn(async move { client.listen().await });

    handler.wait_for(1).await;
    shutdown.cancel();
    listening
        .await
        .expect("listen task panicked")
        .expect("listen failed");

    let resume = gateway.handshake(0).expect("No handshake frame");
    assert_eq!(resume["op"], 6);
    assert_eq!(resume["d"]["session_id"], "session-9");
    assert_eq!(resume["d"]["seq"], 10);
    assert_eq!(resume["d"]["token"], expected_credential());
    assert_eq!(handler.contents(), ["replayed"]);
}

#[tokio::test]
async fn test_heartbeats_follow_hello() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![Step::Send(
        ready_event("session-1", 4),
    )])
    .with_heartbeat_interval(50)])
    .await
    .expect("Failed to start gateway");

    let mut client = GatewayClient::new(fresh_session(&gateway.url()), CollectingHandler::shared());
    let shutdown = client.shutdown_token();

    client.connect().await.expect("Failed to connect");
    client.authenticate().await.expect("Failed to identify");
    let listening = tokio::spawn(async move { client.listen().await });

    gateway.wait_for_frames(0, 4).await;
    shutdown.cancel();
    listening
        .await
        .expect("listen task panicked")
        .expect("listen failed");

    let frames = gateway.frames(0);
    assert_eq!(frames[0]["op"], 2);
    assert!(frames[1..].iter().all(|frame| frame["op"] == 1));
    // READY arrives well before the third beat
    assert_eq!(frames[3]["d"], 4);
}

#[tokio::test]
async fn test_server_close_frame_ends_listen() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![Step::Close(
        4914,
        "bot offline",
    )])])
    .await
    .expect("Failed to start gateway");

    let mut client = GatewayClient::new(fresh_session(&gateway.url()), CollectingHandler::shared());
    client.connect().await.expect("Failed to connect");
    client.authenticate().await.expect("Failed to identify");

    let err = client.listen().await.expect_err("listen should fail");
    assert!(matches!(
        err,
        GatewayError::ConnectionClosed { code: Some(4914), .. }
    ));
    assert!(!err.can_reconnect());
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn test_reconnect_signal_from_server() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![
        Step::Send(ready_event("session-1", 1)),
        Step::Send(GatewayMessage::reconnect()),
        Step::Send(at_message_event(2, "too late")),
    ])])
    .await
    .expect("Failed to start gateway");

    let handler = CollectingHandler::shared();
    let mut client = GatewayClient::new(fresh_session(&gateway.url()), handler.clone());
    client.connect().await.expect("Failed to connect");
    client.authenticate().await.expect("Failed to identify");

    let err = client.listen().await.expect_err("listen should fail");
    assert!(matches!(
        err,
        GatewayError::ProtocolSignal(ProtocolSignal::Reconnect)
    ));
    assert!(err.can_resume());
    assert!(handler.seen().is_empty());
    assert_eq!(client.session().id, "session-1");
}

#[tokio::test]
async fn test_dial_failure() {
    let session = fresh_session("ws://127.0.0.1:1/websocket");
    let mut client = GatewayClient::new(session, CollectingHandler::shared());

    let err = client.connect().await.expect_err("dial should fail");
    assert!(matches!(err, GatewayError::Dial(_)));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

// ============================================================================
// Runner
// ============================================================================

#[tokio::test]
async fn test_runner_identifies_again_after_invalid_session() {
    let gateway = MockGateway::start(vec![
        ConnectionScript::new(vec![
            Step::Send(ready_event("session-1", 1)),
            Step::Send(GatewayMessage::invalid_session()),
        ]),
        ConnectionScript::new(vec![
            Step::Send(ready_event("session-2", 1)),
            Step::Send(at_message_event(2, "fresh start")),
        ]),
    ])
    .await
    .expect("Failed to start gateway");

    let handler = CollectingHandler::shared();
    let shutdown = CancellationToken::new();
    let runner = tokio::spawn(run_forever(
        fresh_session(&gateway.url()),
        handler.clone(),
        fast_runner_options(),
        shutdown.clone(),
    ));

    handler.wait_for(1).await;
    shutdown.cancel();
    runner
        .await
        .expect("runner panicked")
        .expect("runner failed");

    assert_eq!(gateway.handshake(0).expect("No handshake")["op"], 2);
    assert_eq!(gateway.handshake(1).expect("No handshake")["op"], 2);
    assert_eq!(handler.contents(), ["fresh start"]);
}

#[tokio::test]
async fn test_runner_resumes_after_reconnect() {
    let gateway = MockGateway::start(vec![
        ConnectionScript::new(vec![
            Step::Send(ready_event("session-1", 1)),
            Step::Send(at_message_event(2, "one")),
            Step::Pause(Duration::from_millis(50)),
            Step::Send(GatewayMessage::reconnect()),
        ]),
        ConnectionScript::new(vec![
            Step::Send(resumed_event(3)),
            Step::Send(at_message_event(4, "two")),
        ]),
    ])
    .await
    .expect("Failed to start gateway");

    let handler = CollectingHandler::shared();
    let shutdown = CancellationToken::new();
    let runner = tokio::spawn(run_forever(
        fresh_session(&gateway.url()),
        handler.clone(),
        fast_runner_options(),
        shutdown.clone(),
    ));

    handler.wait_for(2).await;
    shutdown.cancel();
    runner
        .await
        .expect("runner panicked")
        .expect("runner failed");

    let resume = gateway.handshake(1).expect("No handshake");
    assert_eq!(resume["op"], 6);
    assert_eq!(resume["d"]["session_id"], "session-1");
    assert_eq!(resume["d"]["seq"], 2);
    assert_eq!(handler.contents(), ["one", "two"]);
}

#[tokio::test]
async fn test_runner_stops_when_bot_is_banned() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![Step::Close(
        4915,
        "bot banned",
    )])])
    .await
    .expect("Failed to start gateway");

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run_forever(
            fresh_session(&gateway.url()),
            CollectingHandler::shared(),
            fast_runner_options(),
            CancellationToken::new(),
        ),
    )
    .await
    .expect("runner kept retrying");

    assert!(matches!(
        result,
        Err(GatewayError::ConnectionClosed { code: Some(4915), .. })
    ));
    assert_eq!(gateway.connections(), 1);
}

// ============================================================================
// OpenAPI round trip
// ============================================================================

#[tokio::test]
async fn test_greeting_reply_through_openapi() {
    let gateway = MockGateway::start(vec![ConnectionScript::new(vec![
        Step::Send(ready_event("session-1", 1)),
        Step::Send(at_message_event(2, "hello there")),
    ])])
    .await
    .expect("Failed to start gateway");
    let api_server = MockOpenApi::start(gateway.url())
        .await
        .expect("Failed to start OpenAPI mock");

    let config = OpenApiConfig::default().with_base_url(api_server.base_url());
    let api = Arc::new(HttpOpenApi::new(test_token(), config).expect("Failed to build client"));

    let endpoint = api.ws_endpoint().await.expect("Failed to fetch endpoint");
    assert_eq!(endpoint.url, gateway.url());

    let session = Session::new(
        endpoint.url,
        test_token(),
        Intents::PUBLIC_GUILD_MESSAGES,
        ShardConfig::new(0, endpoint.shards),
    );
    let mut client = GatewayClient::new(session, Arc::new(GreetingHandler::new(api)));
    let shutdown = client.shutdown_token();

    client.connect().await.expect("Failed to connect");
    client.authenticate().await.expect("Failed to identify");
    let listening = tokio::spawn(async move { client.listen().await });

    api_server.wait_for_posts(1).await;
    shutdown.cancel();
    listening
        .await
        .expect("listen task panicked")
        .expect("listen failed");

    let posts = api_server.posts();
    let (channel_id, body) = &posts[0];
    assert_eq!(channel_id, "channel-1");
    assert_eq!(body["msg_id"], "msg-2");
    assert!(body["content"]
        .as_str()
        .expect("content should be a string")
        .starts_with("<@user-1>"));
}
