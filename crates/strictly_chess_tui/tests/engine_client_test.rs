//! Tests for the search engine client protocol handling.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use strictly_chess_tui::{EngineError, EngineEvent, ScriptedTransport, SearchClient};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn start_client(
    search_timeout: Duration,
) -> (
    SearchClient,
    ScriptedTransport,
    mpsc::UnboundedReceiver<EngineEvent>,
) {
    let transport = ScriptedTransport::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let client = SearchClient::start(transport.clone(), 5, search_timeout, tx);
    (client, transport, rx)
}

/// Polls until the transport has seen a command satisfying `pred`.
async fn wait_for_sent(transport: &ScriptedTransport, pred: impl Fn(&[String]) -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        if pred(&transport.sent()) {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for command; sent so far: {:?}",
            transport.sent()
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> EngineEvent {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("engine event")
        .expect("event channel open")
}

#[tokio::test]
async fn test_handshake_announces_protocol_then_asks_readiness() {
    let (_client, transport, mut rx) = start_client(Duration::from_secs(5));
    wait_for_sent(&transport, |sent| sent == ["uci", "isready"]).await;

    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);
}

#[tokio::test]
async fn test_commands_before_readiness_are_held_then_drained() {
    let (client, transport, mut rx) = start_client(Duration::from_secs(5));
    wait_for_sent(&transport, |sent| sent.len() == 2).await;

    // Not ready yet: the search commands must not reach the process.
    client.find_best_move(START_FEN).expect("request accepted");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.sent().len(), 2);

    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);
    wait_for_sent(&transport, |sent| {
        sent.iter().any(|l| l.starts_with("position fen"))
            && sent.iter().any(|l| l == "go depth 5")
    })
    .await;
}

#[tokio::test]
async fn test_second_request_while_pending_is_rejected() {
    let (client, transport, mut rx) = start_client(Duration::from_secs(5));
    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);

    let id = client.find_best_move(START_FEN).expect("first request");
    assert_eq!(
        client.find_best_move(START_FEN).unwrap_err(),
        EngineError::SearchPending
    );

    transport.push_reply("bestmove e2e4");
    assert_eq!(
        next_event(&mut rx).await,
        EngineEvent::BestMove {
            id,
            mv: Some("e2e4".to_string())
        }
    );

    // Resolved: a new request is accepted and gets a fresh id.
    let next = client.find_best_move(START_FEN).expect("second request");
    assert_ne!(next, id);
}

#[tokio::test]
async fn test_no_move_sentinel_resolves_to_none() {
    let (client, transport, mut rx) = start_client(Duration::from_secs(5));
    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);

    let id = client.find_best_move(START_FEN).expect("request");
    transport.push_reply("info depth 1 score cp 0");
    transport.push_reply("bestmove (none)");
    assert_eq!(next_event(&mut rx).await, EngineEvent::BestMove { id, mv: None });
}

#[tokio::test]
async fn test_timeout_resolves_as_no_move_and_late_result_is_dropped() {
    let (client, transport, mut rx) = start_client(Duration::from_millis(50));
    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);

    let id = client.find_best_move(START_FEN).expect("request");
    // No reply: the deadline resolves the request.
    assert_eq!(next_event(&mut rx).await, EngineEvent::BestMove { id, mv: None });

    // A result arriving after the deadline answers nothing.
    transport.push_reply("bestmove e2e4");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "stale result must be dropped");

    // The client accepts new work afterwards.
    let next = client.find_best_move(START_FEN).expect("fresh request");
    assert_ne!(next, id);
}

#[tokio::test]
async fn test_readiness_is_published_once() {
    let (_client, transport, mut rx) = start_client(Duration::from_secs(5));
    transport.push_reply("readyok");
    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "Ready must fire exactly once");
}

#[tokio::test]
async fn test_shutdown_sends_quit_and_is_idempotent() {
    let (client, transport, mut rx) = start_client(Duration::from_secs(5));
    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);

    client.shutdown();
    wait_for_sent(&transport, |sent| sent.last().map(String::as_str) == Some("quit")).await;
    client.shutdown();
}

#[tokio::test]
async fn test_engine_loss_resolves_pending_request() {
    let (client, transport, mut rx) = start_client(Duration::from_secs(5));
    transport.push_reply("readyok");
    assert_eq!(next_event(&mut rx).await, EngineEvent::Ready);

    let id = client.find_best_move(START_FEN).expect("request");
    transport.close();
    assert_eq!(next_event(&mut rx).await, EngineEvent::BestMove { id, mv: None });
}
