//! Search engine client: lifecycle and request/response protocol for the
//! asynchronous UCI search process.
//!
//! The client hides the subprocess behind a small handle. Requests are
//! fire-and-forget; results come back as [`EngineEvent`]s on the event
//! channel the client was constructed with. Exactly one search may be in
//! flight: a second request while one is pending is rejected rather than
//! silently replacing the first, and every request carries an id so stale
//! or superseded results can be dropped.

mod transport;

pub use transport::{EngineTransport, ProcessTransport, ScriptedTransport};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use derive_more::{Display, Error};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Identifies one search request; results for other ids are stale.
pub type RequestId = u64;

/// Messages from the client to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine confirmed readiness. Published exactly once.
    Ready,
    /// A search concluded. `mv` is the best move in compact algebraic form,
    /// or `None` when the engine has no move (sentinel, timeout, or engine
    /// loss).
    BestMove {
        /// The request this result answers.
        id: RequestId,
        /// The move, if the engine produced one.
        mv: Option<String>,
    },
}

/// Request rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// A search is already in flight; the caller must wait for its result.
    #[display("a search is already pending")]
    SearchPending,
    /// The engine task has stopped.
    #[display("engine is not running")]
    Disconnected,
}

/// Commands from the handle to the client task.
enum Command {
    /// Send a protocol line, queued until the engine is ready.
    Send(String),
    /// A request's deadline elapsed.
    DeadlineExpired(RequestId),
    /// Quit the engine and stop the task.
    Shutdown,
}

#[derive(Default)]
struct Shared {
    ready: bool,
    pending: Option<RequestId>,
    next_id: RequestId,
}

/// Handle to the search engine client task.
pub struct SearchClient {
    cmd_tx: mpsc::UnboundedSender<Command>,
    shared: Arc<Mutex<Shared>>,
    depth: u32,
    search_timeout: Duration,
}

impl SearchClient {
    /// Starts the client over a transport and begins the handshake
    /// (`uci`, then `isready`). Readiness is reported as
    /// [`EngineEvent::Ready`] once the process answers `readyok`;
    /// position/search commands issued earlier are buffered until then.
    pub fn start<T>(
        transport: T,
        depth: u32,
        search_timeout: Duration,
        event_tx: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self
    where
        T: EngineTransport + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared::default()));

        tokio::spawn(run_client(transport, cmd_rx, Arc::clone(&shared), event_tx));

        Self {
            cmd_tx,
            shared,
            depth,
            search_timeout,
        }
    }

    /// Whether the engine has confirmed readiness.
    pub fn is_ready(&self) -> bool {
        self.shared.lock().unwrap().ready
    }

    /// Requests the best move for a position given as an exchange (FEN)
    /// string. Returns immediately; the result arrives later as
    /// [`EngineEvent::BestMove`] with the returned id. If the engine does
    /// not answer within the configured timeout, a no-move result is
    /// delivered for the same id.
    pub fn find_best_move(&self, fen: &str) -> Result<RequestId, EngineError> {
        let id = {
            let mut shared = self.shared.lock().unwrap();
            if shared.pending.is_some() {
                return Err(EngineError::SearchPending);
            }
            let id = shared.next_id;
            shared.next_id += 1;
            shared.pending = Some(id);
            id
        };

        let send = |line: String| {
            self.cmd_tx
                .send(Command::Send(line))
                .map_err(|_| EngineError::Disconnected)
        };
        if let Err(e) = send(format!("position fen {fen}")).and_then(|()| send(format!("go depth {}", self.depth))) {
            self.shared.lock().unwrap().pending = None;
            return Err(e);
        }

        let cmd_tx = self.cmd_tx.clone();
        let deadline = self.search_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            let _ = cmd_tx.send(Command::DeadlineExpired(id));
        });

        debug!(id, "Search requested");
        Ok(id)
    }

    /// Tells the engine to quit and stops the client task. Idempotent;
    /// any pending request is abandoned.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
    }
}

/// The client task: owns the transport, multiplexes handle commands and
/// engine messages.
async fn run_client<T>(
    mut transport: T,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    shared: Arc<Mutex<Shared>>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
) where
    T: EngineTransport,
{
    // Two-step handshake: announce the protocol, then ask for readiness.
    for line in ["uci", "isready"] {
        if let Err(e) = transport.send(line).await {
            warn!(error = %e, "Engine handshake failed");
            return;
        }
    }

    // Commands held back until the engine confirms readiness.
    let mut held: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Send(line)) => {
                        let ready = shared.lock().unwrap().ready;
                        if ready {
                            if let Err(e) = transport.send(&line).await {
                                warn!(error = %e, "Engine write failed");
                                break;
                            }
                        } else {
                            debug!(command = %line, "Engine not ready, holding command");
                            held.push(line);
                        }
                    }
                    Some(Command::DeadlineExpired(id)) => {
                        let expired = {
                            let mut s = shared.lock().unwrap();
                            if s.pending == Some(id) {
                                s.pending = None;
                                true
                            } else {
                                false
                            }
                        };
                        if expired {
                            warn!(id, "Search timed out, treating as no move");
                            let _ = event_tx.send(EngineEvent::BestMove { id, mv: None });
                        }
                    }
                    Some(Command::Shutdown) => {
                        info!("Shutting down engine");
                        let _ = transport.send("quit").await;
                        break;
                    }
                    None => break,
                }
            }
            line = transport.recv() => {
                match line {
                    Ok(Some(line)) => match parse_message(line.trim()) {
                        EngineMessage::ReadyOk => {
                            let newly_ready = {
                                let mut s = shared.lock().unwrap();
                                let newly = !s.ready;
                                s.ready = true;
                                newly
                            };
                            if newly_ready {
                                info!("Engine is ready");
                                let _ = event_tx.send(EngineEvent::Ready);
                                for line in held.drain(..) {
                                    if let Err(e) = transport.send(&line).await {
                                        warn!(error = %e, "Engine write failed");
                                        return;
                                    }
                                }
                            }
                        }
                        EngineMessage::BestMove(mv) => {
                            let answered = {
                                let mut s = shared.lock().unwrap();
                                s.pending.take()
                            };
                            match answered {
                                Some(id) => {
                                    let _ = event_tx.send(EngineEvent::BestMove { id, mv });
                                }
                                None => {
                                    debug!(?mv, "Dropping stale search result");
                                }
                            }
                        }
                        EngineMessage::Diagnostic => {}
                    },
                    Ok(None) | Err(_) => {
                        warn!("Engine stream closed");
                        break;
                    }
                }
            }
        }
    }

    // The engine is gone; resolve any pending request as "no move" so the
    // consumer is not left waiting.
    let abandoned = {
        let mut s = shared.lock().unwrap();
        s.pending.take()
    };
    if let Some(id) = abandoned {
        let _ = event_tx.send(EngineEvent::BestMove { id, mv: None });
    }
}

/// One incoming protocol message, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineMessage {
    /// Exact readiness token.
    ReadyOk,
    /// A search result; `None` for the `(none)` sentinel or a malformed
    /// result line.
    BestMove(Option<String>),
    /// Anything else (id lines, search info, chatter).
    Diagnostic,
}

/// Classifies one line of engine output.
///
/// `readyok` must match exactly; `bestmove` lines are split on whitespace
/// and the second token is the move, with the `(none)` sentinel (or a
/// missing token) meaning no move exists.
fn parse_message(line: &str) -> EngineMessage {
    if line == "readyok" {
        return EngineMessage::ReadyOk;
    }
    if let Some(rest) = line.strip_prefix("bestmove") {
        let mv = rest.split_whitespace().next();
        return EngineMessage::BestMove(match mv {
            None | Some("(none)") => None,
            Some(mv) => Some(mv.to_string()),
        });
    }
    EngineMessage::Diagnostic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readyok_must_match_exactly() {
        assert_eq!(parse_message("readyok"), EngineMessage::ReadyOk);
        assert_eq!(parse_message("readyok maybe"), EngineMessage::Diagnostic);
        assert_eq!(parse_message("ready"), EngineMessage::Diagnostic);
    }

    #[test]
    fn bestmove_takes_the_second_token() {
        assert_eq!(
            parse_message("bestmove e2e4"),
            EngineMessage::BestMove(Some("e2e4".to_string()))
        );
        assert_eq!(
            parse_message("bestmove e7e8q ponder e8d7"),
            EngineMessage::BestMove(Some("e7e8q".to_string()))
        );
    }

    #[test]
    fn no_move_sentinel_and_truncation_mean_none() {
        assert_eq!(parse_message("bestmove (none)"), EngineMessage::BestMove(None));
        assert_eq!(parse_message("bestmove"), EngineMessage::BestMove(None));
    }

    #[test]
    fn other_lines_are_diagnostic() {
        assert_eq!(parse_message("id name Stockfish"), EngineMessage::Diagnostic);
        assert_eq!(
            parse_message("info depth 5 score cp 20"),
            EngineMessage::Diagnostic
        );
        assert_eq!(parse_message(""), EngineMessage::Diagnostic);
    }
}

