//! Line transports for the search engine protocol.
//!
//! The client task talks to the engine through [`EngineTransport`], so the
//! protocol logic is the same whether the peer is a real UCI subprocess or
//! a scripted double in tests.

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

/// One line-oriented peer: outbound commands, inbound messages.
#[async_trait::async_trait]
pub trait EngineTransport: Send {
    /// Sends one command line (no trailing newline).
    async fn send(&mut self, line: &str) -> Result<()>;

    /// Receives the next message line, or `None` when the peer is gone.
    async fn recv(&mut self) -> Result<Option<String>>;
}

/// Transport over a spawned engine subprocess's stdin/stdout.
///
/// The child is killed on drop, so an abandoned engine never outlives the
/// client.
pub struct ProcessTransport {
    child: Option<Child>,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl ProcessTransport {
    /// Spawns the engine executable with piped stdin/stdout.
    pub fn spawn(program: &Path) -> Result<Self> {
        info!(program = %program.display(), "Spawning search engine process");
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn engine {}", program.display()))?;

        let stdin = child.stdin.take().context("Engine stdin not captured")?;
        let stdout = child.stdout.take().context("Engine stdout not captured")?;

        Ok(Self {
            child: Some(child),
            stdin,
            stdout: BufReader::new(stdout).lines(),
        })
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!("Killing engine process");
            let _ = child.start_kill();
        }
    }
}

#[async_trait::async_trait]
impl EngineTransport for ProcessTransport {
    async fn send(&mut self, line: &str) -> Result<()> {
        debug!(command = %line, "-> engine");
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>> {
        let line = self.stdout.next_line().await?;
        if let Some(ref l) = line {
            debug!(message = %l, "<- engine");
        }
        Ok(line)
    }
}

/// Scripted transport for tests: replies are queued by the test, sent
/// commands are recorded for inspection.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    sent: Vec<String>,
    replies: VecDeque<String>,
    closed: bool,
}

impl ScriptedTransport {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message line the "engine" will emit.
    pub fn push_reply(&self, line: impl Into<String>) {
        self.inner.lock().unwrap().replies.push_back(line.into());
    }

    /// Marks the peer as gone; `recv` yields `None` once replies drain.
    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
    }

    /// Commands the client has sent so far.
    pub fn sent(&self) -> Vec<String> {
        self.inner.lock().unwrap().sent.clone()
    }
}

#[async_trait::async_trait]
impl EngineTransport for ScriptedTransport {
    async fn send(&mut self, line: &str) -> Result<()> {
        self.inner.lock().unwrap().sent.push(line.to_string());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>> {
        loop {
            {
                let mut state = self.inner.lock().unwrap();
                if let Some(line) = state.replies.pop_front() {
                    return Ok(Some(line));
                }
                if state.closed {
                    return Ok(None);
                }
            }
            // Replies arrive from the test at arbitrary times; poll gently.
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }
}
