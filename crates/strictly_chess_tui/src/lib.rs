//! Strictly Chess TUI - interactive chess against a UCI engine
//!
//! The core of this crate is the interaction controller: the state machine
//! that turns clicks into selections and moves, runs the promotion flow,
//! and coordinates the asynchronous search engine subprocess. Rendering is
//! a pure projection of controller state onto a ratatui terminal.
//!
//! # Architecture
//!
//! - **controller**: top-level state machine over
//!   Idle / Selected / AwaitingPromotion / AwaitingEngineMove
//! - **selection**: selected square plus its legal destinations
//! - **promotion**: the suspended pawn move awaiting a piece choice
//! - **engine**: UCI subprocess client (request/response over a line
//!   protocol, one search in flight, timeout as no-move)
//! - **tui**: terminal setup, input mapping, and stateless rendering

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod controller;
pub mod engine;
pub mod promotion;
pub mod selection;
pub mod tui;

pub use cli::Cli;
pub use controller::{Controller, InputEvent, Phase};
pub use engine::{
    EngineError, EngineEvent, EngineTransport, ProcessTransport, RequestId, ScriptedTransport,
    SearchClient,
};
pub use promotion::{PROMOTION_CHOICES, PendingPromotion, PromotionFlow};
pub use selection::Selection;
