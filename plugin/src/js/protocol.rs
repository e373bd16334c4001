//! JavaScript Engine Protocol
//!
//! Commands exchanged between `JsEngineClient` handles and the engine thread.

use std::sync::mpsc::Sender;

use super::EngineError;

/// Reply channel for a script whose result the caller waits on.
pub type EvalReply = Sender<Result<String, EngineError>>;

/// Commands that can be sent to the JS engine thread.
#[derive(Debug)]
pub enum JsCommand {
    /// Execute a JS script (non-module). When `reply` is set, the result
    /// converted to a string is sent back once the script completes.
    Execute {
        source: String,
        reply: Option<EvalReply>,
    },
    /// Run pending jobs (promises, timers).
    FlushEventLoop,
    /// Shutdown the JS engine.
    Shutdown,
}
