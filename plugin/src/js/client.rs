use std::sync::mpsc;

use crate::js::{EngineError, JsCommand};

/// Client handle for communicating with the JS engine thread.
#[derive(Clone, Debug)]
pub struct JsEngineClient {
    pub(crate) sender: mpsc::Sender<JsCommand>,
}

impl JsEngineClient {
    /// Send a flush command to run pending jobs.
    pub fn flush_event_loop(&self) {
        if let Err(e) = self.sender.send(JsCommand::FlushEventLoop) {
            log::warn!("Failed to send flush event loop command: {}", e);
        }
    }

    /// Execute a script without waiting for it.
    pub fn execute(&self, source: impl Into<String>) {
        if let Err(e) = self.sender.send(JsCommand::Execute {
            source: source.into(),
            reply: None,
        }) {
            log::error!("Failed to send execute command: {}", e);
        }
    }

    /// Execute a script and block until its result comes back.
    pub fn evaluate(&self, source: impl Into<String>) -> Result<String, EngineError> {
        let (reply, result) = mpsc::channel();
        self.sender
            .send(JsCommand::Execute {
                source: source.into(),
                reply: Some(reply),
            })
            .map_err(|_| EngineError::Disconnected)?;

        result.recv().map_err(|_| EngineError::Disconnected)?
    }

    /// Shutdown the JS engine.
    pub fn shutdown(&self) {
        let _ = self.sender.send(JsCommand::Shutdown);
    }
}
