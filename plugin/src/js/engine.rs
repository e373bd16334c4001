//! JavaScript Engine
//!
//! Manages the Boa JavaScript runtime on a dedicated worker thread.
//! `Context` is not `Send`, so the thread builds its own context and every
//! other thread talks to it through a `JsEngineClient`.

use boa_engine::{Context, JsError, Source};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use super::{EngineError, JsCommand, JsEngineClient, exception_message};

type ContextBuilder = Box<dyn FnOnce() -> Result<Context, JsError> + Send>;

/// A configured engine that has not started yet. Created by `JsEngineBuilder::build`.
pub struct JsEngine {
    pub(crate) client: JsEngineClient,
    pub(crate) context_builder: ContextBuilder,
    pub(crate) receiver: Receiver<JsCommand>,
}

impl JsEngine {
    /// Get a client handle for communicating with the engine.
    pub fn client(&self) -> JsEngineClient {
        self.client.clone()
    }

    /// Start the worker thread.
    pub fn spawn(self) -> JsEngineHandle {
        let client = self.client.clone();
        let JsEngine {
            context_builder,
            receiver,
            ..
        } = self;

        let handle = thread::spawn(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                run_js_loop(context_builder, receiver);
            }));

            if let Err(e) = result {
                log::error!("JS engine panicked: {:?}", e);
            }
        });

        JsEngineHandle {
            client,
            handle: Some(handle),
        }
    }
}

/// Owner of a running engine thread.
pub struct JsEngineHandle {
    client: JsEngineClient,
    handle: Option<JoinHandle<()>>,
}

impl JsEngineHandle {
    pub fn client(&self) -> JsEngineClient {
        self.client.clone()
    }

    /// Shut the engine down and wait for its thread to exit.
    pub fn join(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.client.shutdown();
            if handle.join().is_err() {
                log::error!("JS engine thread could not be joined");
            }
        }
    }
}

impl Drop for JsEngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Main loop for the JS engine thread.
fn run_js_loop(context_builder: ContextBuilder, receiver: Receiver<JsCommand>) {
    log::info!("JS engine thread started");

    let mut context = match context_builder() {
        Ok(context) => context,
        Err(e) => {
            let message = e.to_string();
            log::error!("Failed to build JS context: {}", message);
            drain_after_failure(receiver, EngineError::ContextInit(message));
            return;
        }
    };

    log::info!("JS runtime initialized");

    loop {
        match receiver.recv() {
            Ok(JsCommand::Execute { source, reply }) => {
                log::debug!("Executing script ({} bytes)...", source.len());

                let result = evaluate(&mut context, &source);
                if let Err(e) = &result {
                    log::error!("Failed to execute script: {}", e);
                }

                flush_event_loop(&mut context);

                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            Ok(JsCommand::FlushEventLoop) => {
                flush_event_loop(&mut context);
            }
            Ok(JsCommand::Shutdown) => {
                log::info!("JS engine shutting down");
                break;
            }
            Err(e) => {
                log::error!("JS engine channel error: {}", e);
                break;
            }
        }
    }

    log::info!("JS engine thread stopped");
}

fn evaluate(context: &mut Context, source: &str) -> Result<String, EngineError> {
    let value = context
        .eval(Source::from_bytes(source.as_bytes()))
        .map_err(|e| EngineError::Script(exception_message(&e, context)))?;

    value
        .to_string(context)
        .map(|s| s.to_std_string_escaped())
        .map_err(|e| EngineError::Script(exception_message(&e, context)))
}

/// Answer pending evaluations with the init error until shutdown.
fn drain_after_failure(receiver: Receiver<JsCommand>, error: EngineError) {
    while let Ok(command) = receiver.recv() {
        match command {
            JsCommand::Execute {
                reply: Some(reply), ..
            } => {
                let _ = reply.send(Err(error.clone()));
            }
            JsCommand::Shutdown => break,
            _ => {}
        }
    }
}

/// Flush the event loop: run microtasks (Jobs) and pending macrotasks (timers).
fn flush_event_loop(context: &mut Context) {
    if let Err(e) = context.run_jobs() {
        let msg = exception_message(&e, context);
        log::error!("Error running Boa jobs: {}", msg);
    }
}
