//! JavaScript Engine Module
//!
//! A pure Boa JS engine host: one worker thread owns the `Context`,
//! extensions install native bindings into every context it creates.

mod builder;
mod client;
mod engine;
mod error;
mod protocol;

pub use builder::{JsEngineBuilder, JsEngineExtension};
pub use client::JsEngineClient;
pub use engine::{JsEngine, JsEngineHandle};
pub use error::{EngineError, exception_message};
pub use protocol::{EvalReply, JsCommand};
