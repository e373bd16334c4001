use boa_engine::{Context, JsError};
use thiserror::Error;

/// Failures surfaced by the engine host, as opposed to script-level `JsError`s.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The Boa context or one of its extensions failed to initialize.
    #[error("failed to initialize JS context: {0}")]
    ContextInit(String),
    /// The evaluated script threw.
    #[error("script error: {0}")]
    Script(String),
    /// The engine thread is gone.
    #[error("JS engine is not running")]
    Disconnected,
}

/// Render a thrown script value the way a host reports an uncaught exception.
///
/// Native errors (including `Error` objects thrown from script) render as
/// `Kind: message`. Any other thrown value uses its script string conversion.
pub fn exception_message(err: &JsError, context: &mut Context) -> String {
    match err.try_native(context) {
        Ok(native) => native.to_string(),
        Err(_) => err
            .to_opaque(context)
            .to_string(context)
            .map(|s| s.to_std_string_escaped())
            .unwrap_or_else(|_| err.to_string()),
    }
}
