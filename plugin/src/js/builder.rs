use std::sync::mpsc;

use boa_engine::{Context, JsError};
use boa_runtime::extensions::{ConsoleExtension, MicrotaskExtension, TimeoutExtension};

use crate::js::{JsCommand, JsEngine, JsEngineClient};

pub struct JsEngineBuilder {
    extensions: Vec<Box<dyn JsEngineExtension>>,
    runtime_extensions: bool,
    client: JsEngineClient,
    receiver: mpsc::Receiver<JsCommand>,
}

impl Default for JsEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsEngineBuilder {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        JsEngineBuilder {
            extensions: vec![],
            runtime_extensions: true,
            client: JsEngineClient { sender },
            receiver,
        }
    }

    pub fn with_extension(mut self, extension: impl JsEngineExtension) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Toggle the boa_runtime console, timeout and microtask extensions.
    pub fn with_runtime_extensions(mut self, enabled: bool) -> Self {
        self.runtime_extensions = enabled;
        self
    }

    /// Build a context on the calling thread, with every extension registered.
    ///
    /// Commands sent through the client handed to extensions are only
    /// processed by an engine built with [`JsEngineBuilder::build`].
    pub fn build_context(&self) -> Result<Context, JsError> {
        build_context(&self.extensions, self.runtime_extensions, self.client.clone())
    }

    pub fn build(self) -> JsEngine {
        let client = self.client.clone();
        let extensions = self.extensions;
        let runtime_extensions = self.runtime_extensions;

        JsEngine {
            client: self.client,
            context_builder: Box::new(move || {
                build_context(&extensions, runtime_extensions, client)
            }),
            receiver: self.receiver,
        }
    }
}

/// Hook run once for every script context the engine creates.
pub trait JsEngineExtension: Send + Sync + 'static {
    fn register(&self, context: &mut Context, client: JsEngineClient) -> Result<(), JsError>;
}

fn build_context(
    extensions: &[Box<dyn JsEngineExtension>],
    runtime_extensions: bool,
    client: JsEngineClient,
) -> Result<Context, JsError> {
    let mut context = Context::builder().build()?;

    if runtime_extensions {
        boa_runtime::register(
            (
                ConsoleExtension::default(),
                TimeoutExtension {},
                MicrotaskExtension {},
            ),
            None,
            &mut context,
        )?;
    }

    for extension in extensions {
        extension.register(&mut context, client.clone())?;
    }

    log::debug!("JS context built with {} extension(s)", extensions.len());
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::{JsString, JsValue, Source};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Marker(Arc<AtomicUsize>);

    impl JsEngineExtension for Marker {
        fn register(&self, context: &mut Context, _client: JsEngineClient) -> Result<(), JsError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            context
                .global_object()
                .set(JsString::from("marker"), JsValue::from(7), false, context)?;
            Ok(())
        }
    }

    #[test]
    fn test_extensions_run_per_context() {
        let count = Arc::new(AtomicUsize::new(0));
        let builder = JsEngineBuilder::new().with_extension(Marker(count.clone()));

        let mut first = builder.build_context().unwrap();
        let _second = builder.build_context().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        let value = first.eval(Source::from_bytes("marker")).unwrap();
        assert_eq!(value.as_number(), Some(7.0));
    }

    #[test]
    fn test_runtime_extensions_toggle() {
        let mut with = JsEngineBuilder::new().build_context().unwrap();
        let has_console = with.eval(Source::from_bytes("typeof console")).unwrap();
        assert_eq!(has_console.as_string().unwrap().to_std_string_escaped(), "object");

        let mut without = JsEngineBuilder::new()
            .with_runtime_extensions(false)
            .build_context()
            .unwrap();
        let no_console = without.eval(Source::from_bytes("typeof console")).unwrap();
        assert_eq!(no_console.as_string().unwrap().to_std_string_escaped(), "undefined");
    }
}
