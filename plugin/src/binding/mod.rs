//! `cef_test` Binding
//!
//! Installs a `cef_test` namespace with two functions on a context's global
//! object, used to exercise native bindings from script:
//!
//! - `cef_test.Dump(...)` returns a readable dump of its arguments.
//! - `cef_test.Call(fn, name, ...)` calls `fn()` to get an object, then calls
//!   `object[name]` on `fn` with the remaining arguments.
//!
//! ## Example
//!
//! ```rust
//! use cef_binding::{BindingTestExtension, JsEngineBuilder};
//!
//! let engine = JsEngineBuilder::new()
//!     .with_extension(BindingTestExtension)
//!     .build()
//!     .spawn();
//!
//! let dump = engine.client().evaluate("cef_test.Dump(5, 'x')").unwrap();
//! assert_eq!(dump, "arg[0] = (int) 5\narg[1] = (string) x\n");
//! engine.join();
//! ```

mod call;
mod dump;
mod handler;

use boa_engine::object::ObjectInitializer;
use boa_engine::{Context, JsError, JsObject, JsResult, JsString, JsValue};
use std::rc::Rc;

use crate::js::{JsEngineClient, JsEngineExtension};

pub use call::{CallOutcome, call_member};
pub use dump::{Dumper, ValueKind, format_double};
pub use handler::{Execution, NativeHandler, bind_function};

/// Name of the namespace object on the global object.
pub const NAMESPACE: &str = "cef_test";

/// Backs both `Dump` and `Call`, dispatching on the registered name.
#[derive(Debug, Clone)]
pub struct BindingTestHandler {
    dumper: Dumper,
}

impl BindingTestHandler {
    pub fn new(context: &mut Context) -> JsResult<Self> {
        Ok(Self {
            dumper: Dumper::new(context)?,
        })
    }
}

impl NativeHandler for BindingTestHandler {
    fn execute(
        &self,
        name: &str,
        receiver: &JsValue,
        args: &[JsValue],
        context: &mut Context,
    ) -> Execution {
        match name {
            "Dump" => {
                let dump = self.dumper.dump_arguments(args, context);
                Execution::handled(Some(JsValue::from(JsString::from(dump.as_str()))))
            }
            "Call" => {
                let outcome = call_member(receiver, args, context);
                if outcome.handled {
                    Execution::handled(None).with_exception(outcome.exception)
                } else {
                    Execution::not_handled().with_exception(outcome.exception)
                }
            }
            _ => Execution::not_handled(),
        }
    }
}

/// Create the `cef_test` namespace on `global` and register `Dump` and `Call`.
pub fn init_test(global: &JsObject, context: &mut Context) -> JsResult<JsObject> {
    let namespace = ObjectInitializer::new(context).build();
    global.set(JsString::from(NAMESPACE), namespace.clone(), false, context)?;

    let handler: Rc<dyn NativeHandler> = Rc::new(BindingTestHandler::new(context)?);

    for name in ["Dump", "Call"] {
        let function = bind_function(name, handler.clone(), context);
        namespace.set(JsString::from(name), function, false, context)?;
    }

    log::debug!("Registered {}.Dump and {}.Call", NAMESPACE, NAMESPACE);
    Ok(namespace)
}

/// Engine extension that runs [`init_test`] on every new context.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingTestExtension;

impl JsEngineExtension for BindingTestExtension {
    fn register(&self, context: &mut Context, _client: JsEngineClient) -> Result<(), JsError> {
        log::info!("Registering {} binding", NAMESPACE);
        let global = context.global_object();
        init_test(&global, context)?;
        Ok(())
    }
}
