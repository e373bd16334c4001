//! Native Handlers
//!
//! A `NativeHandler` receives every call made to the script functions bound
//! to it, together with the name the function was registered under. One
//! handler instance can back any number of functions.

use boa_engine::object::FunctionObjectBuilder;
use boa_engine::object::builtins::JsFunction;
use boa_engine::{Context, JsNativeError, JsResult, JsString, JsValue, NativeFunction};
use boa_gc::{Finalize, Trace, empty_trace};
use std::rc::Rc;

/// Result of a single native call.
#[derive(Debug, Clone, Default)]
pub struct Execution {
    /// Whether the handler recognised the call. An unhandled call returns
    /// `undefined` to script and drops `retval` and `exception`.
    pub handled: bool,
    pub retval: Option<JsValue>,
    /// Message to throw back into script as an `Error`.
    pub exception: Option<String>,
}

impl Execution {
    pub fn not_handled() -> Self {
        Self::default()
    }

    pub fn handled(retval: Option<JsValue>) -> Self {
        Self {
            handled: true,
            retval,
            exception: None,
        }
    }

    pub fn with_exception(mut self, exception: Option<String>) -> Self {
        self.exception = exception;
        self
    }
}

pub trait NativeHandler {
    /// Execute the function registered as `name`, invoked on `receiver`.
    fn execute(
        &self,
        name: &str,
        receiver: &JsValue,
        args: &[JsValue],
        context: &mut Context,
    ) -> Execution;
}

/// Captures for a bound function: its registered name and the shared handler.
#[derive(Clone, Finalize)]
struct BoundHandler {
    name: Rc<str>,
    handler: Rc<dyn NativeHandler>,
}

// Handlers hold no GC-managed values between calls.
unsafe impl Trace for BoundHandler {
    empty_trace!();
}

/// Create a script function named `name` that dispatches to `handler`.
pub fn bind_function(
    name: &str,
    handler: Rc<dyn NativeHandler>,
    context: &mut Context,
) -> JsFunction {
    let captures = BoundHandler {
        name: Rc::from(name),
        handler,
    };

    let function = NativeFunction::from_copy_closure_with_captures(
        move |this: &JsValue, args: &[JsValue], bound: &BoundHandler, ctx: &mut Context| {
            dispatch(this, args, bound, ctx)
        },
        captures,
    );

    FunctionObjectBuilder::new(context.realm(), function)
        .name(JsString::from(name))
        .length(0)
        .constructor(false)
        .build()
}

fn dispatch(
    this: &JsValue,
    args: &[JsValue],
    bound: &BoundHandler,
    ctx: &mut Context,
) -> JsResult<JsValue> {
    let execution = bound.handler.execute(&bound.name, this, args, ctx);

    if !execution.handled {
        log::debug!("{}: call not handled", bound.name);
        return Ok(JsValue::undefined());
    }

    if let Some(exception) = execution.exception {
        log::debug!("{}: rethrowing {}", bound.name, exception);
        return Err(JsNativeError::error().with_message(exception).into());
    }

    Ok(execution.retval.unwrap_or_else(JsValue::undefined))
}
