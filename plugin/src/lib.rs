//! # cef_test binding for Boa
//!
//! Hosts a Boa JavaScript engine on a worker thread and exposes the
//! `cef_test` test binding (`Dump` and `Call`) to scripts running in it.
//!
//! - [`js`] is the engine host. It owns the thread and the command channel,
//!   and it installs extensions into each context.
//! - [`binding`] is the `cef_test` namespace and the handler plumbing behind it.

pub mod binding;
pub mod js;

pub use binding::{BindingTestExtension, BindingTestHandler, NAMESPACE, init_test};
pub use js::{EngineError, JsEngine, JsEngineBuilder, JsEngineClient, JsEngineExtension, JsEngineHandle};
