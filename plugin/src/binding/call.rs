//! Two-stage member call: obtain an object from a function, then invoke one
//! of its methods by name.

use boa_engine::{Context, JsString, JsValue};

use crate::js::exception_message;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOutcome {
    pub handled: bool,
    /// Message of the most recent invocation that threw.
    pub exception: Option<String>,
}

impl CallOutcome {
    fn not_handled(exception: Option<String>) -> Self {
        Self {
            handled: false,
            exception,
        }
    }
}

/// `args` is `(getter, member_name, ...member_args)`.
///
/// `getter` is called on `receiver` with no arguments. The member named
/// `member_name` is then looked up on its result and called with `getter`
/// as `this` and the remaining arguments. A later exception replaces an
/// earlier one.
pub fn call_member(receiver: &JsValue, args: &[JsValue], context: &mut Context) -> CallOutcome {
    let [getter, member_name, member_args @ ..] = args else {
        log::debug!("Call: expected at least 2 arguments, got {}", args.len());
        return CallOutcome::not_handled(None);
    };

    let Some(getter_fn) = getter.as_object().filter(|o| o.is_callable()) else {
        log::debug!("Call: first argument is not a function");
        return CallOutcome::not_handled(None);
    };
    let getter_fn = getter_fn.clone();

    let Some(member_name) = member_name.as_string().map(|s| s.to_std_string_escaped()) else {
        log::debug!("Call: second argument is not a string");
        return CallOutcome::not_handled(None);
    };

    let mut exception = None;

    let target = match getter_fn.call(receiver, &[], context) {
        Ok(value) => value,
        Err(e) => {
            exception = Some(exception_message(&e, context));
            JsValue::undefined()
        }
    };

    let Some(target) = target.as_object() else {
        log::debug!("Call: getter did not return an object");
        return CallOutcome::not_handled(exception);
    };
    let target = target.clone();

    let member = match target.get(JsString::from(member_name.as_str()), context) {
        Ok(member) => member,
        Err(e) => {
            log::debug!("Call: reading '{}' threw: {}", member_name, e);
            return CallOutcome::not_handled(exception);
        }
    };

    let Some(member_fn) = member.as_object().filter(|o| o.is_callable()) else {
        log::debug!("Call: '{}' is not a function", member_name);
        return CallOutcome::not_handled(exception);
    };
    let member_fn = member_fn.clone();

    if let Err(e) = member_fn.call(getter, member_args, context) {
        exception = Some(exception_message(&e, context));
    }

    CallOutcome {
        handled: true,
        exception,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::JsEngineBuilder;
    use boa_engine::Source;

    fn context() -> Context {
        JsEngineBuilder::new()
            .with_runtime_extensions(false)
            .build_context()
            .unwrap()
    }

    fn eval(context: &mut Context, source: &str) -> JsValue {
        context.eval(Source::from_bytes(source)).unwrap()
    }

    fn eval_string(context: &mut Context, source: &str) -> String {
        eval(context, source)
            .to_string(context)
            .unwrap()
            .to_std_string_escaped()
    }

    fn setup(context: &mut Context) -> JsValue {
        eval(
            context,
            r#"
            var seen = null;
            var target = {
                greet: function(a, b) { seen = { self: this, args: [a, b], count: arguments.length }; },
                boom: function() { throw new Error('member failed'); },
                notfn: 3
            };
            function getTarget() { return target; }
            getTarget
            "#,
        )
    }

    #[test]
    fn test_single_argument_not_handled() {
        let mut context = context();
        let getter = setup(&mut context);
        let outcome = call_member(&JsValue::undefined(), &[getter], &mut context);
        assert_eq!(outcome, CallOutcome::default());
    }

    #[test]
    fn test_wrong_argument_types_not_handled() {
        let mut context = context();
        let getter = setup(&mut context);
        let name = JsValue::from(JsString::from("greet"));

        let outcome = call_member(&JsValue::undefined(), &[name.clone(), name.clone()], &mut context);
        assert!(!outcome.handled);

        let outcome = call_member(&JsValue::undefined(), &[getter, JsValue::from(1)], &mut context);
        assert!(!outcome.handled);
    }

    #[test]
    fn test_non_object_result_not_handled() {
        let mut context = context();
        let getter = eval(&mut context, "(function() { return 42; })");
        let name = JsValue::from(JsString::from("name"));
        assert!(!call_member(&JsValue::undefined(), &[getter, name], &mut context).handled);
    }

    #[test]
    fn test_missing_member_not_handled() {
        let mut context = context();
        let getter = setup(&mut context);
        for name in ["missing", "notfn"] {
            let name = JsValue::from(JsString::from(name));
            let outcome = call_member(&JsValue::undefined(), &[getter.clone(), name], &mut context);
            assert!(!outcome.handled);
        }
    }

    #[test]
    fn test_member_called_with_getter_as_receiver() {
        let mut context = context();
        let getter = setup(&mut context);
        let args = [
            getter,
            JsValue::from(JsString::from("greet")),
            JsValue::from(JsString::from("a")),
            JsValue::from(JsString::from("b")),
        ];

        let outcome = call_member(&JsValue::undefined(), &args, &mut context);
        assert_eq!(
            outcome,
            CallOutcome {
                handled: true,
                exception: None
            }
        );
        assert_eq!(eval_string(&mut context, "seen.self === getTarget"), "true");
        assert_eq!(eval_string(&mut context, "seen.args.join(',')"), "a,b");
        assert_eq!(eval_string(&mut context, "seen.count"), "2");
    }

    #[test]
    fn test_getter_runs_on_receiver() {
        let mut context = context();
        let receiver = eval(
            &mut context,
            "var holder = { target: { hit: function() { holder.hit = true; } } }; holder",
        );
        let getter = eval(&mut context, "(function() { return this.target; })");
        let args = [getter, JsValue::from(JsString::from("hit"))];

        assert!(call_member(&receiver, &args, &mut context).handled);
        assert_eq!(eval_string(&mut context, "holder.hit"), "true");
    }

    #[test]
    fn test_member_exception_is_captured() {
        let mut context = context();
        let getter = setup(&mut context);
        let args = [getter, JsValue::from(JsString::from("boom"))];

        let outcome = call_member(&JsValue::undefined(), &args, &mut context);
        assert!(outcome.handled);
        let exception = outcome.exception.unwrap();
        assert!(exception.contains("member failed"), "{exception}");
    }

    #[test]
    fn test_getter_exception_not_handled() {
        let mut context = context();
        let getter = eval(&mut context, "(function() { throw 'getter failed'; })");
        let args = [getter, JsValue::from(JsString::from("greet"))];

        let outcome = call_member(&JsValue::undefined(), &args, &mut context);
        assert!(!outcome.handled);
        assert_eq!(outcome.exception.as_deref(), Some("getter failed"));
    }
}
