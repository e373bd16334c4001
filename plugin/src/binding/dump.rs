//! Human-readable dumps of script values.

use boa_engine::{Context, JsObject, JsResult, JsString, JsValue};
use std::collections::HashSet;
use std::fmt::{self, Write};

const INDENT: &str = "  ";

/// Kind of a script value, in the order values are classified.
#[derive(Debug, Clone)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool(bool),
    Int(i32),
    Double(f64),
    String(String),
    Function(JsObject),
    Array(JsObject),
    Object(JsObject),
    /// Symbols and bigints. Printed without annotation.
    Other,
}

impl ValueKind {
    pub fn classify(value: &JsValue) -> Self {
        if value.is_undefined() {
            return ValueKind::Undefined;
        }
        if value.is_null() {
            return ValueKind::Null;
        }
        if let Some(b) = value.as_boolean() {
            return ValueKind::Bool(b);
        }
        if let Some(n) = value.as_number() {
            return match as_int(n) {
                Some(i) => ValueKind::Int(i),
                None => ValueKind::Double(n),
            };
        }
        if let Some(s) = value.as_string() {
            return ValueKind::String(s.to_std_string_escaped());
        }
        if let Some(object) = value.as_object() {
            let object = object.clone();
            if object.is_callable() {
                return ValueKind::Function(object);
            }
            if object.is_array() {
                return ValueKind::Array(object);
            }
            return ValueKind::Object(object);
        }
        ValueKind::Other
    }
}

/// Integral numbers that fit an `i32` are ints; `-0` stays a double.
fn as_int(n: f64) -> Option<i32> {
    let fits = n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX);
    if fits && !(n == 0.0 && n.is_sign_negative()) {
        Some(n as i32)
    } else {
        None
    }
}

/// Formats script values.
///
/// Key enumeration goes through the `Object.keys` and
/// `Object.getOwnPropertyNames` builtins as they were when the dumper was
/// created, so scripts that later replace them do not change the output.
#[derive(Debug, Clone)]
pub struct Dumper {
    keys: JsObject,
    names: JsObject,
}

impl Dumper {
    /// Capture the key enumeration builtins of `context`'s realm.
    pub fn new(context: &mut Context) -> JsResult<Self> {
        let object_ctor = context.intrinsics().constructors().object().constructor();
        let keys = builtin(&object_ctor, "keys", context)?;
        let names = builtin(&object_ctor, "getOwnPropertyNames", context)?;
        Ok(Self { keys, names })
    }

    /// Dump every argument on its own `arg[i] = ...` line.
    pub fn dump_arguments(&self, args: &[JsValue], context: &mut Context) -> String {
        let mut out = String::new();
        if let Err(e) = self.write_arguments(&mut out, args, context) {
            log::warn!("Dump: formatting failed: {}", e);
        }
        out
    }

    /// Format a single value. Nested entries are indented one level deeper than `indent`.
    pub fn format_value(&self, value: &JsValue, indent: usize, context: &mut Context) -> String {
        let mut out = String::new();
        if let Err(e) = self.write_value(&mut out, value, indent, &mut Vec::new(), context) {
            log::warn!("Dump: formatting failed: {}", e);
        }
        out
    }

    fn write_arguments(
        &self,
        out: &mut String,
        args: &[JsValue],
        context: &mut Context,
    ) -> fmt::Result {
        for (i, arg) in args.iter().enumerate() {
            write!(out, "arg[{i}] = ")?;
            self.write_value(out, arg, 0, &mut Vec::new(), context)?;
            out.push('\n');
        }
        Ok(())
    }

    /// `ancestors` holds the containers currently being printed.
    fn write_value(
        &self,
        out: &mut String,
        value: &JsValue,
        indent: usize,
        ancestors: &mut Vec<JsObject>,
        context: &mut Context,
    ) -> fmt::Result {
        let pad = INDENT.repeat(indent);

        match ValueKind::classify(value) {
            ValueKind::Undefined => out.write_str("(undefined)"),
            ValueKind::Null => out.write_str("(null)"),
            ValueKind::Bool(b) => write!(out, "(bool) {b}"),
            ValueKind::Int(i) => write!(out, "(int) {i}"),
            ValueKind::Double(d) => write!(out, "(double) {}", format_double(d)),
            ValueKind::String(s) => write!(out, "(string) {s}"),
            ValueKind::Function(function) => {
                let name = read(&function, JsString::from("name"), context);
                let name = name
                    .as_string()
                    .map(|s| s.to_std_string_escaped())
                    .unwrap_or_default();
                write!(out, "(function) {name}")
            }
            ValueKind::Array(array) => {
                out.write_str("(array) [")?;
                if is_ancestor(ancestors, &array) {
                    return out.write_str("circular]");
                }
                let length = read(&array, JsString::from("length"), context)
                    .to_length(context)
                    .unwrap_or(0);
                ancestors.push(array.clone());
                for i in 0..length {
                    write!(out, "\n{INDENT}{pad}{i} = ")?;
                    let element = read_index(&array, i, context);
                    self.write_value(out, &element, indent + 1, ancestors, context)?;
                }
                ancestors.pop();
                write!(out, "\n{pad}]")
            }
            ValueKind::Object(object) => {
                out.write_str("(object) [")?;
                if is_ancestor(ancestors, &object) {
                    return out.write_str("circular]");
                }
                ancestors.push(object.clone());
                for key in self.object_keys(&object, context) {
                    write!(out, "\n{INDENT}{pad}{key} = ")?;
                    let property = read(&object, JsString::from(key.as_str()), context);
                    self.write_value(out, &property, indent + 1, ancestors, context)?;
                }
                ancestors.pop();
                write!(out, "\n{pad}]")
            }
            ValueKind::Other => Ok(()),
        }
    }

    /// Enumerable string keys in for-in order: own keys first, then those
    /// inherited from each prototype and not shadowed by a nearer property.
    fn object_keys(&self, object: &JsObject, context: &mut Context) -> Vec<String> {
        match self.enumerable_keys(object, context) {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("Dump: enumerating keys threw: {}", e);
                Vec::new()
            }
        }
    }

    fn enumerable_keys(&self, object: &JsObject, context: &mut Context) -> JsResult<Vec<String>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(object.clone());

        while let Some(level) = current {
            for key in call_for_strings(&self.keys, &level, context)? {
                if !seen.contains(&key) {
                    out.push(key);
                }
            }
            seen.extend(call_for_strings(&self.names, &level, context)?);
            current = level.prototype();
        }

        Ok(out)
    }
}

fn builtin(object_ctor: &JsObject, name: &str, context: &mut Context) -> JsResult<JsObject> {
    let value = object_ctor.get(JsString::from(name), context)?;
    match value.as_object() {
        Some(function) if function.is_callable() => Ok(function.clone()),
        _ => Err(boa_engine::JsNativeError::typ()
            .with_message(format!("Object.{name} is not a function"))
            .into()),
    }
}

/// Call a captured `Object.*` builtin on `object` and collect the array it returns.
fn call_for_strings(
    function: &JsObject,
    object: &JsObject,
    context: &mut Context,
) -> JsResult<Vec<String>> {
    let result = function.call(
        &JsValue::undefined(),
        &[JsValue::from(object.clone())],
        context,
    )?;
    let Some(array) = result.as_object() else {
        return Ok(Vec::new());
    };
    let array = array.clone();

    let length = array
        .get(JsString::from("length"), context)?
        .to_length(context)?;
    let mut out = Vec::new();
    for i in 0..length {
        let Ok(index) = u32::try_from(i) else { break };
        let key = array.get(index, context)?.to_string(context)?;
        out.push(key.to_std_string_escaped());
    }
    Ok(out)
}

fn is_ancestor(ancestors: &[JsObject], object: &JsObject) -> bool {
    ancestors.iter().any(|a| JsObject::equals(a, object))
}

/// Default C++ stream formatting for doubles: six significant digits,
/// fixed or exponent form (whichever `%g` picks), trailing zeros removed.
pub fn format_double(n: f64) -> String {
    const PRECISION: i32 = 6;

    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        let inf = if n > 0.0 { "inf" } else { "-inf" };
        return inf.to_string();
    }
    if n == 0.0 {
        let zero = if n.is_sign_negative() { "-0" } else { "0" };
        return zero.to_string();
    }

    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{n:.decimals$}")).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Property reads that throw (getters, proxies) dump as `undefined`.
fn read(object: &JsObject, key: JsString, context: &mut Context) -> JsValue {
    object.get(key.clone(), context).unwrap_or_else(|e| {
        log::warn!(
            "Dump: reading '{}' threw: {}",
            key.to_std_string_escaped(),
            e
        );
        JsValue::undefined()
    })
}

fn read_index(array: &JsObject, index: u64, context: &mut Context) -> JsValue {
    let Ok(index) = u32::try_from(index) else {
        return JsValue::undefined();
    };
    array.get(index, context).unwrap_or_else(|e| {
        log::warn!("Dump: reading index {} threw: {}", index, e);
        JsValue::undefined()
    })
}
