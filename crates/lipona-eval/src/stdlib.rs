//! The standard library: a flat table of builtins bound into every root scope.
//!
//! Collection builtins never modify their inputs; each returns a new value.

use std::collections::BTreeMap;

use crate::env::Environment;
use crate::error::{EvalResult, Pakala};
use crate::output::Output;
use crate::value::{Arity, Builtin, Value, F64_SAFE_INT_MAX};

/// Every builtin, in registration order.
pub static BUILTINS: [Builtin; 13] = [
    // I/O
    builtin("toki", Arity::Variadic, toki),
    // Numbers
    builtin("nanpa_sin", Arity::Exact(1), nanpa_sin),
    builtin("nanpa_len", Arity::Exact(1), nanpa_len),
    // Strings
    builtin("sitelen_len", Arity::Exact(1), sitelen_len),
    builtin("sitelen_sama", Arity::Exact(2), sitelen_sama),
    // Lists
    builtin("kulupu_sin", Arity::Variadic, kulupu_sin),
    builtin("kulupu_len", Arity::Exact(1), kulupu_len),
    builtin("kulupu_ken", Arity::Exact(2), kulupu_ken),
    builtin("kulupu_lon", Arity::Exact(3), kulupu_lon),
    builtin("kulupu_aksen", Arity::Exact(2), kulupu_aksen),
    // Maps
    builtin("nasin_sin", Arity::Exact(0), nasin_sin),
    builtin("nasin_ken", Arity::Exact(2), nasin_ken),
    builtin("nasin_lon", Arity::Exact(3), nasin_lon),
];

const fn builtin(
    name: &'static str,
    arity: Arity,
    func: fn(&mut dyn Output, Vec<Value>) -> EvalResult<Value>,
) -> Builtin {
    Builtin { name, arity, func }
}

/// Bind every builtin into `env`.
pub fn install(env: &mut Environment) {
    for b in &BUILTINS {
        env.define(b.name, Value::Builtin(*b));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// I/O
// ══════════════════════════════════════════════════════════════════════════════

/// `toki(...)`: print display text, space-joined, as one line.
fn toki(out: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    out.write_line(&line);
    Ok(Value::Null)
}

// ══════════════════════════════════════════════════════════════════════════════
// Numbers
// ══════════════════════════════════════════════════════════════════════════════

/// `nanpa_sin(s)`: string to number.
fn nanpa_sin(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take("nanpa_sin", args)?;
    match &value {
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::String(s) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Number(n)),
            _ => Err(Pakala::UnparsableNumber(s.clone())),
        },
        other => Err(Pakala::expected("sitelen", other)),
    }
}

/// `nanpa_len(n)`: digits in the integer part.
fn nanpa_len(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take("nanpa_len", args)?;
    let n = expect_number(&value)?;
    if !n.is_finite() {
        return Err(Pakala::TypeMismatch(format!(
            "expected a finite nanpa, got {n}"
        )));
    }
    let int_part = n.abs().trunc();
    let digits = if int_part < 1.0 {
        1
    } else {
        format!("{int_part:.0}").len()
    };
    Ok(Value::Number(digits as f64))
}

// ══════════════════════════════════════════════════════════════════════════════
// Strings
// ══════════════════════════════════════════════════════════════════════════════

/// `sitelen_len(s)`: character count.
fn sitelen_len(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take("sitelen_len", args)?;
    let s = expect_string(&value)?;
    Ok(Value::Number(s.chars().count() as f64))
}

/// `sitelen_sama(a, b)`: content equality.
fn sitelen_sama(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [a, b] = take("sitelen_sama", args)?;
    Ok(Value::Bool(expect_string(&a)? == expect_string(&b)?))
}

// ══════════════════════════════════════════════════════════════════════════════
// Lists
// ══════════════════════════════════════════════════════════════════════════════

/// `kulupu_sin(...)`: a list of the arguments.
fn kulupu_sin(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    Ok(Value::list(args))
}

fn kulupu_len(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [list] = take("kulupu_len", args)?;
    Ok(Value::Number(expect_list(&list)?.len() as f64))
}

/// `kulupu_ken(list, i)`: element at `i`, or `ala` when out of range.
fn kulupu_ken(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [list, index] = take("kulupu_ken", args)?;
    let items = expect_list(&list)?;
    let index = whole_index(expect_number(&index)?)?;
    Ok(index
        .and_then(|i| items.get(i))
        .cloned()
        .unwrap_or(Value::Null))
}

/// `kulupu_lon(list, i, val)`: a copy with element `i` replaced.
fn kulupu_lon(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [list, index, value] = take("kulupu_lon", args)?;
    let items = expect_list(&list)?;
    let raw = expect_number(&index)?;
    let slot = whole_index(raw)?.filter(|&i| i < items.len());
    let Some(i) = slot else {
        return Err(Pakala::IndexOutOfRange {
            index: raw,
            len: items.len(),
        });
    };
    let mut new_items = items.to_vec();
    new_items[i] = value;
    Ok(Value::list(new_items))
}

/// `kulupu_aksen(list, val)`: a copy with `val` appended.
fn kulupu_aksen(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [list, value] = take("kulupu_aksen", args)?;
    let mut new_items = expect_list(&list)?.to_vec();
    new_items.push(value);
    Ok(Value::list(new_items))
}

// ══════════════════════════════════════════════════════════════════════════════
// Maps
// ══════════════════════════════════════════════════════════════════════════════

fn nasin_sin(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [] = take("nasin_sin", args)?;
    Ok(Value::map(BTreeMap::new()))
}

/// `nasin_ken(map, key)`: value at `key`, or `ala` when missing.
fn nasin_ken(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [map, key] = take("nasin_ken", args)?;
    let entries = expect_map(&map)?;
    let key = expect_string(&key)?;
    Ok(entries.get(key).cloned().unwrap_or(Value::Null))
}

/// `nasin_lon(map, key, val)`: a copy with `key` set to `val`.
fn nasin_lon(_: &mut dyn Output, args: Vec<Value>) -> EvalResult<Value> {
    let [map, key, value] = take("nasin_lon", args)?;
    let mut entries = expect_map(&map)?.clone();
    entries.insert(expect_string(&key)?.to_string(), value);
    Ok(Value::map(entries))
}

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Check the argument count and unpack the arguments.
fn take<const N: usize>(name: &str, args: Vec<Value>) -> EvalResult<[Value; N]> {
    let got = args.len();
    args.try_into().map_err(|_| Pakala::WrongArity {
        name: name.to_string(),
        expected: N,
        got,
    })
}

fn expect_number(value: &Value) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(Pakala::expected("nanpa", other)),
    }
}

fn expect_string(value: &Value) -> EvalResult<&str> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Pakala::expected("sitelen", other)),
    }
}

fn expect_list(value: &Value) -> EvalResult<&[Value]> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(Pakala::expected("kulupu", other)),
    }
}

fn expect_map(value: &Value) -> EvalResult<&BTreeMap<String, Value>> {
    match value {
        Value::Map(entries) => Ok(entries),
        other => Err(Pakala::expected("nasin", other)),
    }
}

/// Validate an index. Fractions and non-finite values fault; negative or
/// huge indices are `None` (never in range).
fn whole_index(n: f64) -> EvalResult<Option<usize>> {
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(Pakala::InvalidIndex(n));
    }
    if n < 0.0 || n > F64_SAFE_INT_MAX {
        return Ok(None);
    }
    Ok(Some(n as usize))
}
