//! Expression evaluation for `eval` entries.
//!
//! An entry value written as a string is parsed as a Starlark expression and
//! evaluated with the entry's `eval_env` bound as module variables.

use datagen_codegen::{Record, Value};
use starlark::environment::{Globals, Module};
use starlark::eval::Evaluator;
use starlark::syntax::{AstModule, Dialect};
use starlark::values::dict::DictRef;
use starlark::values::list::ListRef;
use starlark::values::{Heap, Value as StarlarkValue};

use super::error::{ConfigError, ConfigResult};

/// Evaluates `source` with `env` in scope. A `None` result is the absent
/// value.
pub(crate) fn evaluate(source: &str, env: &Record, context: &str) -> ConfigResult<Option<Value>> {
    let ast = AstModule::parse(context, source.to_string(), &Dialect::Standard)
        .map_err(|e| ConfigError::eval(context, e))?;

    let module = Module::new();
    for (name, value) in env.fields() {
        let value = alloc(module.heap(), value, context)?;
        module.set(name, value);
    }

    let globals = Globals::standard();
    let mut eval = Evaluator::new(&module);
    let result = eval
        .eval_module(ast, &globals)
        .map_err(|e| ConfigError::eval(context, e))?;

    if result.is_none() {
        return Ok(None);
    }
    from_starlark(result, context).map(Some)
}

fn alloc<'v>(heap: &'v Heap, value: &Value, context: &str) -> ConfigResult<StarlarkValue<'v>> {
    Ok(match value {
        Value::Bool(b) => heap.alloc(*b),
        Value::Int8(v) => heap.alloc(i32::from(*v)),
        Value::Int16(v) => heap.alloc(i32::from(*v)),
        Value::Int32(v) => heap.alloc(*v),
        Value::Int64(v) => heap.alloc(*v),
        Value::UInt8(v) => heap.alloc(i32::from(*v)),
        Value::UInt16(v) => heap.alloc(i32::from(*v)),
        Value::UInt32(v) => heap.alloc(i64::from(*v)),
        Value::UInt64(v) => heap.alloc(*v),
        Value::Float32(v) => heap.alloc(f64::from(*v)),
        Value::Float64(v) => heap.alloc(*v),
        Value::String(s) => heap.alloc(s.as_str()),
        Value::Sequence(items) => {
            let items = items
                .iter()
                .map(|item| alloc(heap, item, context))
                .collect::<ConfigResult<Vec<_>>>()?;
            heap.alloc(items)
        }
        Value::Record(_) => {
            return Err(ConfigError::Eval {
                context: context.to_string(),
                message: "mappings cannot be bound in eval_env".to_string(),
            })
        }
    })
}

/// Integers take the narrowest of `int32`, `int64` and `uint64`, as YAML
/// numbers do.
fn from_starlark(value: StarlarkValue, context: &str) -> ConfigResult<Value> {
    let eval_error = |what: String| ConfigError::Eval {
        context: context.to_string(),
        message: what,
    };

    if let Some(b) = value.unpack_bool() {
        return Ok(Value::Bool(b));
    }
    if let Some(i) = value.unpack_i32() {
        return Ok(Value::Int32(i));
    }
    // `unpack_i32` misses big ints; their decimal form is exact.
    if value.get_type() == "int" {
        let s = value.to_str();
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Value::Int64(i));
        }
        return s
            .parse::<u64>()
            .map(Value::UInt64)
            .map_err(|_| eval_error(format!("int {} does not fit 64 bits", s)));
    }
    if let Some(s) = value.unpack_str() {
        return Ok(Value::String(s.to_string()));
    }
    if value.get_type() == "float" {
        let s = value.to_str();
        return s
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|_| eval_error(format!("unreadable float {}", s)));
    }
    if let Some(list) = ListRef::from_value(value) {
        return list
            .iter()
            .map(|item| from_starlark(item, context))
            .collect::<ConfigResult<_>>()
            .map(Value::Sequence);
    }
    if let Some(dict) = DictRef::from_value(value) {
        let mut record = Record::new();
        for (k, v) in dict.iter() {
            let key = k
                .unpack_str()
                .ok_or_else(|| eval_error(format!("dict key of type {}", k.get_type())))?;
            record.push(key, from_starlark(v, context)?);
        }
        return Ok(Value::Record(record));
    }

    Err(eval_error(format!("unsupported result type {}", value.get_type())))
}
