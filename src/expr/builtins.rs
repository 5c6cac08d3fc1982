//! Builtin game-query functions.
//!
//! The set is closed: any other name is an evaluation error. Missing
//! arguments fall back to neutral defaults instead of failing, so a
//! half-written condition degrades to a false-ish value.

use crate::core::RandomSource;

use super::error::ExprError;
use super::value::Value;
use super::QueryContext;

const RANDI_DEFAULT_MAX: f64 = 10.0;

/// Invoke a builtin with already-evaluated arguments.
pub(crate) fn call(
    name: &str,
    args: &[Value],
    position: usize,
    ctx: &dyn QueryContext,
    rng: &mut dyn RandomSource,
) -> Result<Value, ExprError> {
    let number = |index: usize| -> Result<Option<f64>, ExprError> {
        args.get(index).map(Value::to_number).transpose()
    };
    let text = |index: usize| args.get(index).map(ToString::to_string);

    let value = match name {
        "itemCount" => Value::Number(text(0).map_or(0, |item| ctx.count_of(&item)) as f64),
        "hasStatus" => Value::Bool(text(0).is_some_and(|status| ctx.status_active(&status))),
        "randi" => {
            let max = number(0)?.map_or(RANDI_DEFAULT_MAX, f64::trunc);
            Value::Number((rng.next_f64() * max).trunc())
        }
        "min" | "max" => match (number(0)?, number(1)?) {
            (Some(a), Some(b)) => Value::Number(if name == "min" { a.min(b) } else { a.max(b) }),
            (Some(a), None) => Value::Number(a),
            _ => Value::Number(0.0),
        },
        "floor" => Value::Number(number(0)?.map_or(0.0, f64::trunc)),
        "clip" => match (number(0)?, number(1)?, number(2)?) {
            (Some(x), Some(lo), Some(hi)) => Value::Number(lo.max(hi.min(x))),
            (Some(x), _, _) => Value::Number(x),
            _ => Value::Number(0.0),
        },
        "eventOccurred" => Value::Bool(text(0).is_some_and(|id| ctx.event_occurred(&id))),
        "getAttributeValue" => Value::Number(text(0).map_or(0.0, |attr| ctx.variable(&attr))),
        _ => {
            return Err(ExprError::UnknownFunction {
                name: name.to_string(),
                position,
            })
        }
    };
    Ok(value)
}
