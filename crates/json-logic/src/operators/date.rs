//! Date comparisons: `afterDate`, `beforeDate`.
//!
//! Both operands are parsed into instants. Accepted forms are RFC 3339
//! timestamps, `YYYY-MM-DD` (midnight UTC), `YYYY-MM-DDTHH:MM[:SS[.fff]]`
//! (read as UTC) and numbers (milliseconds since the epoch). Anything
//! unparseable compares as `false`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::{eval_args, nth};
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Arity, JsValue, OperatorDefinition};

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Milliseconds since the Unix epoch, or `None` for an invalid date.
///
/// # Example
///
/// ```
/// use json_logic::operators::date::to_epoch_millis;
/// use json_logic::JsValue;
///
/// assert_eq!(to_epoch_millis(&JsValue::from("1970-01-02")), Some(86_400_000));
/// assert_eq!(to_epoch_millis(&JsValue::from("1970-01-01T00:00:01Z")), Some(1_000));
/// assert_eq!(to_epoch_millis(&JsValue::from("yesterday")), None);
/// ```
pub fn to_epoch_millis(value: &JsValue) -> Option<i64> {
    match value {
        JsValue::Json(Value::String(s)) => parse_date(s.trim()),
        JsValue::Json(Value::Number(n)) => {
            let ms = n.as_f64()?;
            ms.is_finite().then_some(ms.trunc() as i64)
        }
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn compare(operands: &[Value], ctx: &EvalCtx<'_>, after: bool) -> Result<JsValue, EvalError> {
    let args = eval_args(operands, ctx)?;
    let result = match (to_epoch_millis(&nth(&args, 0)), to_epoch_millis(&nth(&args, 1))) {
        (Some(date), Some(other)) if after => date > other,
        (Some(date), Some(other)) => date < other,
        _ => false,
    };
    Ok(JsValue::from(result))
}

fn after_date_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    compare(operands, ctx, true)
}

fn before_date_eval(operands: &[Value], ctx: &EvalCtx<'_>) -> Result<JsValue, EvalError> {
    compare(operands, ctx, false)
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition::builtin("afterDate", &[], Arity::Fixed(2), after_date_eval),
        OperatorDefinition::builtin("beforeDate", &[], Arity::Fixed(2), before_date_eval),
    ]
}
