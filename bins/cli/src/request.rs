//! Request shaping before summarization.

use serde_json::{Map, Value, json};
use tally_shared::SummaryConfig;

/// Fills configured defaults into a summarization request.
///
/// A bare array is taken as the entry list. A missing or null `options`
/// object is created. Options the request already sets are left alone;
/// `force_enforce` turns balance enforcement on regardless. Anything that is
/// not an object is returned untouched so that summarization reports it.
pub fn apply_defaults(request: Value, defaults: &SummaryConfig, force_enforce: bool) -> Value {
    let mut request = match request {
        Value::Array(entries) => json!({ "entries": entries }),
        other => other,
    };

    if let Some(fields) = request.as_object_mut() {
        let options = fields.entry("options").or_insert(Value::Null);
        if options.is_null() {
            *options = Value::Object(Map::new());
        }
        if let Value::Object(options) = options {
            fill_options(options, defaults, force_enforce);
        }
    }

    request
}

fn fill_options(options: &mut Map<String, Value>, defaults: &SummaryConfig, force_enforce: bool) {
    if is_unset(options, "baseCurrency") {
        options.insert("baseCurrency".into(), json!(defaults.base_currency));
    }
    if !has_valid_precision(options) {
        options.insert("precision".into(), json!(defaults.precision));
    }
    if is_unset(options, "zeroTolerance") {
        options.insert("zeroTolerance".into(), json!(defaults.zero_tolerance));
    }
    if let Some(tolerance) = defaults.balance_tolerance
        && is_unset(options, "balanceTolerance")
    {
        options.insert("balanceTolerance".into(), json!(tolerance));
    }
    if force_enforce {
        options.insert("enforceBalance".into(), Value::Bool(true));
    } else if is_unset(options, "enforceBalance") {
        options.insert("enforceBalance".into(), Value::Bool(defaults.enforce_balance));
    }
}

/// Only a non-negative integer that fits `u32` counts as a precision; the
/// engine would ignore anything else.
fn has_valid_precision(options: &Map<String, Value>) -> bool {
    options
        .get("precision")
        .and_then(Value::as_u64)
        .is_some_and(|p| u32::try_from(p).is_ok())
}

/// Missing, null, and blank strings all count as unset.
fn is_unset(options: &Map<String, Value>, key: &str) -> bool {
    match options.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
