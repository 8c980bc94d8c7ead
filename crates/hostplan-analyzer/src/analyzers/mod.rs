pub mod hardware;
pub mod network;
pub mod software;

use serde_json::Value;

/// Copy `key` out of a probe payload as-is, `Null` when absent.
pub(crate) fn field(data: &Value, key: &str) -> Value {
    data.get(key).cloned().unwrap_or(Value::Null)
}
