//! 文档写入前的 JSON 清洗
//!
//! 文档后端拒绝显式的"无值"标记：对象中值为 null 的键在写入前被静默
//! 移除 (而不是让写入失败)。数组元素递归清洗但不移除，保持下标稳定。

use serde::Serialize;
use serde_json::Value;
use shared::error::StoreResult;

/// 递归移除对象中的 null 键
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// 序列化并清洗，得到可安全写入文档存储的值
pub fn to_sanitized_value<T: Serialize>(value: &T) -> StoreResult<Value> {
    Ok(strip_nulls(serde_json::to_value(value)?))
}
