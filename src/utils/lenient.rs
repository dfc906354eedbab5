// ============================================================================
// 宽松反序列化辅助函数
// 本地存储和导入文件可能被手动篡改或来自旧版本：类型不匹配的字段
// 回落为默认值，而不是让整份文档解析失败
// ============================================================================

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 字段值类型不匹配时回落为 `T::default()`
///
/// 搭配 `#[serde(default, deserialize_with = "or_default")]` 使用，
/// 缺失字段同样得到默认值。
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// 列表字段：非数组视为空列表，无法解析的元素直接跳过
pub fn vec_lenient<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// 可选列表字段：`null`/缺失保持为 `None`，其余同 [`vec_lenient`]
pub fn opt_vec_lenient<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// 映射字段：非对象视为空映射，无法解析的条目回落为默认值
pub fn map_lenient<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, entry)| (key, T::deserialize(entry).unwrap_or_default()))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// JS 语义下的真值判断：null、false、0、空字符串为假
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Default, Debug, PartialEq)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "or_default")]
        count: u32,
        #[serde(deserialize_with = "vec_lenient")]
        tags: Vec<String>,
        #[serde(deserialize_with = "opt_vec_lenient")]
        extra: Option<Vec<u8>>,
        #[serde(deserialize_with = "map_lenient")]
        flags: BTreeMap<String, bool>,
    }

    #[test]
    fn test_type_mismatch_falls_back_to_default() {
        let sample: Sample = serde_json::from_value(json!({
            "count": "five",
            "tags": "not-a-list",
            "extra": 3,
            "flags": [1, 2]
        }))
        .unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_invalid_elements_skipped_and_entries_defaulted() {
        let sample: Sample = serde_json::from_value(json!({
            "count": 7,
            "tags": ["a", 1, null, "b"],
            "extra": [1, "x", 2],
            "flags": { "on": true, "broken": "yes" }
        }))
        .unwrap();
        assert_eq!(sample.count, 7);
        assert_eq!(sample.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sample.extra, Some(vec![1, 2]));
        assert_eq!(sample.flags.get("on"), Some(&true));
        assert_eq!(sample.flags.get("broken"), Some(&false));
    }

    #[test]
    fn test_is_truthy() {
        for v in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            assert!(!is_truthy(&v), "{}", v);
        }
        for v in [json!(true), json!(1), json!("x"), json!([]), json!({})] {
            assert!(is_truthy(&v), "{}", v);
        }
    }

    #[test]
    fn test_missing_fields_use_default() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample, Sample::default());
    }
}
