//! 느슨한 JSON 디코딩 헬퍼.

use serde::de;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// 문자열 또는 숫자를 `Option<String>`으로 디코딩 (ID 필드용)
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    }))
}

/// 정수/실수 카운트를 `Option<u64>`로 디코딩 (소수부는 버림)
pub(crate) fn opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_u64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v.floor() as u64)),
        _ => Err(de::Error::custom(format!("invalid count: {number}"))),
    }
}
