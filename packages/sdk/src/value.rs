//! # Firestore 値の変換
//!
//! Firestore REST API はフィールド値を型付きの JSON（`{"stringValue": "..."}` など）で
//! やり取りする。ここではプレーンな JSON との相互変換を行う。
//!
//! | Firestore | JSON |
//! |-----------|------|
//! | `nullValue` | `null` |
//! | `booleanValue` | bool |
//! | `integerValue`（10 進文字列） | 整数 |
//! | `doubleValue` | 浮動小数点数 |
//! | `stringValue` / `timestampValue` / `bytesValue` / `referenceValue` | 文字列 |
//! | `geoPointValue` | `{"latitude": .., "longitude": ..}` |
//! | `arrayValue` | 配列 |
//! | `mapValue` | オブジェクト |
//!
//! JSON → Firestore の方向では文字列はすべて `stringValue` になる。
//! `i64::MAX` を超える整数は変換できずエラーになる。

use serde_json::{Map, Number, Value, json};

use crate::error::SdkError;

/// JSON の値を Firestore の型付き値に変換する
///
/// `integerValue` は int64 なので、`i64::MAX` を超える整数はエラーにする
/// （`doubleValue` に落とすと精度が失われる）。
pub fn encode_value(value: &Value) -> Result<Value, SdkError> {
    let encoded = match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => encode_number(n)?,
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values = items.iter().map(encode_value).collect::<Result<Vec<_>, _>>()?;
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map)? } }),
    };
    Ok(encoded)
}

/// オブジェクトの各フィールドを Firestore の `fields` 形式に変換する
pub fn encode_fields(map: &Map<String, Value>) -> Result<Value, SdkError> {
    let mut fields = Map::new();
    for (key, value) in map {
        fields.insert(key.clone(), encode_value(value)?);
    }
    Ok(Value::Object(fields))
}

fn encode_number(n: &Number) -> Result<Value, SdkError> {
    if let Some(i) = n.as_i64() {
        return Ok(json!({ "integerValue": i.to_string() }));
    }
    if n.is_u64() {
        return Err(SdkError::Unknown(format!(
            "整数 {n} は Firestore の integerValue（int64）の範囲外です"
        )));
    }
    Ok(json!({ "doubleValue": n.as_f64() }))
}

/// Firestore の型付き値を JSON の値に変換する
pub fn decode_value(value: &Value) -> Result<Value, SdkError> {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Err(unsupported(value));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool).ok_or_else(|| unsupported(value)),
        "integerValue" => decode_integer(inner).ok_or_else(|| unsupported(value)),
        "doubleValue" => decode_double(inner).ok_or_else(|| unsupported(value)),
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| unsupported(value)),
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => {
            let values = match inner.get("values").and_then(Value::as_array) {
                Some(values) => values.iter().map(decode_value).collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => decode_fields(inner.get("fields")),
        _ => Err(unsupported(value)),
    }
}

/// Firestore の `fields` をプレーンなオブジェクトに変換する
///
/// `fields` が無い（空ドキュメント）場合は空オブジェクトを返す。
pub fn decode_fields(fields: Option<&Value>) -> Result<Value, SdkError> {
    let mut decoded = Map::new();
    if let Some(fields) = fields.and_then(Value::as_object) {
        for (key, value) in fields {
            decoded.insert(key.clone(), decode_value(value)?);
        }
    }
    Ok(Value::Object(decoded))
}

/// integerValue は int64 の 10 進文字列で届く
fn decode_integer(inner: &Value) -> Option<Value> {
    match inner {
        Value::String(s) => s.parse::<i64>().ok().map(Value::from),
        Value::Number(n) => n.as_i64().map(Value::from),
        _ => None,
    }
}

/// doubleValue は数値か、`"NaN"` / `"Infinity"` などの文字列で届く
///
/// JSON で表せない値は `null` にする。
fn decode_double(inner: &Value) -> Option<Value> {
    let f = match inner {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.parse::<f64>().ok()?,
        _ => return None,
    };
    Some(Number::from_f64(f).map_or(Value::Null, Value::Number))
}

fn unsupported(value: &Value) -> SdkError {
    SdkError::Unknown(format!("未対応の Firestore 値です: {value}"))
}
