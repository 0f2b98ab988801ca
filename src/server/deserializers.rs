use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

// clients treat null, "", 0 and false as "not sent", so do we. Other scalars are
// stored as their text form.
pub fn deserialize_present_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Bool(true) => Ok(Some("true".to_owned())),
        Value::String(text) if text.is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) if number.as_f64() == Some(0.0) => Ok(None),
        Value::Number(number) => Ok(Some(number_text(&number))),
        Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom(
            "expected a string, number or boolean",
        )),
    }
}

// 1.0 is sent by clients as plain 1
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
            (float as i64).to_string()
        }
        _ => number.to_string(),
    }
}
