use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One daily bar. Prices stay optional so provider gaps are carried as undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    #[serde(default, deserialize_with = "de_opt_f64_or_string_as_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64_or_string_as_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64_or_string_as_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64_or_string_as_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64_or_string_as_f64")]
    pub volume: Option<f64>,
    /// Seconds since epoch
    pub time: i64,
    #[serde(default, deserialize_with = "de_opt_f64_or_string_as_f64")]
    pub adjclose: Option<f64>,
}

impl Kline {
    /// Bar with every price set to `close`, handy for synthetic series
    pub fn flat(time: i64, close: f64) -> Self {
        Self {
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
            volume: None,
            time,
            adjclose: None,
        }
    }
}

/// Lenient price parsing. Non-finite values are undefined.
pub(crate) fn opt_f64(value: &Value) -> Result<Option<f64>, String> {
    let parsed = match value {
        Value::Null => None,
        Value::Number(num) => Some(
            num.as_f64()
                .ok_or_else(|| format!("Invalid number {num}"))?,
        ),
        Value::String(s) => Some(s.parse::<f64>().map_err(|e| format!("{e}: {s}"))?),
        other => return Err(format!("wrong type: {other}")),
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

fn de_opt_f64_or_string_as_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    opt_f64(&value).map_err(de::Error::custom)
}
