//! Track records and info-field display rules

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME_FIELD: &str = "name";
pub const DURATION_FIELD: &str = "duration";
pub const ALBUM_COVER_FIELD: &str = "albumCover";

/// Field name to value. Values are whatever the metadata reader produced:
/// strings, numbers, or for `albumCover` an object with a `base64` payload.
pub type TrackInfo = BTreeMap<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub source: String,
    #[serde(default)]
    pub info: TrackInfo,
}

impl Track {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            info: TrackInfo::new(),
        }
    }

    pub fn with_info(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.info.insert(key.to_string(), value.into());
        self
    }

    pub fn name(&self) -> String {
        self.info.get(NAME_FIELD).map(display_value).unwrap_or_default()
    }

    pub fn duration(&self) -> Option<f64> {
        self.info.get(DURATION_FIELD).and_then(Value::as_f64)
    }

    pub fn album_cover(&self) -> Option<&str> {
        self.info
            .get(ALBUM_COVER_FIELD)?
            .get("base64")?
            .as_str()
    }
}

/// Text shown for an info value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        },
        other => other.to_string(),
    }
}

/// Empty strings, zero, false and null count as "no value".
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
