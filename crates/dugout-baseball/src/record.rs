// Raw player records as handed over by the ingestion layer.
//
// Exports mix numbers and annotated strings freely ("3.5 Stars", "$9,000,000",
// "2 (arbitration)"), so a record is a plain field-name -> value mapping.
// Everything downstream converts out of this shape exactly once, in
// `Player::from_record`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// A single cell from an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

/// Field name -> raw value.
pub type RawRecord = HashMap<String, RawValue>;

impl RawValue {
    /// Text view of the value. Numbers are formatted without a trailing `.0`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawValue::Text(s) => Cow::Borrowed(s.as_str()),
            RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Cow::Owned(format!("{}", *n as i64))
            }
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Null => Cow::Borrowed(""),
        }
    }

    /// Whether this is an empty cell or a placeholder dash.
    pub fn is_placeholder(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Number(n) => !n.is_finite(),
            RawValue::Text(s) => {
                let t = s.trim();
                t.is_empty() || t == "-" || t == "--" || t == "—" || t.eq_ignore_ascii_case("n/a")
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Return the first non-placeholder value among `keys`.
///
/// Several exports disagree on column names (`WAR` vs `WAR (Pitcher)`,
/// `Team` vs `TM`), so lookups take a list of aliases in priority order.
pub fn lookup<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a RawValue> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_placeholder())
}
