use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A medication course from the patient's treatment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicationCourse {
    pub name: String,
    /// Daily amount in the caller's dose unit. Accepts free text such as
    /// `"900mg"` on input.
    #[serde(deserialize_with = "deserialize_dosage")]
    #[ts(type = "number | string")]
    pub dosage: f64,
    pub start_date: jiff::Timestamp,
    /// Absent for a course that is still ongoing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<jiff::Timestamp>,
}

impl MedicationCourse {
    pub fn is_active_at(&self, at: jiff::Timestamp) -> bool {
        self.start_date <= at && self.end_date.is_none_or(|end| at < end)
    }
}

/// Extract the first decimal amount from a free-text dosage.
///
/// `"900mg"` → 900, `"10.5 mg/day"` → 10.5, `"10-30mg"` → 10.
pub fn parse_dosage(text: &str) -> Result<f64, CoreError> {
    let bytes = text.as_bytes();
    let start = bytes
        .iter()
        .enumerate()
        .position(|(i, b)| {
            b.is_ascii_digit()
                || (*b == b'.' && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
        })
        .ok_or_else(|| CoreError::InvalidDosage(text.to_string()))?;

    let mut seen_dot = false;
    let end = bytes[start..]
        .iter()
        .position(|b| {
            if *b == b'.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !b.is_ascii_digit()
            }
        })
        .map_or(bytes.len(), |offset| start + offset);

    text[start..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidDosage(text.to_string()))
}

fn deserialize_dosage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDosage {
        Amount(f64),
        Text(String),
    }

    match RawDosage::deserialize(deserializer)? {
        RawDosage::Amount(amount) => Ok(amount),
        RawDosage::Text(text) => parse_dosage(&text).map_err(serde::de::Error::custom),
    }
}
