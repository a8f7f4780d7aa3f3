use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of change a plan makes to a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActionKind {
    Start,
    AdjustDose,
    Stop,
}

/// One step of a treatment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicationAction {
    pub date: jiff::Timestamp,
    pub action: ActionKind,
    pub medication: String,
    /// Target dose for `start` and `adjust_dose`; absent for `stop`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<f64>,
}

impl MedicationAction {
    /// Total order used for deterministic tie-breaking: date, kind,
    /// medication, then dosage.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.action.cmp(&other.action))
            .then_with(|| self.medication.cmp(&other.medication))
            .then_with(|| match (self.dosage, other.dosage) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            })
    }
}

/// Lexicographic comparison of two action lists under
/// [`MedicationAction::canonical_cmp`].
pub fn cmp_action_lists(a: &[MedicationAction], b: &[MedicationAction]) -> Ordering {
    for (left, right) in a.iter().zip(b) {
        let ord = left.canonical_cmp(right);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}
