use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::imaging::ImagingEvent;
use super::observation::ScaleObservation;
use super::treatment::MedicationCourse;

/// Everything the engine knows about one patient. Sequences need not be
/// sorted; the engine orders them by date before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub clinical_data: Vec<ScaleObservation>,
    #[serde(default)]
    pub treatments: Vec<MedicationCourse>,
    #[serde(default)]
    pub imaging: Vec<ImagingEvent>,
}

impl PatientHistory {
    /// Latest timestamp across observations, course boundaries and imaging.
    pub fn latest_date(&self) -> Option<jiff::Timestamp> {
        let observations = self.clinical_data.iter().map(|o| o.date);
        let courses = self
            .treatments
            .iter()
            .flat_map(|t| std::iter::once(t.start_date).chain(t.end_date));
        let imaging = self.imaging.iter().map(|i| i.date);
        observations.chain(courses).chain(imaging).max()
    }

    /// Courses active at `at`, in input order.
    pub fn active_treatments(&self, at: jiff::Timestamp) -> impl Iterator<Item = &MedicationCourse> {
        self.treatments.iter().filter(move |t| t.is_active_at(at))
    }
}
