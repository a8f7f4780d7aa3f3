//! Placeholder pharmacodynamic model.
//!
//! Relative efficacy factors are coarse ordinal guesses, not clinical
//! evidence. They only let the optimizer prefer one candidate over another.

use crate::config::EngineConfig;

/// Alternatives the optimizer may introduce beyond the patient's own history.
pub const CATALOG: [&str; 4] = ["lithium", "aripiprazole", "quetiapine", "sertraline"];

pub const DEFAULT_EFFICACY: f64 = 0.3;

const DOSE_FACTOR_MIN: f64 = 0.5;
const DOSE_FACTOR_MAX: f64 = 1.5;

/// Case- and whitespace-insensitive identity of a medication.
pub fn medication_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn efficacy(name: &str) -> f64 {
    match medication_key(name).as_str() {
        "lithium" => 0.70,
        "olanzapine" => 0.65,
        "risperidone" | "clozapine" => 0.60,
        "quetiapine" | "haloperidol" => 0.55,
        "aripiprazole" => 0.50,
        "sertraline" | "venlafaxine" => 0.40,
        "fluoxetine" => 0.35,
        _ => DEFAULT_EFFICACY,
    }
}

pub fn dose_factor(dose: f64, reference_dose: f64) -> f64 {
    let ratio = dose / reference_dose;
    if ratio.is_nan() {
        return DOSE_FACTOR_MIN;
    }
    ratio.clamp(DOSE_FACTOR_MIN, DOSE_FACTOR_MAX)
}

/// Change in daily severity slope while the medication is active.
/// Always `<= 0`: an active medication never worsens the trend.
pub fn slope_bump(name: &str, dose: f64, config: &EngineConfig) -> f64 {
    -config.improvement_slope * efficacy(name) * dose_factor(dose, config.reference_dose)
}
