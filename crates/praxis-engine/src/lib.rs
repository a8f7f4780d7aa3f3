//! praxis-engine
//!
//! Clinical decision support: GAF compatibility scoring, trajectory
//! projection, constrained treatment-plan search and recommendation
//! assembly. Every entry point is a pure function of its arguments;
//! [`DecisionEngine`] holds nothing but validated tunables, so one
//! instance can be shared freely across threads.

pub mod assessment;
pub mod config;
pub mod error;
pub mod format;
pub mod gaf;
pub mod medication;
pub mod optimizer;
pub mod trajectory;

use jiff::Timestamp;
use praxis_core::models::gaf::GafResult;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::parameters::OptimizationParameters;
use praxis_core::models::result::OptimizationResult;

use config::EngineConfig;
use error::EngineError;

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    /// Build an engine after checking every tunable.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// GAF compatibility score of the history as seen at `as_of`
    /// (defaults to the latest date in the history).
    pub fn score(&self, history: &PatientHistory, as_of: Option<Timestamp>) -> GafResult {
        let as_of = resolve_as_of(history, as_of);
        let observations = gaf::observations_until(&history.clinical_data, as_of);
        gaf::score(&observations, as_of, &self.config)
    }

    /// Score the history, search for a treatment plan and assemble the
    /// recommendation. Fails only on malformed parameters.
    pub fn analyze_patient(
        &self,
        history: &PatientHistory,
        parameters: &OptimizationParameters,
    ) -> Result<OptimizationResult, EngineError> {
        optimizer::analyze_patient(history, parameters, &self.config)
    }
}

/// Evaluation instant: explicit, else the latest date in the history,
/// else the Unix epoch. The wall clock is never read.
pub fn resolve_as_of(history: &PatientHistory, as_of: Option<Timestamp>) -> Timestamp {
    as_of
        .or_else(|| history.latest_date())
        .unwrap_or(Timestamp::UNIX_EPOCH)
}
