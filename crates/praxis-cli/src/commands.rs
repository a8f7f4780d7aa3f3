use std::io::Read;
use std::path::Path;

use jiff::Timestamp;
use praxis_core::models::gaf::GafResult;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::parameters::OptimizationParameters;
use praxis_core::models::result::OptimizationResult;
use praxis_engine::DecisionEngine;
use praxis_scales::all_scales;
use praxis_scales::scoring::{Polarity, ScoreRange, SeverityThresholds};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::PraxisConfig;

/// Read and parse a JSON document; `-` reads stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> eyre::Result<T> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?
    };
    serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("failed to parse {}: {e}", path.display()))
}

pub fn analyze(
    history: &PatientHistory,
    parameters: &OptimizationParameters,
    config: &PraxisConfig,
) -> eyre::Result<OptimizationResult> {
    let engine = DecisionEngine::new(config.engine.clone())?;
    let result = engine.analyze_patient(history, parameters)?;
    tracing::info!(
        actions = result.recommended_plan.len(),
        confidence = result.confidence,
        flags = ?result.flags,
        "analysis complete"
    );
    Ok(result)
}

pub fn score(
    history: &PatientHistory,
    as_of: Option<Timestamp>,
    config: &PraxisConfig,
) -> eyre::Result<GafResult> {
    let engine = DecisionEngine::new(config.engine.clone())?;
    Ok(engine.score(history, as_of))
}

#[derive(Debug, Clone, Serialize)]
pub struct ScaleInfo {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub max_score: f64,
    pub polarity: Polarity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<SeverityThresholds>,
}

/// The scale reference table.
pub fn scales() -> Vec<ScaleInfo> {
    all_scales()
        .iter()
        .map(|s| ScaleInfo {
            id: s.id().to_string(),
            name: s.name().to_string(),
            aliases: s.aliases().iter().map(|a| a.to_string()).collect(),
            max_score: s.max_score(),
            polarity: s.polarity(),
            thresholds: s.thresholds(),
        })
        .collect()
}

/// An observation the scorer will clamp or exclude.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Position in `clinical_data`.
    pub index: usize,
    pub scale_name: String,
    pub date: Timestamp,
    pub raw_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_range: Option<ScoreRange>,
    pub message: String,
}

/// Check every observation of a history against the reference table.
pub fn validate(history: &PatientHistory) -> Vec<ValidationIssue> {
    history
        .clinical_data
        .iter()
        .enumerate()
        .filter_map(|(index, observation)| {
            let issue = |expected_range: Option<ScoreRange>, message: String| ValidationIssue {
                index,
                scale_name: observation.scale_name.clone(),
                date: observation.date,
                raw_score: observation.raw_score,
                expected_range,
                message,
            };

            if !observation.raw_score.is_finite() {
                return Some(issue(None, "score is not a finite number".to_string()));
            }
            match praxis_scales::get_scale(&observation.scale_name) {
                Some(scale) => scale
                    .validate(observation)
                    .map(|e| issue(Some(e.expected_range), e.message)),
                None => match observation.max_score {
                    Some(max) if max > 0.0 => {
                        let range = ScoreRange { min: 0.0, max };
                        (!range.contains(observation.raw_score)).then(|| {
                            issue(
                                Some(range),
                                format!(
                                    "{}: score {} is outside range [0, {max}]",
                                    observation.scale_name.trim(),
                                    observation.raw_score
                                ),
                            )
                        })
                    }
                    _ => Some(issue(
                        None,
                        format!(
                            "unknown scale {:?} without a maximum score",
                            observation.scale_name
                        ),
                    )),
                },
            }
        })
        .collect()
}
