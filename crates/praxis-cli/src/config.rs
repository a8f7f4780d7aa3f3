use std::path::Path;

use praxis_engine::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when changing the file's shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PraxisConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Read a config file, migrating older layouts before deserializing.
/// Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> eyre::Result<PraxisConfig> {
    let Some(path) = path else {
        return Ok(PraxisConfig {
            config_version: CURRENT_VERSION,
            ..PraxisConfig::default()
        });
    };

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn parse_config(contents: &str) -> eyre::Result<PraxisConfig> {
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = match json.get("config_version") {
        None | Some(serde_json::Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| eyre::eyre!("config_version {value} is not a valid version number"))?,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: PraxisConfig = serde_json::from_value(migrated)?;
    config.engine.validate()?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update praxis."
        ));
    }

    // v0 → v1: engine tunables move under "engine"; the decay rate becomes
    // a half-life in days.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.remove("config_version");

        let mut engine = std::mem::take(obj);
        if let Some(lambda) = engine.remove("decay_lambda") {
            let lambda = lambda
                .as_f64()
                .ok_or_else(|| eyre::eyre!("decay_lambda is not a number"))?;
            if !(lambda.is_finite() && lambda > 0.0) {
                return Err(eyre::eyre!("decay_lambda must be positive, got {lambda}"));
            }
            engine.insert(
                "decay_half_life_days".to_string(),
                serde_json::json!(std::f64::consts::LN_2 / lambda),
            );
        }

        obj.insert("engine".to_string(), serde_json::Value::Object(engine));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (engine section, decay half-life)");
    }

    Ok(json)
}
