//! Конфигурация симуляции (JSON)
//!
//! Всё с `#[serde(default)]`: файл может задавать только нужные поля.
//! Ошибки только здесь, на границе: внутри тика ничего не падает.

use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AIConfig;
use crate::interaction::inventory::DEFAULT_BAG_CAPACITY;
use crate::logger;

pub const MIN_VIEW_ANGLE: f32 = 10.0;
pub const MAX_VIEW_ANGLE: f32 = 360.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Параметры запуска симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate
    pub tick_hz: f64,
    pub inventory_capacity: usize,
    pub ai: AIConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            inventory_capacity: DEFAULT_BAG_CAPACITY,
            ai: AIConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        logger::log_info(&format!("Config: loaded {}", path.display()));
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz > 0.0) {
            return Err(invalid("tick_hz", format!("must be positive, got {}", self.tick_hz)));
        }
        validate_ai(&self.ai)
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::Invalid { field, message }
}

/// Проверка AIConfig
///
/// `attack_range > detection_range` допустимо (атака тогда невозможна раньше
/// обнаружения), но подозрительно: только предупреждение.
pub fn validate_ai(config: &AIConfig) -> Result<(), ConfigError> {
    let non_negative = [
        ("detection_range", config.detection_range),
        ("attack_range", config.attack_range),
        ("patrol_wait_time", config.patrol_wait_time),
        ("home_dwell_time", config.home_dwell_time),
        ("eye_height", config.eye_height),
        ("waypoint_arrival_distance", config.waypoint_arrival_distance),
        ("search_arrival_distance", config.search_arrival_distance),
        ("stall_threshold", config.stall_threshold),
        ("detour_distance", config.detour_distance),
        ("navmesh_sample_radius", config.navmesh_sample_radius),
        ("footstep_interval", config.footstep_interval),
    ];
    for (field, value) in non_negative {
        if !(value >= 0.0) {
            return Err(invalid(field, format!("must be non-negative, got {}", value)));
        }
    }

    let positive = [
        ("patrol_speed", config.patrol_speed),
        ("chase_speed", config.chase_speed),
        ("lose_sight_factor", config.lose_sight_factor),
        ("stall_check_interval", config.stall_check_interval),
    ];
    for (field, value) in positive {
        if !(value > 0.0) {
            return Err(invalid(field, format!("must be positive, got {}", value)));
        }
    }

    if !(MIN_VIEW_ANGLE..=MAX_VIEW_ANGLE).contains(&config.view_angle) {
        return Err(invalid(
            "view_angle",
            format!(
                "must be within [{}, {}], got {}",
                MIN_VIEW_ANGLE, MAX_VIEW_ANGLE, config.view_angle
            ),
        ));
    }

    if config.attack_range > config.detection_range {
        logger::log_warning(&format!(
            "Config: attack_range {} exceeds detection_range {}",
            config.attack_range, config.detection_range
        ));
    }

    Ok(())
}
