//! Stuck detection для Chasing.
//!
//! Раз в `stall_check_interval` смотрим на скорость и статус пути.
//! Стоим (velocity < 0.1) с неполным путём дольше `stall_threshold` → обход:
//! короткий шаг по прямой к цели вместо полного пути.

use bevy::prelude::*;

use super::collaborators::PathStatus;
use super::components::AIConfig;

/// Ниже этой скорости агент считается стоящим
pub const STALL_VELOCITY_EPSILON: f32 = 0.1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StallDetector {
    check_timer: f32,
    stalled_for: f32,
}

impl StallDetector {
    pub fn reset(&mut self) {
        self.check_timer = 0.0;
        self.stalled_for = 0.0;
    }

    /// Сколько уже накоплено простоя (секунды)
    pub fn stalled_for(&self) -> f32 {
        self.stalled_for
    }

    /// Тик детектора. `true` = пора делать обход (таймер простоя сброшен).
    pub fn observe(&mut self, delta: f32, velocity: f32, path_status: PathStatus, config: &AIConfig) -> bool {
        self.check_timer += delta;
        if self.check_timer < config.stall_check_interval {
            return false;
        }

        let elapsed = self.check_timer;
        self.check_timer = 0.0;

        let stuck = velocity < STALL_VELOCITY_EPSILON && path_status != PathStatus::Complete;
        if !stuck {
            self.stalled_for = 0.0;
            return false;
        }

        self.stalled_for += elapsed;
        if self.stalled_for >= config.stall_threshold {
            self.stalled_for = 0.0;
            true
        } else {
            false
        }
    }
}

/// Точка обхода: по прямой к цели, не дальше `max_step`
pub fn detour_point(from: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let to_target = target - from;
    let step = to_target.length().min(max_step);
    from + to_target.normalize_or_zero() * step
}
