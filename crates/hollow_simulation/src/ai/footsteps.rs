//! Ритм шагов агента (случайный вариант звука из набора).

use rand::Rng;

use super::components::AIConfig;
use super::stall::STALL_VELOCITY_EPSILON;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FootstepCadence {
    since_last_step: f32,
}

impl FootstepCadence {
    /// Тик ритма. `Some(variant)` когда пора играть шаг.
    ///
    /// Таймер сбрасывается даже если вариантов звука нет (`footstep_variants == 0`).
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        velocity: f32,
        config: &AIConfig,
        rng: &mut R,
    ) -> Option<usize> {
        self.since_last_step += delta;
        if velocity <= STALL_VELOCITY_EPSILON || self.since_last_step <= config.footstep_interval {
            return None;
        }

        self.since_last_step = 0.0;
        if config.footstep_variants == 0 {
            return None;
        }
        Some(rng.gen_range(0..config.footstep_variants))
    }
}
