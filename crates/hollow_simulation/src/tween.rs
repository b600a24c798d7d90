//! Tween: интерполяция по времени (двери, рычаги, решётки)
//!
//! Вместо корутин: значение `{start, end, elapsed, duration}`,
//! которое двигается тем же fixed tick, что и AI.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Линейная интерполяция между двумя значениями
pub trait Lerp: Copy {
    fn lerp_to(self, end: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, end: Self, t: f32) -> Self {
        self + (end - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, end: Self, t: f32) -> Self {
        self.lerp(end, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween<T: Lerp> {
    pub start: T,
    pub end: T,
    pub elapsed: f32,
    pub duration: f32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, end: T, duration: f32) -> Self {
        Self {
            start,
            end,
            elapsed: 0.0,
            duration,
        }
    }

    /// Прогресс в [0, 1]. Нулевая длительность = сразу завершён.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> T {
        self.start.lerp_to(self.end, self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Продвинуть на `delta`, вернуть текущее значение
    pub fn advance(&mut self, delta: f32) -> T {
        self.elapsed = (self.elapsed + delta.max(0.0)).min(self.duration.max(0.0));
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_tween_clamps_at_end() {
        let mut tween = Tween::new(0.0_f32, 90.0, 2.0);
        assert_eq!(tween.advance(1.0), 45.0);
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(5.0), 90.0);
        assert!(tween.is_finished());
        assert_eq!(tween.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let tween = Tween::new(Vec3::ZERO, Vec3::X, 0.0);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), Vec3::X);
    }

    #[test]
    fn test_vec3_tween_is_linear() {
        let mut tween = Tween::new(Vec3::ZERO, Vec3::new(1.2, 0.0, 0.0), 1.5);
        let half = tween.advance(0.75);
        assert!((half - Vec3::new(0.6, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut tween = Tween::new(0.0_f32, 1.0, 1.0);
        tween.advance(0.5);
        assert_eq!(tween.advance(-3.0), 0.5);
    }
}
