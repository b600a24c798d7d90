//! Perception: vision cone + line-of-sight + hidden veto.
//!
//! Чистая функция входов текущего тика, без кэша между тиками.
//! Порядок проверок: range → cone → raycast → hidden (short-circuit).

use bevy::prelude::*;

use super::collaborators::{HiddenPredicate, LineOfSight, SightHit};

/// Ближе этого цель считается "в глазах" (направление не определено)
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// Результат проверки восприятия (какая проверка отбросила цель)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perception {
    Perceived,
    OutOfRange,
    OutsideCone,
    Occluded,
    Hidden,
}

impl Perception {
    pub fn is_perceived(&self) -> bool {
        matches!(self, Perception::Perceived)
    }
}

/// Один запрос восприятия (derived, не хранится)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionQuery {
    pub eye: Vec3,
    pub forward: Vec3,
    pub target: Vec3,
    pub detection_range: f32,
    /// Полный угол конуса в градусах
    pub view_angle: f32,
}

impl PerceptionQuery {
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// (a) в радиусе: strict `<`, цель ровно на границе не видна
    pub fn in_range(&self) -> bool {
        self.distance() < self.detection_range
    }

    /// (b) в конусе: `angle > half` отбрасывает, равенство проходит
    pub fn in_cone(&self) -> bool {
        let to_target = self.target - self.eye;
        if to_target.length() < MIN_DIRECTION_LENGTH {
            return true;
        }

        let forward = self.forward.normalize_or_zero();
        if forward == Vec3::ZERO {
            // Вырожденная поза: направление взгляда не задано
            return false;
        }

        let half_angle = (self.view_angle * 0.5).to_radians();
        forward.angle_between(to_target) <= half_angle
    }

    /// (c) луч от глаз к цели не упёрся в препятствие
    pub fn unobstructed(&self, sight: &dyn LineOfSight) -> bool {
        let to_target = self.target - self.eye;
        if to_target.length() < MIN_DIRECTION_LENGTH {
            return true;
        }

        match sight.raycast_first_hit(self.eye, to_target.normalize(), self.detection_range) {
            Some(SightHit::Obstacle) => false,
            Some(SightHit::Target) | None => true,
        }
    }

    /// Полная проверка: все четыре условия AND
    pub fn evaluate(&self, sight: &dyn LineOfSight, hidden: &dyn HiddenPredicate) -> Perception {
        if !self.in_range() {
            return Perception::OutOfRange;
        }
        if !self.in_cone() {
            return Perception::OutsideCone;
        }
        if !self.unobstructed(sight) {
            return Perception::Occluded;
        }
        if hidden.is_target_hidden() {
            return Perception::Hidden;
        }
        Perception::Perceived
    }
}

/// Shortcut: видит ли агент цель
pub fn can_perceive_target(
    query: &PerceptionQuery,
    sight: &dyn LineOfSight,
    hidden: &dyn HiddenPredicate,
) -> bool {
    query.evaluate(sight, hidden).is_perceived()
}

/// LineOfSight без препятствий (пустой уровень, headless по умолчанию)
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearSight;

impl LineOfSight for ClearSight {
    fn raycast_first_hit(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<SightHit> {
        None
    }
}
