//! Контракты внешних коллабораторов AI агента
//!
//! Архитектура (ECS strategic / engine tactical split):
//! - State machine решает ЧТО делать (destination, speed, cues)
//! - Движок отвечает КАК: pathfinding, physics raycast, audio, анимация
//!
//! Все коллабораторы передаются явно через `AgentContext` (без глобальных singleton'ов),
//! поэтому state machine тестируется с простыми fake-реализациями.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Статус пути, посчитанного навигацией
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum PathStatus {
    /// Путь до destination найден полностью
    Complete,
    /// Путь обрывается раньше destination
    Partial,
    /// Путь не построен
    Invalid,
}

impl Default for PathStatus {
    fn default() -> Self {
        Self::Complete
    }
}

/// Навигация (NavMesh-эквивалент)
///
/// Single writer: destination/speed/stopped пишет только state machine.
pub trait NavigationOracle {
    fn set_destination(&mut self, position: Vec3);
    fn set_speed(&mut self, speed: f32);
    /// Остановить/возобновить движение без сброса destination
    fn set_stopped(&mut self, stopped: bool);
    /// Сбросить текущий путь (агент стоит на месте)
    fn clear_path(&mut self);
    fn remaining_distance(&self) -> f32;
    fn velocity_magnitude(&self) -> f32;
    fn path_status(&self) -> PathStatus;
    fn is_on_navigable_surface(&self) -> bool;
    fn nearest_navigable_position(&self, point: Vec3, search_radius: f32) -> Option<Vec3>;
    fn warp_to(&mut self, position: Vec3);
}

/// Где сейчас цель (игрок). `None` пока цель не найдена.
pub trait TargetLocator {
    fn current_target_position(&self) -> Option<Vec3>;
}

impl TargetLocator for Option<Vec3> {
    fn current_target_position(&self) -> Option<Vec3> {
        *self
    }
}

/// Спрятана ли цель (укрытие), независимо от геометрии
pub trait HiddenPredicate {
    fn is_target_hidden(&self) -> bool;
}

impl HiddenPredicate for bool {
    fn is_target_hidden(&self) -> bool {
        *self
    }
}

/// Что попало под луч первым
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SightHit {
    /// Луч попал в саму цель
    Target,
    /// Стена/дверь/мебель между глазами и целью
    Obstacle,
}

/// Physics raycast для проверки видимости
pub trait LineOfSight {
    /// `direction` нормализован; `None` = луч ни во что не попал
    fn raycast_first_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32)
        -> Option<SightHit>;
}

/// Звуковые/анимационные сигналы агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AgentCue {
    /// Игрок замечен (one-shot на Patrolling → Chasing)
    Detected,
    /// Удар/захват
    Attack,
    /// Шаг (индекс варианта звука)
    Footstep(usize),
}

/// Fire-and-forget sinks: audio + animator + facing
pub trait AgentFeedback {
    fn play_cue(&mut self, cue: AgentCue);
    fn set_locomotion_speed(&mut self, speed: f32);
    fn set_chasing_flag(&mut self, chasing: bool);
    fn trigger_attack_animation(&mut self);
    /// Развернуть агента лицом к точке
    fn face_towards(&mut self, point: Vec3);
}

/// Владелец game-over презентации
pub trait GameOverSink {
    fn report_target_caught(&mut self);
}

/// Поза агента на текущем тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    /// Направление взгляда (не обязательно нормализовано)
    pub forward: Vec3,
    /// Точка глаз (origin для raycast)
    pub eye: Vec3,
}

impl AgentPose {
    /// Глаза совпадают с pivot (как eyePoint по умолчанию)
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            eye: position,
        }
    }

    pub fn with_eye_height(mut self, eye_height: f32) -> Self {
        self.eye = self.position + Vec3::Y * eye_height;
        self
    }
}

/// Набор коллабораторов на один тик
///
/// `navigation: None` моделирует отсутствующий NavMeshAgent binding:
/// состояние, которому нужна навигация, пропускает тик.
pub struct AgentContext<'a> {
    pub navigation: Option<&'a mut dyn NavigationOracle>,
    pub target: &'a dyn TargetLocator,
    pub hidden: &'a dyn HiddenPredicate,
    pub sight: &'a dyn LineOfSight,
    pub feedback: &'a mut dyn AgentFeedback,
    pub game_over: &'a mut dyn GameOverSink,
}
