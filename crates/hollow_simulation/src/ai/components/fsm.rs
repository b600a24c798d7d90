//! FSM AI типы: состояние, параметры, маршрут патруля.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Поведенческое состояние агента
///
/// Ровно одно состояние активно в любой момент.
/// Терминального состояния нет: после поимки игрока агент остаётся в `Attacking`
/// до внешнего reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AIState {
    /// Обход маршрута (начальное состояние)
    Patrolling,

    /// Преследование видимой цели
    Chasing,

    /// Атака (one-shot на вход в состояние)
    Attacking,

    /// Движение к последней известной позиции цели
    Searching,
}

impl Default for AIState {
    fn default() -> Self {
        Self::Patrolling
    }
}

/// Параметры AI агента
///
/// Все дистанции в метрах, время в секундах, углы в градусах.
/// `attack_range <= detection_range` не форсируется (см. `validate` в config).
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    /// Пауза на обычной точке патруля
    pub patrol_wait_time: f32,
    /// Пауза на "домашней" точке (индекс 0) после полного круга
    pub home_dwell_time: f32,
    /// Дальность обнаружения (strict `<`)
    pub detection_range: f32,
    /// Дальность атаки (strict `<`)
    pub attack_range: f32,
    pub chase_speed: f32,
    pub patrol_speed: f32,
    /// Полный угол конуса зрения (10..=360)
    pub view_angle: f32,
    /// Высота глаз над pivot агента
    pub eye_height: f32,
    /// Порог "дошли до точки патруля" (remaining distance)
    pub waypoint_arrival_distance: f32,
    /// Порог "дошли до последней известной позиции" в Searching
    pub search_arrival_distance: f32,
    /// Chasing → Searching когда дистанция > detection_range * factor
    pub lose_sight_factor: f32,
    /// Период проверки застревания
    pub stall_check_interval: f32,
    /// Сколько нужно простоять с битым путём до обхода
    pub stall_threshold: f32,
    /// Максимальная длина обходного шага к цели
    pub detour_distance: f32,
    /// Радиус поиска ближайшей точки на navmesh
    pub navmesh_sample_radius: f32,
    /// Минимальный интервал между шагами
    pub footstep_interval: f32,
    /// Сколько вариантов звука шага (0 = шаги не озвучиваются)
    pub footstep_variants: usize,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            patrol_wait_time: 2.0,
            home_dwell_time: 20.0,
            detection_range: 10.0,
            attack_range: 2.0,
            chase_speed: 4.0,
            patrol_speed: 2.0,
            view_angle: 90.0,
            eye_height: 0.0,
            waypoint_arrival_distance: 0.5,
            search_arrival_distance: 1.0,
            lose_sight_factor: 1.2,
            stall_check_interval: 0.5,
            stall_threshold: 1.0,
            detour_distance: 2.0,
            navmesh_sample_radius: 2.0,
            footstep_interval: 0.5,
            footstep_variants: 0,
        }
    }
}

impl AIConfig {
    /// Дистанция, за которой невидимая цель считается потерянной
    pub fn lose_sight_distance(&self) -> f32 {
        self.detection_range * self.lose_sight_factor
    }

    /// Пауза на только что достигнутой точке, перед движением к `next_index`
    ///
    /// Следующая точка 0 = круг закончен, длинная пауза.
    pub fn dwell_for(&self, next_index: usize) -> f32 {
        if next_index == 0 {
            self.home_dwell_time
        } else {
            self.patrol_wait_time
        }
    }
}

/// Циклический маршрут патруля
///
/// После последней точки агент возвращается к первой.
/// Индекс 0: "дом" (длинная пауза, см. `AIConfig::home_dwell_time`).
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(waypoints: impl Into<Vec<Vec3>>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }

    /// Следующий индекс по кругу (для пустого маршрута всегда 0)
    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (index + 1) % self.waypoints.len()
        }
    }
}
