//! ECS компоненты агента

use bevy::prelude::*;
use rand::RngCore;

use super::fsm::{AIConfig, AIState, PatrolRoute};
use crate::ai::state_machine::PatrolChaseStateMachine;

/// Враг с patrol/chase поведением
///
/// Создаётся спящим, просыпается по `ActivateAgent`.
#[derive(Component, Debug)]
pub struct EnemyAgent {
    pub(crate) machine: PatrolChaseStateMachine,
}

impl EnemyAgent {
    pub fn new(config: AIConfig, route: PatrolRoute, seed: u64) -> Self {
        Self {
            machine: PatrolChaseStateMachine::new(config, route, seed),
        }
    }

    /// Seed берётся из общего детерминистичного RNG
    pub fn seeded(config: AIConfig, route: PatrolRoute, rng: &mut impl RngCore) -> Self {
        Self::new(config, route, rng.next_u64())
    }

    pub fn machine(&self) -> &PatrolChaseStateMachine {
        &self.machine
    }

    pub fn state(&self) -> AIState {
        self.machine.state()
    }

    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }
}

/// Параметры для аниматора (пишет AI каждый тик)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    /// Скорость движения (m/s)
    pub speed: f32,
    pub chasing: bool,
    /// Сколько раз запускалась анимация атаки
    pub attack_triggers: u32,
}
