//! AI decision-making module
//!
//! Patrol/chase/attack/search state machine для врага + ECS bridge.
//!
//! Слои:
//! - `state_machine`: чистая логика, коллабораторы через `AgentContext`
//! - `perception`, `stall`, `footsteps`: вспомогательные расчёты без состояния ECS
//! - `systems`: Bevy системы, которые собирают контекст из компонентов

use bevy::prelude::*;

pub mod bridge;
pub mod collaborators;
pub mod components;
pub mod events;
pub mod footsteps;
pub mod perception;
pub mod stall;
pub mod state_machine;
pub mod systems;

#[cfg(test)]
mod state_machine_tests;
#[cfg(test)]
mod test_support;

// Re-export основных типов
pub use bridge::SightOracle;
pub use collaborators::{
    AgentContext, AgentCue, AgentFeedback, AgentPose, GameOverSink, HiddenPredicate, LineOfSight,
    NavigationOracle, PathStatus, SightHit, TargetLocator,
};
pub use components::{AIConfig, AIState, EnemyAgent, Locomotion, PatrolRoute};
pub use events::{ActivateAgent, AgentCueEvent, ResetAgent, TargetCaught, WakeTarget};
pub use perception::{can_perceive_target, ClearSight, Perception, PerceptionQuery};
pub use state_machine::{Activation, PatrolChaseStateMachine};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. activate_dormant_agents: пробуждение по ActivateAgent
/// 2. reset_caught_agents: возврат в патруль по ResetAgent
/// 3. ai_patrol_chase_tick: тик поведения всех активных агентов
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Locomotion>()
            .register_type::<AIState>()
            .add_event::<ActivateAgent>()
            .add_event::<ResetAgent>()
            .add_event::<AgentCueEvent>()
            .add_event::<TargetCaught>()
            .init_resource::<SightOracle>()
            .add_systems(
                FixedUpdate,
                (
                    systems::activate_dormant_agents,
                    systems::reset_caught_agents,
                    systems::ai_patrol_chase_tick,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(crate::SimulationSet::AI),
            );
    }
}
