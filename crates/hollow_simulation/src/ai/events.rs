//! AI Events: вход (пробуждение, reset) и выход (cues, поимка) AI систем

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::collaborators::AgentCue;

/// Кого будить
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum WakeTarget {
    /// Все спящие агенты сцены
    AllDormant,
    /// Конкретный агент
    Agent(Entity),
}

impl WakeTarget {
    pub fn matches(&self, entity: Entity) -> bool {
        match self {
            WakeTarget::AllDormant => true,
            WakeTarget::Agent(agent) => *agent == entity,
        }
    }
}

/// Разбудить агента (дверь открылась, люк, скрипт)
///
/// Активация one-time: повторное событие для активного агента игнорируется.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActivateAgent {
    pub target: WakeTarget,
}

/// Вернуть агента в патруль (после game over / respawn)
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetAgent {
    pub target: WakeTarget,
}

/// Звук/анимация агента для presentation слоя
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AgentCueEvent {
    pub agent: Entity,
    pub cue: AgentCue,
}

/// Агент поймал игрока (game over)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCaught {
    pub agent: Entity,
}
