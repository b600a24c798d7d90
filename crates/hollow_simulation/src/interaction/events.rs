//! Interaction Events

use bevy::prelude::*;

use super::interactable::InteractionCue;

/// Игрок нажал E на объекте (источник: input слой движка)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractRequest {
    pub entity: Entity,
}

/// Уведомление для HUD ("Inventory is full!", "Out of fuel.")
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct InteractionNotification {
    pub message: String,
}

/// Открыть записку
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct NoteOpened {
    pub text: String,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionCueEvent {
    pub entity: Entity,
    pub cue: InteractionCue,
}

/// Рычаг дёрнули (подписчики: скрипты сцены)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeverPulled {
    pub entity: Entity,
}

/// Загрузить другую сцену (затемнение и загрузку делает движок)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneTransitionRequested {
    pub scene: String,
}
