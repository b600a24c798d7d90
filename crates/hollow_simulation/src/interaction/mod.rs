//! Interaction module
//!
//! Двери, решётки, дверь подвала, предметы, рычаги, укрытия, генератор, люк.
//! Объекты будят спящих агентов и прячут игрока от AI.

use bevy::prelude::*;

use crate::ai::ActivateAgent;

pub mod events;
pub mod interactable;
pub mod inventory;
pub mod systems;


pub use events::{
    InteractRequest, InteractionCueEvent, InteractionNotification, LeverPulled, NoteOpened,
    SceneTransitionRequested,
};
pub use interactable::{
    BasementDoorState, CageDoorState, DoorState, GeneratorState, HatchState, HidingSpotState,
    InteractContext, Interactable, InteractableKind, InteractionCue, InteractionEffect, LeverState,
    PickupState, HIDING_EXIT_GRACE,
};
pub use inventory::{Inventory, ItemBag};
pub use systems::{InteractionFocus, InteractionPrompt, PendingEffects, WakeSchedule};

/// Interaction Plugin
///
/// Системы в FixedUpdate до AI: пробуждение и укрытие видны агентам в том же тике.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<InteractRequest>()
            .add_event::<InteractionNotification>()
            .add_event::<NoteOpened>()
            .add_event::<InteractionCueEvent>()
            .add_event::<LeverPulled>()
            .add_event::<SceneTransitionRequested>()
            .add_event::<ActivateAgent>()
            .init_resource::<ItemBag>()
            .init_resource::<InteractionFocus>()
            .init_resource::<InteractionPrompt>()
            .init_resource::<PendingEffects>()
            .init_resource::<WakeSchedule>()
            .add_systems(
                FixedUpdate,
                (
                    systems::advance_interactables,
                    systems::handle_interact_requests,
                    systems::run_wake_schedule,
                    systems::apply_interaction_effects,
                    systems::update_interaction_prompt,
                )
                    .chain()
                    .in_set(crate::SimulationSet::Interaction),
            );
    }
}
