//! Interaction systems (FixedUpdate, до AI)
//!
//! Порядок:
//! 1. advance_interactables: tweens/таймеры → эффекты
//! 2. handle_interact_requests: E на объекте → эффекты
//! 3. run_wake_schedule: отложенное пробуждение агентов
//! 4. apply_interaction_effects: эффекты → события, телепорт, force-open
//! 5. update_interaction_prompt: "Press E to ..." для объекта в фокусе
//!
//! Таймеры идут до нажатия и до планирования: тик, в котором игрок
//! спрятался или запланировано пробуждение, не засчитывается.

use bevy::prelude::*;

use super::events::{
    InteractRequest, InteractionCueEvent, InteractionNotification, LeverPulled, NoteOpened,
    SceneTransitionRequested,
};
use super::interactable::{InteractContext, Interactable, InteractionEffect};
use super::inventory::ItemBag;
use crate::ai::{ActivateAgent, WakeTarget};
use crate::logger;
use crate::player::Player;

/// Объект под прицелом камеры (пишет движок после своего raycast)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFocus(pub Option<Entity>);

/// Текущая подсказка для HUD
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionPrompt {
    pub focused: Option<Entity>,
    pub text: Option<String>,
}

/// Эффекты, собранные за тик, ещё не применённые
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingEffects(pub Vec<(Entity, InteractionEffect)>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledWake {
    pub target: WakeTarget,
    pub remaining: f32,
}

/// Отложенные пробуждения (люк: агент просыпается через 10s)
#[derive(Resource, Debug, Clone, Default)]
pub struct WakeSchedule {
    pub entries: Vec<ScheduledWake>,
}

impl WakeSchedule {
    pub fn schedule(&mut self, target: WakeTarget, delay: f32) {
        self.entries.push(ScheduledWake {
            target,
            remaining: delay,
        });
    }

    /// Продвинуть таймеры, вернуть сработавшие
    pub fn advance(&mut self, delta: f32) -> Vec<WakeTarget> {
        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining -= delta;
            if entry.remaining <= 0.0 {
                due.push(entry.target);
                false
            } else {
                true
            }
        });
        due
    }
}

/// Система: InteractRequest → эффекты
pub fn handle_interact_requests(
    mut requests: EventReader<InteractRequest>,
    mut interactables: Query<&mut Interactable>,
    players: Query<&Transform, With<Player>>,
    mut inventory: ResMut<ItemBag>,
    mut pending: ResMut<PendingEffects>,
) {
    let player_position = players.single().ok().map(|transform| transform.translation);

    for request in requests.read() {
        let Ok(mut interactable) = interactables.get_mut(request.entity) else {
            logger::log_warning(&format!(
                "Interaction: {:?} has no Interactable, request ignored",
                request.entity
            ));
            continue;
        };
        if !interactable.can_interact() {
            continue;
        }

        let mut ctx = InteractContext {
            inventory: inventory.as_mut(),
            player_position,
        };
        let effects = interactable.interact(&mut ctx);
        logger::log(&format!(
            "Interaction: '{}' on {:?} → {} effect(s)",
            interactable.prompt,
            request.entity,
            effects.len()
        ));
        pending
            .0
            .extend(effects.into_iter().map(|effect| (request.entity, effect)));
    }
}

/// Система: tweens и таймеры объектов
pub fn advance_interactables(
    mut interactables: Query<(Entity, &mut Interactable)>,
    mut pending: ResMut<PendingEffects>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut interactable) in interactables.iter_mut() {
        let effects = interactable.advance(delta);
        pending
            .0
            .extend(effects.into_iter().map(|effect| (entity, effect)));
    }
}

/// Система: применение эффектов
pub fn apply_interaction_effects(
    mut pending: ResMut<PendingEffects>,
    mut interactables: Query<&mut Interactable>,
    mut players: Query<&mut Transform, With<Player>>,
    inventory: Res<ItemBag>,
    mut schedule: ResMut<WakeSchedule>,
    mut notifications: EventWriter<InteractionNotification>,
    mut notes: EventWriter<NoteOpened>,
    mut cues: EventWriter<InteractionCueEvent>,
    mut levers: EventWriter<LeverPulled>,
    mut activations: EventWriter<ActivateAgent>,
    mut scenes: EventWriter<SceneTransitionRequested>,
) {
    for (source, effect) in pending.0.drain(..) {
        match effect {
            InteractionEffect::Notify(message) => {
                notifications.write(InteractionNotification { message });
            }
            InteractionEffect::ShowNote(text) => {
                notes.write(NoteOpened { text });
            }
            InteractionEffect::Cue(cue) => {
                cues.write(InteractionCueEvent { entity: source, cue });
            }
            InteractionEffect::TeleportPlayer(position) => match players.single_mut() {
                Ok(mut transform) => transform.translation = position,
                Err(_) => logger::log_warning("Interaction: teleport requested but player not found"),
            },
            InteractionEffect::ForceOpen(target) => match interactables.get_mut(target) {
                Ok(mut interactable) => {
                    if interactable.force_open(inventory.as_ref()) {
                        logger::log(&format!("Interaction: {:?} force-opened by {:?}", target, source));
                    } else {
                        logger::log(&format!("Interaction: {:?} stays shut after power-up", target));
                    }
                }
                Err(_) => logger::log_warning(&format!(
                    "Interaction: force-open target {:?} is not interactable",
                    target
                )),
            },
            InteractionEffect::WakeAgents { target, delay } => {
                if delay <= 0.0 {
                    activations.write(ActivateAgent { target });
                } else {
                    logger::log_info(&format!("Interaction: agents wake in {}s", delay));
                    schedule.schedule(target, delay);
                }
            }
            InteractionEffect::LeverPulled => {
                levers.write(LeverPulled { entity: source });
            }
            InteractionEffect::LoadScene(scene) => {
                logger::log_info(&format!("Interaction: scene transition to '{}'", scene));
                scenes.write(SceneTransitionRequested { scene });
            }
        }
    }
}

/// Система: отложенное пробуждение агентов
pub fn run_wake_schedule(
    mut schedule: ResMut<WakeSchedule>,
    mut activations: EventWriter<ActivateAgent>,
    time: Res<Time<Fixed>>,
) {
    for target in schedule.advance(time.delta_secs()) {
        logger::log_info(&format!("Interaction: waking agents ({:?})", target));
        activations.write(ActivateAgent { target });
    }
}

/// Система: подсказка для объекта в фокусе
pub fn update_interaction_prompt(
    focus: Res<InteractionFocus>,
    interactables: Query<&Interactable>,
    inventory: Res<ItemBag>,
    mut prompt: ResMut<InteractionPrompt>,
) {
    let next = focus
        .0
        .and_then(|entity| interactables.get(entity).ok().map(|interactable| (entity, interactable)))
        .filter(|(_, interactable)| interactable.can_interact())
        .map(|(entity, interactable)| {
            let verb = interactable.prompt_text(inventory.as_ref());
            InteractionPrompt {
                focused: Some(entity),
                text: (!verb.is_empty()).then(|| format!("Press E to {}", verb)),
            }
        })
        .unwrap_or_default();

    if *prompt != next {
        *prompt = next;
    }
}
