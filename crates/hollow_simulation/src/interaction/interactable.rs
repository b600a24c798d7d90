//! Interactable: всё, с чем игрок взаимодействует клавишей E
//!
//! Архитектура:
//! - Один компонент `Interactable { prompt, enabled, kind }`, `kind`: tagged union
//! - Поведение = capability методы (`interact`, `advance`, `force_open`, ...)
//! - Побочные эффекты не применяются здесь, а возвращаются как `InteractionEffect`
//!   (ECS система применяет их: уведомления, телепорт, пробуждение агентов)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::inventory::Inventory;
use crate::ai::WakeTarget;
use crate::tween::Tween;

/// Пауза перед ручным выходом из укрытия (защита от двойного нажатия)
pub const HIDING_EXIT_GRACE: f32 = 0.2;

/// Звуковые сигналы интерактивных объектов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum InteractionCue {
    Locked,
    Open,
    PickedUp,
    LeverPulled,
    GeneratorStarted,
    NoFuel,
}

/// Результат взаимодействия, который применяет ECS
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    /// Короткое уведомление внизу экрана
    Notify(String),
    /// Текст записки
    ShowNote(String),
    Cue(InteractionCue),
    TeleportPlayer(Vec3),
    /// Открыть другой объект (генератор → двери)
    ForceOpen(Entity),
    /// Разбудить агентов через `delay` секунд
    WakeAgents { target: WakeTarget, delay: f32 },
    LeverPulled,
    /// Переход на другую сцену (затемнение рисует движок)
    LoadScene(String),
}

/// Что нужно объекту от окружения в момент взаимодействия
pub struct InteractContext<'a> {
    pub inventory: &'a mut dyn Inventory,
    pub player_position: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoorState {
    pub required_key: Option<String>,
    pub open_angle: f32,
    pub open_duration: f32,
    /// Кого разбудить, когда дверь откроется полностью
    pub wakes: Option<WakeTarget>,
    pub angle: f32,
    pub swing: Option<Tween<f32>>,
    pub is_open: bool,
}

impl Default for DoorState {
    fn default() -> Self {
        Self {
            required_key: None,
            open_angle: 90.0,
            open_duration: 0.5,
            wakes: None,
            angle: 0.0,
            swing: None,
            is_open: false,
        }
    }
}

impl DoorState {
    fn start_opening(&mut self) -> bool {
        if self.is_open || self.swing.is_some() {
            return false;
        }
        self.swing = Some(Tween::new(self.angle, self.open_angle, self.open_duration));
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CageDoorState {
    pub required_key: String,
    pub consume_key: bool,
    pub open_offset: Vec3,
    pub open_duration: f32,
    pub offset: Vec3,
    pub slide: Option<Tween<Vec3>>,
    pub is_open: bool,
}

impl Default for CageDoorState {
    fn default() -> Self {
        Self {
            required_key: "Cage Key".to_owned(),
            consume_key: true,
            open_offset: Vec3::new(1.2, 0.0, 0.0),
            open_duration: 1.5,
            offset: Vec3::ZERO,
            slide: None,
            is_open: false,
        }
    }
}

impl CageDoorState {
    fn start_opening(&mut self) -> bool {
        if self.is_open || self.slide.is_some() {
            return false;
        }
        self.slide = Some(Tween::new(Vec3::ZERO, self.open_offset, self.open_duration));
        true
    }
}

/// Дверь подвала: нужно несколько одинаковых ключей, ведёт в другую сцену
#[derive(Debug, Clone, PartialEq)]
pub struct BasementDoorState {
    pub required_key: String,
    pub required_key_count: usize,
    pub consume_keys: bool,
    pub locked_message: String,
    pub target_scene: String,
    pub is_open: bool,
}

impl Default for BasementDoorState {
    fn default() -> Self {
        Self {
            required_key: "Basement Key".to_owned(),
            required_key_count: 3,
            consume_keys: true,
            locked_message: "Locked... I can see 3 keyholes".to_owned(),
            target_scene: "MainMap".to_owned(),
            is_open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickupState {
    pub item_name: String,
    /// Записка: текст показывается при подборе
    pub note_text: Option<String>,
    pub picked_up: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeverState {
    pub pulled_angle: f32,
    pub pull_duration: f32,
    pub angle: f32,
    pub swing: Option<Tween<f32>>,
    pub pulled: bool,
}

impl Default for LeverState {
    fn default() -> Self {
        Self {
            pulled_angle: -50.0,
            pull_duration: 0.4,
            angle: 0.0,
            swing: None,
            pulled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HidingSpotState {
    pub hide_point: Vec3,
    /// `None` = вернуть игрока туда, откуда он зашёл
    pub exit_point: Option<Vec3>,
    pub hide_time: f32,
    pub occupied: bool,
    pub hidden_for: f32,
    pub return_point: Option<Vec3>,
}

impl Default for HidingSpotState {
    fn default() -> Self {
        Self {
            hide_point: Vec3::ZERO,
            exit_point: None,
            hide_time: 3.0,
            occupied: false,
            hidden_for: 0.0,
            return_point: None,
        }
    }
}

impl HidingSpotState {
    fn leave(&mut self) -> Option<InteractionEffect> {
        if !self.occupied {
            return None;
        }
        self.occupied = false;
        self.hidden_for = 0.0;
        let exit = self.exit_point.or(self.return_point.take());
        exit.map(InteractionEffect::TeleportPlayer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorState {
    pub fuel_item: String,
    pub empty_message: String,
    /// Двери, которые открываются при запуске
    pub doors: Vec<Entity>,
    pub running: bool,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            fuel_item: "Gas Can".to_owned(),
            empty_message: "Out of fuel.".to_owned(),
            doors: Vec::new(),
            running: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HatchState {
    pub required_key: String,
    pub teleport_to: Option<Vec3>,
    pub wakes: Option<WakeTarget>,
    pub agent_start_delay: f32,
    pub activated: bool,
}

impl Default for HatchState {
    fn default() -> Self {
        Self {
            required_key: "Attic Key".to_owned(),
            teleport_to: None,
            wakes: Some(WakeTarget::AllDormant),
            agent_start_delay: 10.0,
            activated: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractableKind {
    Door(DoorState),
    CageDoor(CageDoorState),
    BasementDoor(BasementDoorState),
    Pickup(PickupState),
    Lever(LeverState),
    HidingSpot(HidingSpotState),
    Generator(GeneratorState),
    Hatch(HatchState),
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Interactable {
    /// Глагол для подсказки ("open door" → "Press E to open door")
    pub prompt: String,
    pub enabled: bool,
    pub kind: InteractableKind,
}

impl Interactable {
    pub fn new(prompt: impl Into<String>, kind: InteractableKind) -> Self {
        Self {
            prompt: prompt.into(),
            enabled: true,
            kind,
        }
    }

    pub fn door(state: DoorState) -> Self {
        Self::new("open door", InteractableKind::Door(state))
    }

    pub fn cage_door(state: CageDoorState) -> Self {
        Self::new("open cage door", InteractableKind::CageDoor(state))
    }

    pub fn basement_door(state: BasementDoorState) -> Self {
        Self::new("open basement door", InteractableKind::BasementDoor(state))
    }

    pub fn pickup(item_name: impl Into<String>) -> Self {
        let item_name = item_name.into();
        Self::new(
            format!("pick up {}", item_name),
            InteractableKind::Pickup(PickupState {
                item_name,
                ..Default::default()
            }),
        )
    }

    pub fn note(item_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            "read note",
            InteractableKind::Pickup(PickupState {
                item_name: item_name.into(),
                note_text: Some(text.into()),
                picked_up: false,
            }),
        )
    }

    pub fn lever() -> Self {
        Self::new("pull lever", InteractableKind::Lever(LeverState::default()))
    }

    pub fn hiding_spot(state: HidingSpotState) -> Self {
        Self::new("hide", InteractableKind::HidingSpot(state))
    }

    pub fn generator(state: GeneratorState) -> Self {
        Self::new("refuel generator", InteractableKind::Generator(state))
    }

    pub fn hatch(state: HatchState) -> Self {
        Self::new("open hatch", InteractableKind::Hatch(state))
    }

    pub fn can_interact(&self) -> bool {
        self.enabled
    }

    /// Глагол подсказки с учётом состояния (люк, укрытие, генератор)
    pub fn prompt_text(&self, inventory: &dyn Inventory) -> String {
        match &self.kind {
            InteractableKind::Hatch(hatch) if hatch.activated => String::new(),
            InteractableKind::Hatch(hatch) if inventory.has_item(&hatch.required_key) => {
                "open hatch".to_owned()
            }
            InteractableKind::Hatch(_) => "hatch locked".to_owned(),
            InteractableKind::BasementDoor(door) if door.is_open => String::new(),
            InteractableKind::BasementDoor(door) => {
                let keys = inventory.item_count(&door.required_key);
                if keys >= door.required_key_count {
                    self.prompt.clone()
                } else {
                    format!("{} ({}/{} keys)", self.prompt, keys, door.required_key_count)
                }
            }
            InteractableKind::HidingSpot(spot) if spot.occupied => "exit hiding spot".to_owned(),
            InteractableKind::Generator(generator) if generator.running => {
                "generator humming".to_owned()
            }
            _ => self.prompt.clone(),
        }
    }

    /// Игрок сейчас спрятан в этом объекте
    pub fn conceals_player(&self) -> bool {
        matches!(&self.kind, InteractableKind::HidingSpot(spot) if spot.occupied)
    }

    /// Нажатие E
    pub fn interact(&mut self, ctx: &mut InteractContext<'_>) -> Vec<InteractionEffect> {
        let mut effects = Vec::new();
        let mut disable = false;

        match &mut self.kind {
            InteractableKind::Door(door) => {
                let unlocked = door
                    .required_key
                    .as_deref()
                    .map_or(true, |key| ctx.inventory.has_item(key));
                if !unlocked {
                    effects.push(InteractionEffect::Notify(
                        "You need a key to open this door.".to_owned(),
                    ));
                    effects.push(InteractionEffect::Cue(InteractionCue::Locked));
                } else if door.start_opening() {
                    effects.push(InteractionEffect::Cue(InteractionCue::Open));
                }
            }
            InteractableKind::CageDoor(cage) => {
                if cage.is_open || cage.slide.is_some() {
                    return effects;
                }
                if !ctx.inventory.has_item(&cage.required_key) {
                    effects.push(InteractionEffect::Cue(InteractionCue::Locked));
                    return effects;
                }
                if cage.consume_key {
                    ctx.inventory.remove_item(&cage.required_key);
                }
                cage.start_opening();
                effects.push(InteractionEffect::Cue(InteractionCue::Open));
            }
            InteractableKind::BasementDoor(door) => {
                if door.is_open {
                    return effects;
                }
                if ctx.inventory.item_count(&door.required_key) < door.required_key_count {
                    effects.push(InteractionEffect::Notify(door.locked_message.clone()));
                    effects.push(InteractionEffect::Cue(InteractionCue::Locked));
                    return effects;
                }
                if door.consume_keys {
                    for _ in 0..door.required_key_count {
                        ctx.inventory.remove_item(&door.required_key);
                    }
                }
                door.is_open = true;
                disable = true;
                effects.push(InteractionEffect::Cue(InteractionCue::Open));
                effects.push(InteractionEffect::LoadScene(door.target_scene.clone()));
            }
            InteractableKind::Pickup(pickup) => {
                if pickup.picked_up {
                    return effects;
                }
                if let Some(text) = pickup.note_text.as_ref().filter(|text| !text.is_empty()) {
                    effects.push(InteractionEffect::ShowNote(text.clone()));
                }
                if ctx.inventory.add_item(&pickup.item_name) {
                    pickup.picked_up = true;
                    disable = true;
                    effects.push(InteractionEffect::Cue(InteractionCue::PickedUp));
                    if pickup.note_text.is_none() {
                        effects.push(InteractionEffect::Notify(format!(
                            "Picked up {}.",
                            pickup.item_name
                        )));
                    }
                } else {
                    effects.push(InteractionEffect::Notify("Inventory is full!".to_owned()));
                }
            }
            InteractableKind::Lever(lever) => {
                if lever.pulled {
                    return effects;
                }
                lever.pulled = true;
                lever.swing = Some(Tween::new(lever.angle, lever.pulled_angle, lever.pull_duration));
                disable = true;
                effects.push(InteractionEffect::Cue(InteractionCue::LeverPulled));
                effects.push(InteractionEffect::LeverPulled);
            }
            InteractableKind::HidingSpot(spot) => {
                if spot.occupied {
                    if spot.hidden_for >= HIDING_EXIT_GRACE {
                        effects.extend(spot.leave());
                    }
                } else {
                    let Some(player_position) = ctx.player_position else {
                        return effects;
                    };
                    spot.occupied = true;
                    spot.hidden_for = 0.0;
                    spot.return_point = Some(player_position);
                    effects.push(InteractionEffect::TeleportPlayer(spot.hide_point));
                    effects.push(InteractionEffect::Notify("Press E to exit hiding spot".to_owned()));
                }
            }
            InteractableKind::Generator(generator) => {
                if generator.running {
                    return effects;
                }
                if !ctx.inventory.remove_item(&generator.fuel_item) {
                    effects.push(InteractionEffect::Cue(InteractionCue::NoFuel));
                    effects.push(InteractionEffect::Notify(generator.empty_message.clone()));
                    return effects;
                }
                generator.running = true;
                disable = true;
                effects.push(InteractionEffect::Cue(InteractionCue::GeneratorStarted));
                effects.extend(generator.doors.iter().copied().map(InteractionEffect::ForceOpen));
            }
            InteractableKind::Hatch(hatch) => {
                if hatch.activated {
                    return effects;
                }
                if !ctx.inventory.has_item(&hatch.required_key) {
                    effects.push(InteractionEffect::Cue(InteractionCue::Locked));
                    effects.push(InteractionEffect::Notify("The hatch is locked.".to_owned()));
                    return effects;
                }
                hatch.activated = true;
                disable = true;
                effects.push(InteractionEffect::Cue(InteractionCue::Open));
                if let Some(destination) = hatch.teleport_to {
                    effects.push(InteractionEffect::TeleportPlayer(destination));
                }
                if let Some(target) = hatch.wakes {
                    effects.push(InteractionEffect::WakeAgents {
                        target,
                        delay: hatch.agent_start_delay,
                    });
                }
            }
        }

        if disable {
            self.enabled = false;
        }
        effects
    }

    /// Тик анимаций и таймеров объекта
    pub fn advance(&mut self, delta: f32) -> Vec<InteractionEffect> {
        let mut effects = Vec::new();

        match &mut self.kind {
            InteractableKind::Door(door) => {
                if let Some(swing) = door.swing.as_mut() {
                    door.angle = swing.advance(delta);
                    if swing.is_finished() {
                        door.swing = None;
                        door.is_open = true;
                        self.enabled = false;
                        if let Some(target) = door.wakes {
                            effects.push(InteractionEffect::WakeAgents { target, delay: 0.0 });
                        }
                    }
                }
            }
            InteractableKind::CageDoor(cage) => {
                if let Some(slide) = cage.slide.as_mut() {
                    cage.offset = slide.advance(delta);
                    if slide.is_finished() {
                        cage.slide = None;
                        cage.is_open = true;
                        self.enabled = false;
                    }
                }
            }
            InteractableKind::Lever(lever) => {
                if let Some(swing) = lever.swing.as_mut() {
                    lever.angle = swing.advance(delta);
                    if swing.is_finished() {
                        lever.swing = None;
                    }
                }
            }
            InteractableKind::HidingSpot(spot) => {
                if spot.occupied {
                    spot.hidden_for += delta;
                    if spot.hidden_for >= spot.hide_time {
                        effects.extend(spot.leave());
                    }
                }
            }
            InteractableKind::BasementDoor(_)
            | InteractableKind::Pickup(_)
            | InteractableKind::Generator(_)
            | InteractableKind::Hatch(_) => {}
        }

        effects
    }

    /// Открыть по сигналу генератора
    ///
    /// Дверь снова становится интерактивной, но замок проверяется как при
    /// обычном нажатии: без ключа она остаётся закрытой.
    /// `true` если дверь начала открываться.
    pub fn force_open(&mut self, inventory: &dyn Inventory) -> bool {
        let InteractableKind::Door(door) = &mut self.kind else {
            return false;
        };
        if door.is_open {
            return false;
        }
        self.enabled = true;

        let unlocked = door
            .required_key
            .as_deref()
            .map_or(true, |key| inventory.has_item(key));
        unlocked && door.start_opening()
    }
}
