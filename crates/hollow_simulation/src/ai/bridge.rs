//! Адаптеры ECS ↔ коллабораторы state machine
//!
//! State machine не знает про Bevy: системы собирают `AgentContext`
//! из компонентов/ресурсов, а после тика переносят буферы обратно в ECS.

use bevy::prelude::*;

use super::collaborators::{AgentCue, AgentFeedback, GameOverSink, LineOfSight};
use super::perception::ClearSight;

/// Physics raycast для всех агентов (в игре: физика движка)
#[derive(Resource)]
pub struct SightOracle(pub Box<dyn LineOfSight + Send + Sync>);

impl SightOracle {
    pub fn new(sight: impl LineOfSight + Send + Sync + 'static) -> Self {
        Self(Box::new(sight))
    }

    pub fn sight(&self) -> &dyn LineOfSight {
        self.0.as_ref()
    }
}

impl Default for SightOracle {
    fn default() -> Self {
        Self::new(ClearSight)
    }
}

/// Сигналы агента за один тик
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackBuffer {
    pub cues: Vec<AgentCue>,
    pub locomotion_speed: Option<f32>,
    pub chasing: Option<bool>,
    pub attack_triggers: u32,
    pub facing: Option<Vec3>,
}

impl AgentFeedback for FeedbackBuffer {
    fn play_cue(&mut self, cue: AgentCue) {
        self.cues.push(cue);
    }

    fn set_locomotion_speed(&mut self, speed: f32) {
        self.locomotion_speed = Some(speed);
    }

    fn set_chasing_flag(&mut self, chasing: bool) {
        self.chasing = Some(chasing);
    }

    fn trigger_attack_animation(&mut self) {
        self.attack_triggers += 1;
    }

    fn face_towards(&mut self, point: Vec3) {
        self.facing = Some(point);
    }
}

/// Поймал ли агент игрока в этом тике
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaughtFlag(pub bool);

impl GameOverSink for CaughtFlag {
    fn report_target_caught(&mut self) {
        self.0 = true;
    }
}
