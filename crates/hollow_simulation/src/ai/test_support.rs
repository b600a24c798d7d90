//! Fake коллабораторы для unit тестов state machine.

use bevy::prelude::*;

use super::collaborators::{
    AgentContext, AgentCue, AgentFeedback, AgentPose, GameOverSink, NavigationOracle, PathStatus,
};
use super::perception::ClearSight;
use super::state_machine::PatrolChaseStateMachine;

/// Навигация "на бумаге": позиция двигается только руками теста
#[derive(Debug, Clone)]
pub struct FakeNav {
    pub position: Vec3,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopped: bool,
    pub path_cleared: bool,
    pub velocity: f32,
    pub path_status: PathStatus,
    pub on_surface: bool,
    /// `None` = nearest_navigable_position возвращает саму точку
    pub snap_to: Option<Vec3>,
    pub warped_to: Option<Vec3>,
}

impl Default for FakeNav {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            destination: None,
            speed: 0.0,
            stopped: false,
            path_cleared: false,
            velocity: 0.0,
            path_status: PathStatus::Complete,
            on_surface: true,
            snap_to: None,
            warped_to: None,
        }
    }
}

impl NavigationOracle for FakeNav {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
        self.path_cleared = false;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn clear_path(&mut self) {
        self.destination = None;
        self.path_cleared = true;
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|destination| self.position.distance(destination))
            .unwrap_or(0.0)
    }

    fn velocity_magnitude(&self) -> f32 {
        self.velocity
    }

    fn path_status(&self) -> PathStatus {
        self.path_status
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.on_surface
    }

    fn nearest_navigable_position(&self, point: Vec3, _search_radius: f32) -> Option<Vec3> {
        Some(self.snap_to.unwrap_or(point))
    }

    fn warp_to(&mut self, position: Vec3) {
        self.position = position;
        self.warped_to = Some(position);
        self.on_surface = true;
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    pub cues: Vec<AgentCue>,
    pub locomotion_speed: f32,
    pub chasing: bool,
    pub attack_animations: usize,
    pub faced: Option<Vec3>,
}

impl AgentFeedback for RecordingFeedback {
    fn play_cue(&mut self, cue: AgentCue) {
        self.cues.push(cue);
    }

    fn set_locomotion_speed(&mut self, speed: f32) {
        self.locomotion_speed = speed;
    }

    fn set_chasing_flag(&mut self, chasing: bool) {
        self.chasing = chasing;
    }

    fn trigger_attack_animation(&mut self) {
        self.attack_animations += 1;
    }

    fn face_towards(&mut self, point: Vec3) {
        self.faced = Some(point);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaughtCounter {
    pub reports: usize,
}

impl GameOverSink for CaughtCounter {
    fn report_target_caught(&mut self) {
        self.reports += 1;
    }
}

/// Всё окружение агента в одном месте
#[derive(Debug, Clone, Default)]
pub struct Harness {
    pub nav: FakeNav,
    pub has_navigation: bool,
    pub target: Option<Vec3>,
    pub hidden: bool,
    pub feedback: RecordingFeedback,
    pub game_over: CaughtCounter,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            has_navigation: true,
            ..Default::default()
        }
    }

    pub fn without_navigation() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> AgentPose {
        AgentPose::new(self.nav.position, Vec3::Z)
    }

    pub fn activate(&mut self, machine: &mut PatrolChaseStateMachine) {
        let pose = self.pose();
        if self.has_navigation {
            machine.activate(&pose, Some(&mut self.nav));
        } else {
            machine.activate(&pose, None);
        }
    }

    pub fn tick(&mut self, machine: &mut PatrolChaseStateMachine, delta: f32) {
        let pose = self.pose();
        let sight = ClearSight;
        let navigation: Option<&mut dyn NavigationOracle> = if self.has_navigation {
            Some(&mut self.nav)
        } else {
            None
        };
        let mut ctx = AgentContext {
            navigation,
            target: &self.target,
            hidden: &self.hidden,
            sight: &sight,
            feedback: &mut self.feedback,
            game_over: &mut self.game_over,
        };
        machine.tick(&pose, delta, &mut ctx);
    }

    pub fn ticks(&mut self, machine: &mut PatrolChaseStateMachine, delta: f32, count: usize) {
        for _ in 0..count {
            self.tick(machine, delta);
        }
    }
}
