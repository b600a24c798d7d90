//! Patrol/chase state machine одного агента
//!
//! Patrolling → Chasing → Attacking | Searching → Patrolling
//!
//! Архитектура:
//! - Тик раз в fixed step, таймеры = аккумуляторы delta
//! - Коллабораторы (навигация, raycast, audio) приходят через `AgentContext`
//! - Отсутствующий коллаборатор = no-op для тика (лог один раз), не паника
//! - Destination и скорость пишет только машина, движок/аниматор читают

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::collaborators::{
    AgentContext, AgentCue, AgentPose, HiddenPredicate, LineOfSight, NavigationOracle,
};
use super::components::{AIConfig, AIState, PatrolRoute};
use super::footsteps::FootstepCadence;
use super::perception::{Perception, PerceptionQuery};
use super::stall::{detour_point, StallDetector};
use crate::logger;

/// Активен ли агент (создаётся спящим, будится дверью/люком)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Activation {
    #[default]
    Dormant,
    Active,
}

/// Обход застревания, держится один check interval
#[derive(Debug, Clone, Copy, PartialEq)]
struct Detour {
    point: Vec3,
    remaining: f32,
}

#[derive(Debug)]
pub struct PatrolChaseStateMachine {
    config: AIConfig,
    route: PatrolRoute,
    state: AIState,
    activation: Activation,

    patrol_index: usize,
    waiting_at_point: bool,
    dwell_timer: f32,

    last_known_target: Option<Vec3>,
    stall: StallDetector,
    detour: Option<Detour>,
    target_caught: bool,

    /// Последний destination, отданный навигации
    destination: Option<Vec3>,
    /// Скорость, которую машина сейчас требует (0 когда стоим)
    commanded_speed: f32,

    footsteps: FootstepCadence,
    rng: ChaCha8Rng,

    warned_missing_navigation: bool,
    warned_missing_target: bool,
}

impl PatrolChaseStateMachine {
    pub fn new(config: AIConfig, route: PatrolRoute, seed: u64) -> Self {
        Self {
            config,
            route,
            state: AIState::default(),
            activation: Activation::Dormant,
            patrol_index: 0,
            waiting_at_point: false,
            dwell_timer: 0.0,
            last_known_target: None,
            stall: StallDetector::default(),
            detour: None,
            target_caught: false,
            destination: None,
            commanded_speed: 0.0,
            footsteps: FootstepCadence::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            warned_missing_navigation: false,
            warned_missing_target: false,
        }
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn state(&self) -> AIState {
        self.state
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn is_active(&self) -> bool {
        self.activation == Activation::Active
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting_at_point
    }

    pub fn dwell_remaining(&self) -> f32 {
        if self.waiting_at_point {
            self.dwell_timer.max(0.0)
        } else {
            0.0
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn commanded_speed(&self) -> f32 {
        self.commanded_speed
    }

    pub fn last_known_target(&self) -> Option<Vec3> {
        self.last_known_target
    }

    pub fn target_caught(&self) -> bool {
        self.target_caught
    }

    /// Видит ли агент цель прямо сейчас (без побочных эффектов)
    pub fn perceive(
        &self,
        pose: &AgentPose,
        target: Vec3,
        sight: &dyn LineOfSight,
        hidden: &dyn HiddenPredicate,
    ) -> Perception {
        PerceptionQuery {
            eye: pose.eye,
            forward: pose.forward,
            target,
            detection_range: self.config.detection_range,
            view_angle: self.config.view_angle,
        }
        .evaluate(sight, hidden)
    }

    /// One-time инициализация при пробуждении
    ///
    /// Повторный вызов ничего не делает.
    pub fn activate(&mut self, pose: &AgentPose, navigation: Option<&mut (dyn NavigationOracle + '_)>) {
        if self.is_active() {
            return;
        }
        self.activation = Activation::Active;

        let Some(nav) = navigation else {
            logger::log_warning("EnemyAI: activated without navigation binding, agent will idle");
            self.warned_missing_navigation = true;
            return;
        };

        if !nav.is_on_navigable_surface() {
            match nav.nearest_navigable_position(pose.position, self.config.navmesh_sample_radius) {
                Some(snapped) => {
                    nav.warp_to(snapped);
                    logger::log(&format!("EnemyAI: warped onto navmesh at {:?}", snapped));
                }
                None => logger::log_warning(&format!(
                    "EnemyAI: no navigable position within {}m of {:?}",
                    self.config.navmesh_sample_radius, pose.position
                )),
            }
        }

        if let Some(first) = self.route.get(0) {
            self.patrol_index = 0;
            self.command_destination(nav, first);
            self.waiting_at_point = true;
            self.dwell_timer = self.config.patrol_wait_time;
            self.halt(nav);
        }

        logger::log_info("EnemyAI: AI initialized and enabled");
    }

    /// Внешний reset (после game over): обратно в патруль с текущего индекса
    pub fn reset(&mut self, navigation: Option<&mut (dyn NavigationOracle + '_)>) {
        self.target_caught = false;
        self.return_to_patrol(navigation);
        logger::log_info("EnemyAI: reset to Patrolling");
    }

    /// Один тик поведения
    pub fn tick(&mut self, pose: &AgentPose, delta: f32, ctx: &mut AgentContext<'_>) {
        if !self.is_active() {
            return;
        }

        self.update_animator(ctx);

        match self.state {
            AIState::Patrolling => self.patrol(pose, delta, ctx),
            AIState::Chasing => self.chase(pose, delta, ctx),
            AIState::Attacking => self.attack(ctx),
            AIState::Searching => self.search(ctx),
        }

        self.play_footsteps(delta, ctx);
    }

    fn patrol(&mut self, pose: &AgentPose, delta: f32, ctx: &mut AgentContext<'_>) {
        if self.route.is_empty() {
            return;
        }
        let Some(nav) = ctx.navigation.as_deref_mut() else {
            self.warn_missing_navigation();
            return;
        };

        if let Some(target) = ctx.target.current_target_position() {
            if self.perceive(pose, target, ctx.sight, ctx.hidden).is_perceived() {
                self.state = AIState::Chasing;
                self.last_known_target = Some(target);
                self.stall.reset();
                self.detour = None;
                ctx.feedback.play_cue(AgentCue::Detected);
                logger::log(&format!("EnemyAI: Patrolling → Chasing (target at {:?})", target));
                return;
            }
        }

        if self.waiting_at_point {
            self.halt(nav);
            self.dwell_timer -= delta;
            if self.dwell_timer <= 0.0 {
                self.waiting_at_point = false;
                self.resume(nav, self.config.patrol_speed);
                if let Some(waypoint) = self.route.get(self.patrol_index) {
                    self.command_destination(nav, waypoint);
                }
            }
            return;
        }

        self.command_speed(nav, self.config.patrol_speed);

        if nav.remaining_distance() < self.config.waypoint_arrival_distance {
            self.patrol_index = self.route.next_index(self.patrol_index);
            self.dwell_timer = self.config.dwell_for(self.patrol_index);
            self.waiting_at_point = true;
            self.halt(nav);
            logger::log(&format!(
                "EnemyAI: reached waypoint, next {} after {}s",
                self.patrol_index, self.dwell_timer
            ));
        }
    }

    fn chase(&mut self, pose: &AgentPose, delta: f32, ctx: &mut AgentContext<'_>) {
        let Some(target) = ctx.target.current_target_position() else {
            self.warn_missing_target();
            return;
        };
        let Some(nav) = ctx.navigation.as_deref_mut() else {
            self.warn_missing_navigation();
            return;
        };

        if ctx.hidden.is_target_hidden() {
            logger::log("EnemyAI: Chasing → Patrolling (target hidden)");
            self.return_to_patrol(Some(nav));
            return;
        }

        self.last_known_target = Some(target);

        if self
            .stall
            .observe(delta, nav.velocity_magnitude(), nav.path_status(), &self.config)
        {
            let raw = detour_point(pose.position, target, self.config.detour_distance);
            let point = nav
                .nearest_navigable_position(raw, self.config.navmesh_sample_radius)
                .unwrap_or(raw);
            self.detour = Some(Detour {
                point,
                remaining: self.config.stall_check_interval,
            });
            logger::log(&format!("EnemyAI: stuck while chasing, detour to {:?}", point));
        }

        match self.detour.as_mut() {
            Some(detour) => {
                let point = detour.point;
                detour.remaining -= delta;
                if detour.remaining <= 0.0 {
                    self.detour = None;
                }
                self.command_destination(nav, point);
            }
            None => self.command_destination(nav, target),
        }
        self.resume(nav, self.config.chase_speed);

        let distance = pose.position.distance(target);
        let can_see = self.perceive(pose, target, ctx.sight, ctx.hidden).is_perceived();
        if can_see && distance < self.config.attack_range {
            self.state = AIState::Attacking;
            logger::log(&format!("EnemyAI: Chasing → Attacking (distance {:.2})", distance));
        } else if !can_see && distance > self.config.lose_sight_distance() {
            self.state = AIState::Searching;
            self.detour = None;
            logger::log(&format!("EnemyAI: Chasing → Searching (lost at {:.2}m)", distance));
        }
    }

    fn attack(&mut self, ctx: &mut AgentContext<'_>) {
        if self.target_caught {
            // Поимка уже сообщена, ждём внешнего reset
            return;
        }
        let Some(target) = ctx.target.current_target_position() else {
            self.warn_missing_target();
            return;
        };

        if let Some(nav) = ctx.navigation.as_deref_mut() {
            nav.clear_path();
            self.halt(nav);
        }
        self.destination = None;
        ctx.feedback.face_towards(target);
        ctx.feedback.play_cue(AgentCue::Attack);
        ctx.feedback.trigger_attack_animation();

        if ctx.hidden.is_target_hidden() {
            logger::log("EnemyAI: Attacking → Patrolling (target hid in time)");
            self.return_to_patrol(ctx.navigation.as_deref_mut());
            return;
        }

        self.target_caught = true;
        logger::log_info("EnemyAI: target caught");
        ctx.game_over.report_target_caught();
    }

    fn search(&mut self, ctx: &mut AgentContext<'_>) {
        let Some(target) = ctx.target.current_target_position() else {
            self.warn_missing_target();
            return;
        };
        let Some(nav) = ctx.navigation.as_deref_mut() else {
            self.warn_missing_navigation();
            return;
        };

        if ctx.hidden.is_target_hidden() {
            logger::log("EnemyAI: Searching → Patrolling (target hidden)");
            self.return_to_patrol(Some(nav));
            return;
        }

        let goal = *self.last_known_target.get_or_insert(target);
        self.command_destination(nav, goal);

        if nav.remaining_distance() < self.config.search_arrival_distance {
            logger::log("EnemyAI: Searching → Patrolling (last known position reached)");
            self.return_to_patrol(Some(nav));
        }
    }

    fn return_to_patrol(&mut self, navigation: Option<&mut (dyn NavigationOracle + '_)>) {
        self.state = AIState::Patrolling;
        self.waiting_at_point = false;
        self.stall.reset();
        self.detour = None;

        let Some(nav) = navigation else {
            return;
        };
        self.resume(nav, self.config.patrol_speed);
        if let Some(waypoint) = self.route.get(self.patrol_index) {
            self.command_destination(nav, waypoint);
        }
    }

    fn update_animator(&mut self, ctx: &mut AgentContext<'_>) {
        let Some(nav) = ctx.navigation.as_deref() else {
            return;
        };
        ctx.feedback.set_locomotion_speed(nav.velocity_magnitude());
        ctx.feedback.set_chasing_flag(self.state == AIState::Chasing);
    }

    fn play_footsteps(&mut self, delta: f32, ctx: &mut AgentContext<'_>) {
        let Some(nav) = ctx.navigation.as_deref() else {
            return;
        };
        let velocity = nav.velocity_magnitude();
        if let Some(variant) = self.footsteps.step(delta, velocity, &self.config, &mut self.rng) {
            ctx.feedback.play_cue(AgentCue::Footstep(variant));
        }
    }

    fn command_destination(&mut self, nav: &mut (dyn NavigationOracle + '_), position: Vec3) {
        self.destination = Some(position);
        nav.set_destination(position);
    }

    fn command_speed(&mut self, nav: &mut (dyn NavigationOracle + '_), speed: f32) {
        self.commanded_speed = speed;
        nav.set_speed(speed);
    }

    fn halt(&mut self, nav: &mut (dyn NavigationOracle + '_)) {
        self.commanded_speed = 0.0;
        nav.set_stopped(true);
    }

    fn resume(&mut self, nav: &mut (dyn NavigationOracle + '_), speed: f32) {
        nav.set_stopped(false);
        self.command_speed(nav, speed);
    }

    fn warn_missing_navigation(&mut self) {
        if !self.warned_missing_navigation {
            self.warned_missing_navigation = true;
            logger::log_warning("EnemyAI: navigation binding missing, skipping movement");
        }
    }

    fn warn_missing_target(&mut self) {
        if !self.warned_missing_target {
            self.warned_missing_target = true;
            logger::log_warning("EnemyAI: target reference missing, skipping tick");
        }
    }
}
