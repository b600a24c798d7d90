//! NavAgent: зеркало навигационного агента в ECS
//!
//! Single writer:
//! - AI пишет destination / speed / stopped / warp
//! - Навигатор (drive_nav_agents) пишет remaining_distance / velocity / path_status / on_surface

use bevy::prelude::*;

use super::surface::WalkableSurface;
use crate::ai::{NavigationOracle, PathStatus};

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    /// Скорость движения (m/s)
    pub speed: f32,
    pub stopped: bool,
    /// Телепорт, который навигатор применит на следующем шаге
    pub pending_warp: Option<Vec3>,

    pub remaining_distance: f32,
    pub velocity: Vec3,
    pub path_status: PathStatus,
    pub on_surface: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 0.0,
            stopped: false,
            pending_warp: None,
            remaining_distance: 0.0,
            velocity: Vec3::ZERO,
            path_status: PathStatus::Complete,
            on_surface: true,
        }
    }
}

/// `NavAgent` + позиция + поверхность = `NavigationOracle` на один тик
pub struct NavBinding<'a> {
    agent: &'a mut NavAgent,
    position: Vec3,
    surface: &'a dyn WalkableSurface,
}

impl<'a> NavBinding<'a> {
    pub fn new(agent: &'a mut NavAgent, position: Vec3, surface: &'a dyn WalkableSurface) -> Self {
        Self {
            agent,
            position,
            surface,
        }
    }
}

/// `Option<NavBinding>` → то, что ждёт state machine
pub fn as_oracle<'b>(binding: &'b mut Option<NavBinding<'_>>) -> Option<&'b mut dyn NavigationOracle> {
    binding
        .as_mut()
        .map(|binding| binding as &mut dyn NavigationOracle)
}

impl NavigationOracle for NavBinding<'_> {
    fn set_destination(&mut self, position: Vec3) {
        self.agent.destination = Some(position);
        // Путь "пересчитан" сразу: дистанция и статус валидны в этом же тике
        self.agent.remaining_distance = self.position.distance(position);
        self.agent.path_status = self.surface.path_status(self.position, position);
    }

    fn set_speed(&mut self, speed: f32) {
        self.agent.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.agent.stopped = stopped;
    }

    fn clear_path(&mut self) {
        self.agent.destination = None;
        self.agent.remaining_distance = 0.0;
        self.agent.path_status = PathStatus::Complete;
    }

    fn remaining_distance(&self) -> f32 {
        self.agent.remaining_distance
    }

    fn velocity_magnitude(&self) -> f32 {
        self.agent.velocity.length()
    }

    fn path_status(&self) -> PathStatus {
        self.agent.path_status
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.agent.on_surface && self.surface.contains(self.position)
    }

    fn nearest_navigable_position(&self, point: Vec3, search_radius: f32) -> Option<Vec3> {
        self.surface.nearest(point, search_radius)
    }

    fn warp_to(&mut self, position: Vec3) {
        self.position = position;
        self.agent.pending_warp = Some(position);
        self.agent.on_surface = self.surface.contains(position);
        if let Some(destination) = self.agent.destination {
            self.agent.remaining_distance = position.distance(destination);
        }
    }
}
