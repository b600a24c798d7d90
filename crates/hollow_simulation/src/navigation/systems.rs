//! Kinematic навигатор для headless режима
//!
//! Двигает агента по прямой к destination со скоростью `NavAgent::speed`.
//! Partial путь ведёт к ближайшей проходимой точке, Invalid: стоим.
//! В игре эту работу делает NavMesh движка.

use bevy::prelude::*;

use super::agent::NavAgent;
use super::surface::NavigationSurface;
use crate::ai::PathStatus;

/// Ближе этого считаем что пришли
const ARRIVAL_EPSILON: f32 = 1e-3;

/// Система: NavAgent → Transform
///
/// Работает в FixedUpdate после AI (AI пишет намерение, навигатор исполняет).
pub fn drive_nav_agents(
    mut query: Query<(&mut NavAgent, &mut Transform)>,
    surface: Res<NavigationSurface>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let surface = surface.surface();

    for (mut nav, mut transform) in query.iter_mut() {
        if let Some(warp) = nav.pending_warp.take() {
            transform.translation = warp;
        }

        let position = transform.translation;
        let goal = match (nav.destination, nav.path_status) {
            (Some(destination), PathStatus::Complete) => Some(destination),
            (Some(destination), PathStatus::Partial) => surface.nearest(destination, f32::MAX),
            _ => None,
        };

        let step = match goal {
            Some(goal) if !nav.stopped && delta > 0.0 => {
                let to_goal = goal - position;
                let distance = to_goal.length();
                if distance <= ARRIVAL_EPSILON {
                    Vec3::ZERO
                } else {
                    to_goal / distance * (nav.speed.max(0.0) * delta).min(distance)
                }
            }
            _ => Vec3::ZERO,
        };

        transform.translation += step;
        nav.velocity = if delta > 0.0 { step / delta } else { Vec3::ZERO };

        let flat = Vec3::new(step.x, 0.0, step.z);
        if flat.length_squared() > ARRIVAL_EPSILON * ARRIVAL_EPSILON {
            transform.look_to(flat, Vec3::Y);
        }

        let position = transform.translation;
        nav.remaining_distance = nav
            .destination
            .map_or(0.0, |destination| position.distance(destination));
        if let Some(destination) = nav.destination {
            nav.path_status = surface.path_status(position, destination);
        }
        nav.on_surface = surface.contains(position);
    }
}
