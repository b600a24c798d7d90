//! Patrol/chase systems: пробуждение, reset, тик поведения

use bevy::prelude::*;

use crate::ai::bridge::{CaughtFlag, FeedbackBuffer, SightOracle};
use crate::ai::collaborators::{AgentContext, AgentPose};
use crate::ai::components::{EnemyAgent, Locomotion};
use crate::ai::events::{ActivateAgent, AgentCueEvent, ResetAgent, TargetCaught};
use crate::interaction::Interactable;
use crate::navigation::{as_oracle, NavAgent, NavBinding, NavigationSurface};
use crate::player::Player;

/// Поза агента из Transform (forward = -Z, как у Bevy)
fn agent_pose(transform: &Transform, agent: &EnemyAgent) -> AgentPose {
    AgentPose::new(transform.translation, *transform.forward())
        .with_eye_height(agent.machine().config().eye_height)
}

/// Система: ActivateAgent → one-time инициализация спящих агентов
pub fn activate_dormant_agents(
    mut events: EventReader<ActivateAgent>,
    mut agents: Query<(Entity, &mut EnemyAgent, &Transform, Option<&mut NavAgent>)>,
    surface: Res<NavigationSurface>,
) {
    for event in events.read() {
        for (entity, mut agent, transform, nav) in agents.iter_mut() {
            if !event.target.matches(entity) || agent.is_active() {
                continue;
            }

            let pose = agent_pose(transform, &agent);
            let mut nav = nav;
            let mut binding = nav
                .as_deref_mut()
                .map(|nav| NavBinding::new(nav, transform.translation, surface.surface()));
            agent.machine.activate(&pose, as_oracle(&mut binding));
            crate::log_info(&format!("AI: agent {:?} activated", entity));
        }
    }
}

/// Система: ResetAgent → обратно в патруль (после game over)
pub fn reset_caught_agents(
    mut events: EventReader<ResetAgent>,
    mut agents: Query<(Entity, &mut EnemyAgent, &Transform, Option<&mut NavAgent>)>,
    surface: Res<NavigationSurface>,
) {
    for event in events.read() {
        for (entity, mut agent, transform, nav) in agents.iter_mut() {
            if !event.target.matches(entity) || !agent.is_active() {
                continue;
            }

            let mut nav = nav;
            let mut binding = nav
                .as_deref_mut()
                .map(|nav| NavBinding::new(nav, transform.translation, surface.surface()));
            agent.machine.reset(as_oracle(&mut binding));
        }
    }
}

/// Система: тик patrol/chase поведения
///
/// Цель = единственный `Player`. Игрок спрятан, если хоть одно укрытие занято.
pub fn ai_patrol_chase_tick(
    mut agents: Query<
        (
            Entity,
            &mut EnemyAgent,
            &mut Transform,
            Option<&mut NavAgent>,
            Option<&mut Locomotion>,
        ),
        Without<Player>,
    >,
    players: Query<&Transform, (With<Player>, Without<EnemyAgent>)>,
    hiding_spots: Query<&Interactable>,
    surface: Res<NavigationSurface>,
    sight: Res<SightOracle>,
    mut cue_events: EventWriter<AgentCueEvent>,
    mut caught_events: EventWriter<TargetCaught>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let target = players.single().ok().map(|transform| transform.translation);
    let hidden = hiding_spots.iter().any(Interactable::conceals_player);

    for (entity, mut agent, mut transform, nav, locomotion) in agents.iter_mut() {
        if !agent.is_active() {
            continue;
        }

        let pose = agent_pose(&transform, &agent);
        let mut feedback = FeedbackBuffer::default();
        let mut caught = CaughtFlag::default();

        {
            let mut nav = nav;
            let mut binding = nav
                .as_deref_mut()
                .map(|nav| NavBinding::new(nav, pose.position, surface.surface()));
            let mut ctx = AgentContext {
                navigation: as_oracle(&mut binding),
                target: &target,
                hidden: &hidden,
                sight: sight.sight(),
                feedback: &mut feedback,
                game_over: &mut caught,
            };
            agent.machine.tick(&pose, delta, &mut ctx);
        }

        if let Some(point) = feedback.facing {
            let look_at = Vec3::new(point.x, transform.translation.y, point.z);
            if look_at.distance_squared(transform.translation) > f32::EPSILON {
                transform.look_at(look_at, Vec3::Y);
            }
        }

        if let Some(mut locomotion) = locomotion {
            if let Some(speed) = feedback.locomotion_speed {
                locomotion.speed = speed;
            }
            if let Some(chasing) = feedback.chasing {
                locomotion.chasing = chasing;
            }
            locomotion.attack_triggers += feedback.attack_triggers;
        }

        for cue in feedback.cues {
            cue_events.write(AgentCueEvent { agent: entity, cue });
        }

        if caught.0 {
            crate::log_info(&format!("AI: agent {:?} caught the player", entity));
            caught_events.write(TargetCaught { agent: entity });
        }
    }
}
