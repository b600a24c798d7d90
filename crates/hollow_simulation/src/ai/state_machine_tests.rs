//! Tests for PatrolChaseStateMachine (patrol dwell, chase, attack, search, stall).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::collaborators::{AgentCue, PathStatus};
    use crate::ai::components::{AIConfig, AIState, PatrolRoute};
    use crate::ai::state_machine::{Activation, PatrolChaseStateMachine};
    use crate::ai::test_support::Harness;
    use crate::logger::{capture, LogLevel};

    const WAYPOINT_A: Vec3 = Vec3::new(0.0, 0.0, -6.0);
    const WAYPOINT_B: Vec3 = Vec3::new(6.0, 0.0, -6.0);

    fn machine(config: AIConfig) -> PatrolChaseStateMachine {
        PatrolChaseStateMachine::new(config, PatrolRoute::new(vec![WAYPOINT_A, WAYPOINT_B]), 42)
    }

    fn active_machine(harness: &mut Harness) -> PatrolChaseStateMachine {
        let mut machine = machine(AIConfig::default());
        harness.activate(&mut machine);
        machine
    }

    /// Доводит агента до Chasing: цель прямо перед ним на 5м
    fn start_chase(harness: &mut Harness, machine: &mut PatrolChaseStateMachine) {
        harness.target = Some(Vec3::new(0.0, 0.0, 5.0));
        harness.tick(machine, 0.1);
        assert_eq!(machine.state(), AIState::Chasing);
    }

    #[test]
    fn test_dormant_agent_ignores_ticks() {
        let mut harness = Harness::new();
        let mut machine = machine(AIConfig::default());
        harness.target = Some(Vec3::new(0.0, 0.0, 5.0));

        harness.ticks(&mut machine, 0.1, 10);

        assert_eq!(machine.activation(), Activation::Dormant);
        assert_eq!(machine.state(), AIState::Patrolling);
        assert_eq!(harness.nav.destination, None);
        assert!(harness.feedback.cues.is_empty());
    }

    #[test]
    fn test_activation_targets_first_waypoint_and_dwells() {
        let mut harness = Harness::new();
        let machine = active_machine(&mut harness);

        assert!(machine.is_active());
        assert_eq!(machine.destination(), Some(WAYPOINT_A));
        assert_eq!(harness.nav.destination, Some(WAYPOINT_A));
        assert!(machine.is_waiting());
        assert_eq!(machine.dwell_remaining(), 2.0);
        assert!(harness.nav.stopped);
        assert_eq!(machine.commanded_speed(), 0.0);
    }

    #[test]
    fn test_activation_is_one_time() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        harness.ticks(&mut machine, 1.0, 3);
        let destination = machine.destination();

        harness.activate(&mut machine);

        assert!(!machine.is_waiting());
        assert_eq!(machine.destination(), destination);
    }

    #[test]
    fn test_activation_warps_onto_navigable_surface() {
        let mut harness = Harness::new();
        harness.nav.on_surface = false;
        harness.nav.snap_to = Some(Vec3::new(0.5, 0.0, 0.5));

        let _machine = active_machine(&mut harness);

        assert_eq!(harness.nav.warped_to, Some(Vec3::new(0.5, 0.0, 0.5)));
    }

    #[test]
    fn test_dwell_holds_destination_and_zero_speed() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        let destination = machine.destination();

        for _ in 0..3 {
            harness.tick(&mut machine, 0.5);
            assert!(machine.is_waiting());
            assert_eq!(machine.destination(), destination);
            assert_eq!(machine.commanded_speed(), 0.0);
            assert!(harness.nav.stopped);
        }

        // 4-й тик: таймер 2.0 истёк → движемся к точке
        harness.tick(&mut machine, 0.5);
        assert!(!machine.is_waiting());
        assert!(!harness.nav.stopped);
        assert_eq!(machine.commanded_speed(), 2.0);
        assert_eq!(harness.nav.destination, Some(WAYPOINT_A));
    }

    #[test]
    fn test_wrap_to_home_uses_extended_dwell() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);

        // Дождались, дошли до A → следующая B, обычная пауза
        harness.tick(&mut machine, 2.0);
        harness.nav.position = WAYPOINT_A;
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.patrol_index(), 1);
        assert_eq!(machine.dwell_remaining(), 2.0);

        // Дождались, дошли до B → индекс оборачивается в 0, "домашняя" пауза
        harness.tick(&mut machine, 2.0);
        assert_eq!(harness.nav.destination, Some(WAYPOINT_B));
        harness.nav.position = WAYPOINT_B;
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.patrol_index(), 0);
        assert_eq!(machine.dwell_remaining(), 20.0);
    }

    #[test]
    fn test_empty_route_patrol_is_noop() {
        let mut harness = Harness::new();
        let mut machine = PatrolChaseStateMachine::new(AIConfig::default(), PatrolRoute::default(), 1);
        harness.activate(&mut machine);
        harness.target = Some(Vec3::new(0.0, 0.0, 5.0));

        harness.ticks(&mut machine, 0.1, 5);

        assert_eq!(machine.state(), AIState::Patrolling);
        assert_eq!(harness.nav.destination, None);
    }

    #[test]
    fn test_visible_target_starts_chase_with_cue() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);

        start_chase(&mut harness, &mut machine);

        assert_eq!(harness.feedback.cues, vec![AgentCue::Detected]);
        assert_eq!(machine.last_known_target(), Some(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_target_behind_is_not_detected() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        harness.target = Some(Vec3::new(0.0, 0.0, -3.0));

        harness.ticks(&mut machine, 0.1, 5);

        assert_eq!(machine.state(), AIState::Patrolling);
    }

    #[test]
    fn test_chase_moves_to_target_at_chase_speed() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);

        harness.target = Some(Vec3::new(1.0, 0.0, 6.0));
        harness.tick(&mut machine, 0.1);

        assert_eq!(machine.state(), AIState::Chasing);
        assert_eq!(harness.nav.destination, Some(Vec3::new(1.0, 0.0, 6.0)));
        assert_eq!(harness.nav.speed, 4.0);
        assert!(!harness.nav.stopped);
        assert!(harness.feedback.chasing);
    }

    #[test]
    fn test_close_visible_target_triggers_attack() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);

        harness.target = Some(Vec3::new(0.0, 0.0, 1.5));
        harness.tick(&mut machine, 0.1);

        assert_eq!(machine.state(), AIState::Attacking);
    }

    #[test]
    fn test_attack_reports_caught_once() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);
        harness.target = Some(Vec3::new(0.0, 0.0, 1.5));
        harness.tick(&mut machine, 0.1);

        harness.ticks(&mut machine, 0.1, 5);

        assert_eq!(machine.state(), AIState::Attacking);
        assert!(machine.target_caught());
        assert_eq!(harness.game_over.reports, 1);
        assert_eq!(harness.feedback.attack_animations, 1);
        assert_eq!(harness.feedback.faced, Some(Vec3::new(0.0, 0.0, 1.5)));
        assert!(harness.feedback.cues.contains(&AgentCue::Attack));
        assert!(harness.nav.path_cleared);
        assert_eq!(machine.destination(), None);
    }

    #[test]
    fn test_hiding_during_attack_returns_to_patrol() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);
        harness.target = Some(Vec3::new(0.0, 0.0, 1.5));
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Attacking);

        harness.hidden = true;
        harness.tick(&mut machine, 0.1);

        assert_eq!(machine.state(), AIState::Patrolling);
        assert_eq!(harness.game_over.reports, 0);
    }

    #[test]
    fn test_hidden_target_aborts_chase_at_same_waypoint() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);

        // Уходим на точку B (индекс 1)
        harness.tick(&mut machine, 2.0);
        harness.nav.position = WAYPOINT_A;
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.patrol_index(), 1);

        harness.target = Some(WAYPOINT_A + Vec3::new(0.0, 0.0, 4.0));
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Chasing);

        harness.hidden = true;
        harness.tick(&mut machine, 0.1);

        assert_eq!(machine.state(), AIState::Patrolling);
        assert_eq!(machine.patrol_index(), 1);
        assert_eq!(harness.nav.destination, Some(WAYPOINT_B));
        assert!(!machine.is_waiting());
        assert_eq!(harness.nav.speed, 2.0);
    }

    #[test]
    fn test_stalled_chase_uses_capped_detour() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        let target = Vec3::new(0.0, 0.0, 8.0);
        harness.target = Some(target);
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Chasing);

        harness.nav.velocity = 0.0;
        harness.nav.path_status = PathStatus::Invalid;

        for _ in 0..3 {
            harness.tick(&mut machine, 0.25);
            assert_eq!(harness.nav.destination, Some(target));
        }

        // 1.0s простоя → обход
        harness.tick(&mut machine, 0.25);
        let detour = harness.nav.destination.expect("detour destination");
        assert_ne!(detour, target);
        assert!((detour - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
        assert_eq!(machine.state(), AIState::Chasing);

        // Обход держится один check interval
        harness.tick(&mut machine, 0.25);
        assert_eq!(harness.nav.destination, Some(detour));
    }

    #[test]
    fn test_detour_is_snapped_to_navmesh() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        harness.target = Some(Vec3::new(0.0, 0.0, 8.0));
        harness.tick(&mut machine, 0.1);

        harness.nav.path_status = PathStatus::Partial;
        harness.nav.snap_to = Some(Vec3::new(0.7, 0.0, 1.8));
        harness.ticks(&mut machine, 0.25, 4);

        assert_eq!(harness.nav.destination, Some(Vec3::new(0.7, 0.0, 1.8)));
    }

    #[test]
    fn test_lost_target_switches_to_search_then_patrol() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);

        // За спиной и дальше 12м → не видим, дистанция > range * 1.2
        let lost_at = Vec3::new(0.0, 0.0, -13.0);
        harness.target = Some(lost_at);
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Searching);

        // Игрок убежал дальше, но искать будем у последней известной позиции
        harness.target = Some(Vec3::new(20.0, 0.0, -20.0));
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Searching);
        assert_eq!(harness.nav.destination, Some(lost_at));

        harness.nav.position = Vec3::new(0.0, 0.0, -12.5);
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Patrolling);
        assert_eq!(harness.nav.destination, Some(WAYPOINT_A));
    }

    #[test]
    fn test_search_gives_up_when_target_hides() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);
        harness.target = Some(Vec3::new(0.0, 0.0, -13.0));
        harness.tick(&mut machine, 0.1);
        assert_eq!(machine.state(), AIState::Searching);

        harness.hidden = true;
        harness.tick(&mut machine, 0.1);

        assert_eq!(machine.state(), AIState::Patrolling);
    }

    #[test]
    fn test_missing_navigation_degrades_to_idle() {
        let mut harness = Harness::without_navigation();
        let mut machine = machine(AIConfig::default());
        harness.activate(&mut machine);
        harness.target = Some(Vec3::new(0.0, 0.0, 5.0));

        harness.ticks(&mut machine, 0.1, 10);

        assert!(machine.is_active());
        assert_eq!(machine.state(), AIState::Patrolling);
        assert_eq!(machine.destination(), None);
    }

    #[test]
    fn test_missing_target_keeps_chase_state() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);
        let destination = harness.nav.destination;

        harness.target = None;
        harness.ticks(&mut machine, 0.1, 3);

        assert_eq!(machine.state(), AIState::Chasing);
        assert_eq!(harness.nav.destination, destination);
    }

    #[test]
    fn test_missing_target_is_warned_once() {
        capture::install();
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);

        harness.target = None;
        harness.ticks(&mut machine, 0.1, 20);

        assert_eq!(
            capture::count_on_this_thread(LogLevel::Warning, "target reference missing"),
            1
        );
    }

    #[test]
    fn test_missing_navigation_is_warned_once() {
        capture::install();
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);

        // Binding пропал посреди погони
        harness.has_navigation = false;
        harness.ticks(&mut machine, 0.1, 20);

        assert_eq!(
            capture::count_on_this_thread(LogLevel::Warning, "navigation binding missing"),
            1
        );
        assert_eq!(machine.state(), AIState::Chasing);
    }

    #[test]
    fn test_activation_without_navigation_warns_once() {
        capture::install();
        let mut harness = Harness::without_navigation();
        let mut machine = machine(AIConfig::default());
        harness.activate(&mut machine);

        harness.ticks(&mut machine, 0.1, 20);

        assert_eq!(
            capture::count_on_this_thread(LogLevel::Warning, "activated without navigation"),
            1
        );
        assert_eq!(
            capture::count_on_this_thread(LogLevel::Warning, "navigation binding missing"),
            0
        );
    }

    #[test]
    fn test_reset_after_caught_returns_to_patrol() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        start_chase(&mut harness, &mut machine);
        harness.target = Some(Vec3::new(0.0, 0.0, 1.5));
        harness.ticks(&mut machine, 0.1, 2);
        assert!(machine.target_caught());

        machine.reset(Some(&mut harness.nav));

        assert_eq!(machine.state(), AIState::Patrolling);
        assert!(!machine.target_caught());
        assert_eq!(harness.nav.destination, Some(WAYPOINT_A));
    }

    #[test]
    fn test_exactly_one_state_over_random_walk() {
        let mut harness = Harness::new();
        let mut machine = active_machine(&mut harness);
        let targets = [
            Some(Vec3::new(0.0, 0.0, 5.0)),
            Some(Vec3::new(0.0, 0.0, -15.0)),
            None,
            Some(Vec3::new(0.0, 0.0, 1.0)),
            Some(Vec3::new(3.0, 0.0, 3.0)),
        ];

        for step in 0..100 {
            harness.target = targets[step % targets.len()];
            harness.hidden = step % 7 == 0;
            harness.tick(&mut machine, 0.1);
            assert!(matches!(
                machine.state(),
                AIState::Patrolling | AIState::Chasing | AIState::Attacking | AIState::Searching
            ));
            assert!(machine.patrol_index() < machine.route().len());
        }
    }

    #[test]
    fn test_animator_and_footsteps_follow_velocity() {
        let mut harness = Harness::new();
        let config = AIConfig {
            footstep_variants: 3,
            ..Default::default()
        };
        let mut machine = machine(config);
        harness.activate(&mut machine);
        harness.nav.velocity = 2.0;

        harness.ticks(&mut machine, 0.2, 10);

        assert_eq!(harness.feedback.locomotion_speed, 2.0);
        assert!(!harness.feedback.chasing);
        let steps: Vec<usize> = harness
            .feedback
            .cues
            .iter()
            .filter_map(|cue| match cue {
                AgentCue::Footstep(variant) => Some(*variant),
                _ => None,
            })
            .collect();
        assert!(!steps.is_empty());
        assert!(steps.iter().all(|variant| *variant < 3));
    }
}
