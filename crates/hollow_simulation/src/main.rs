//! Headless симуляция Hollow
//!
//! Маленькая сцена без рендера: дверь будит врага, игрок стоит в коридоре,
//! потом прячется в шкаф. Опционально: путь к JSON конфигу первым аргументом.

use bevy::prelude::*;
use hollow_simulation::interaction::{DoorState, HidingSpotState};
use hollow_simulation::{
    create_simulation_app, log_error, log_info, spawn_enemy_agent, AIState, EnemyAgent,
    InteractRequest, Interactable, PatrolRoute, Player, SimulationConfig, TargetCaught, WakeTarget,
};

const TICKS: usize = 1200;
const HIDE_AT_TICK: usize = 300;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                log_error(&format!("Failed to load {}: {}", path, error));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    log_info(&format!("Starting Hollow headless simulation (seed: {})", config.seed));
    let ai_config = config.ai.clone();
    let mut app = create_simulation_app(config);

    let world = app.world_mut();
    world.spawn((Transform::from_xyz(0.0, 0.0, 6.0), Player));
    let enemy = spawn_enemy_agent(
        world,
        Vec3::ZERO,
        ai_config,
        PatrolRoute::new(vec![
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, 4.0),
        ]),
    );
    let door = world
        .spawn(Interactable::door(DoorState {
            wakes: Some(WakeTarget::Agent(enemy)),
            ..Default::default()
        }))
        .id();
    let wardrobe = world
        .spawn(Interactable::hiding_spot(HidingSpotState {
            hide_point: Vec3::new(-3.0, 0.0, 6.0),
            hide_time: 8.0,
            ..Default::default()
        }))
        .id();

    world.send_event(InteractRequest { entity: door });

    let mut last_state = None;
    for tick in 0..TICKS {
        if tick == HIDE_AT_TICK {
            app.world_mut().send_event(InteractRequest { entity: wardrobe });
        }

        app.update();

        let state = app.world().get::<EnemyAgent>(enemy).map(EnemyAgent::state);
        if state != last_state {
            log_info(&format!("Tick {}: enemy state {:?}", tick, state.unwrap_or(AIState::Patrolling)));
            last_state = state;
        }

        let caught = app.world().resource::<Events<TargetCaught>>().len();
        if caught > 0 {
            log_info(&format!("Tick {}: player caught, stopping", tick));
            break;
        }
    }

    log_info("Simulation complete!");
}
