//! Hollow Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer) для хоррор-игры:
//! враг патрулирует, замечает игрока, преследует, ищет; игрок прячется и
//! взаимодействует с дверями, люками, генератором.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (AI решения, интерактивные объекты, инвентарь)
//! - Движок = tactical layer (рендер, физика, NavMesh, звук) через trait коллабораторы

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod config;
pub mod interaction;
pub mod logger;
pub mod navigation;
pub mod player;
pub mod tween;

// Re-export базовых типов для удобства
pub use ai::{
    AIConfig, AIPlugin, AIState, ActivateAgent, AgentCue, AgentCueEvent, EnemyAgent, Locomotion,
    PatrolRoute, ResetAgent, TargetCaught, WakeTarget,
};
pub use config::{ConfigError, SimulationConfig};
pub use interaction::{InteractRequest, Interactable, InteractionPlugin, ItemBag};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{NavAgent, NavigationPlugin, NavigationSurface};
pub use player::Player;

/// Порядок подсистем внутри FixedUpdate
///
/// Interaction → AI → Navigation: пробуждение и укрытие видны AI в том же тике,
/// навигатор исполняет команды AI сразу.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Interaction,
    AI,
    Navigation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app важнее seed из конфига
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(self.config.seed));
        }

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            .insert_resource(ItemBag::with_capacity(self.config.inventory_capacity))
            .insert_resource(self.config.clone())
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Interaction,
                    SimulationSet::AI,
                    SimulationSet::Navigation,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((InteractionPlugin, AIPlugin, NavigationPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed для подсистемы (footsteps агента)
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: один `app.update()` = ровно один FixedUpdate тик.
/// Первый кадр Bevy всегда с нулевым delta, поэтому он прогоняется здесь.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )));

    // Startup кадр: запускает часы, FixedUpdate в нём не выполняется
    app.update();

    app
}

/// Создаёт headless App со всеми подсистемами по конфигу
pub fn create_simulation_app(config: SimulationConfig) -> App {
    let step = Duration::from_secs_f64(1.0 / config.tick_hz);
    let mut app = create_headless_app(config.seed);
    app.add_plugins(SimulationPlugin::new(config))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));
    app
}

/// Spawn helper для врага
///
/// Entity со всем набором компонентов:
/// - Transform (pivot агента)
/// - EnemyAgent (спящий, seed шагов из DeterministicRng)
/// - NavAgent (зеркало навигации)
/// - Locomotion (параметры аниматора)
pub fn spawn_enemy_agent(
    world: &mut World,
    position: Vec3,
    config: AIConfig,
    route: PatrolRoute,
) -> Entity {
    let seed = world
        .get_resource_mut::<DeterministicRng>()
        .map(|mut rng| rng.next_seed())
        .unwrap_or_default();

    world
        .spawn((
            Transform::from_translation(position),
            EnemyAgent::new(config, route, seed),
            NavAgent::default(),
            Locomotion::default(),
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug представление компонента)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
