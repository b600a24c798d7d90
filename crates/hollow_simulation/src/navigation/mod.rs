//! Navigation module
//!
//! Headless замена NavMesh: проходимая поверхность, NavAgent компонент,
//! kinematic навигатор. AI видит всё это через `NavigationOracle`.

use bevy::prelude::*;

pub mod agent;
pub mod surface;
pub mod systems;


pub use agent::{as_oracle, NavAgent, NavBinding};
pub use surface::{FlatFloor, NavigationSurface, WalkableSurface};
pub use systems::drive_nav_agents;

/// Navigation Plugin
///
/// Навигатор исполняет команды AI в том же FixedUpdate тике.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<NavAgent>()
            .init_resource::<NavigationSurface>()
            .add_systems(
                FixedUpdate,
                drive_nav_agents.in_set(crate::SimulationSet::Navigation),
            );
    }
}
