//! Проходимая поверхность (NavMesh-эквивалент для headless режима)

use bevy::prelude::*;

use crate::ai::PathStatus;

/// Допуск по высоте: точка "на полу" если |y - floor| меньше
pub const SURFACE_HEIGHT_TOLERANCE: f32 = 0.1;

/// Геометрия, по которой ходят агенты
///
/// В игре это NavMesh движка, здесь: простая замена для симуляции и тестов.
pub trait WalkableSurface {
    fn contains(&self, point: Vec3) -> bool;
    /// Ближайшая проходимая точка в радиусе `search_radius`
    fn nearest(&self, point: Vec3, search_radius: f32) -> Option<Vec3>;
    /// Статус пути `from → to` (как NavMeshPathStatus)
    fn path_status(&self, from: Vec3, to: Vec3) -> PathStatus;
}

/// Плоский пол на высоте `height`, опционально ограниченный прямоугольником по XZ
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatFloor {
    pub height: f32,
    /// `None` = пол бесконечный
    pub bounds: Option<Rect>,
}

impl FlatFloor {
    pub fn bounded(height: f32, min: Vec2, max: Vec2) -> Self {
        Self {
            height,
            bounds: Some(Rect::from_corners(min, max)),
        }
    }

    fn clamp_xz(&self, point: Vec3) -> Vec3 {
        let xz = Vec2::new(point.x, point.z);
        let clamped = match self.bounds {
            Some(bounds) => xz.clamp(bounds.min, bounds.max),
            None => xz,
        };
        Vec3::new(clamped.x, self.height, clamped.y)
    }
}

impl WalkableSurface for FlatFloor {
    fn contains(&self, point: Vec3) -> bool {
        let on_floor = (point.y - self.height).abs() < SURFACE_HEIGHT_TOLERANCE;
        let inside = self
            .bounds
            .map_or(true, |bounds| bounds.contains(Vec2::new(point.x, point.z)));
        on_floor && inside
    }

    fn nearest(&self, point: Vec3, search_radius: f32) -> Option<Vec3> {
        let snapped = self.clamp_xz(point);
        (snapped.distance(point) <= search_radius).then_some(snapped)
    }

    fn path_status(&self, from: Vec3, to: Vec3) -> PathStatus {
        if !self.contains(self.clamp_xz(from)) {
            return PathStatus::Invalid;
        }
        // Цель за пределами пола → дойдём только до края
        let reachable = self.clamp_xz(to);
        if Vec2::new(reachable.x, reachable.z).distance(Vec2::new(to.x, to.z)) > SURFACE_HEIGHT_TOLERANCE {
            PathStatus::Partial
        } else {
            PathStatus::Complete
        }
    }
}

/// Поверхность навигации для всех агентов
#[derive(Resource)]
pub struct NavigationSurface(pub Box<dyn WalkableSurface + Send + Sync>);

impl NavigationSurface {
    pub fn new(surface: impl WalkableSurface + Send + Sync + 'static) -> Self {
        Self(Box::new(surface))
    }

    pub fn surface(&self) -> &dyn WalkableSurface {
        self.0.as_ref()
    }
}

impl Default for NavigationSurface {
    fn default() -> Self {
        Self::new(FlatFloor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> FlatFloor {
        FlatFloor::bounded(0.0, Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0))
    }

    #[test]
    fn test_contains_requires_floor_height_and_bounds() {
        let floor = room();
        assert!(floor.contains(Vec3::new(1.0, 0.05, 1.0)));
        assert!(!floor.contains(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!floor.contains(Vec3::new(6.0, 0.0, 1.0)));
    }

    #[test]
    fn test_nearest_respects_search_radius() {
        let floor = room();
        assert_eq!(floor.nearest(Vec3::new(1.0, 1.5, 1.0), 2.0), Some(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(floor.nearest(Vec3::new(9.0, 0.0, 0.0), 2.0), None);
    }

    #[test]
    fn test_path_outside_bounds_is_partial() {
        let floor = room();
        assert_eq!(floor.path_status(Vec3::ZERO, Vec3::new(3.0, 0.0, 3.0)), PathStatus::Complete);
        assert_eq!(floor.path_status(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0)), PathStatus::Partial);
    }

    #[test]
    fn test_unbounded_floor_accepts_everything_on_plane() {
        let floor = FlatFloor::default();
        assert!(floor.contains(Vec3::new(1000.0, 0.0, -1000.0)));
        assert_eq!(floor.path_status(Vec3::ZERO, Vec3::splat(50.0)), PathStatus::Complete);
    }
}
