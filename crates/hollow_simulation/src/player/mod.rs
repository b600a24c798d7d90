//! Player marker component
//!
//! Отмечает entity игрока: цель для AI и объект телепортов (укрытие, люк).

use bevy::prelude::Component;

/// Marker component для игрока
///
/// # Архитектурная заметка
/// - AI systems ищут цель через `With<Player>` (ровно один игрок в сцене)
/// - Агенты используют `Without<Player>`, чтобы `Transform` запросы не пересекались
/// - Нет игрока в сцене = у агентов нет цели, Chasing/Searching пропускают тик
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
