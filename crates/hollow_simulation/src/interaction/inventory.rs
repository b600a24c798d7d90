//! Inventory: ключи, топливо, записки

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logger;

/// Минимальный контракт инвентаря для интерактивных объектов
///
/// Предметы идентифицируются по имени (точное совпадение).
pub trait Inventory {
    fn has_item(&self, name: &str) -> bool;
    /// `false` если инвентарь полон
    fn add_item(&mut self, name: &str) -> bool;
    /// `false` если такого предмета нет
    fn remove_item(&mut self, name: &str) -> bool;
    /// Сколько копий предмета (несколько одинаковых ключей)
    fn item_count(&self, name: &str) -> usize;
}

pub const DEFAULT_BAG_CAPACITY: usize = 12;

/// Инвентарь игрока с ограниченной вместимостью
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBag {
    capacity: usize,
    items: Vec<String>,
}

impl Default for ItemBag {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BAG_CAPACITY)
    }
}

impl ItemBag {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl Inventory for ItemBag {
    fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item == name)
    }

    fn add_item(&mut self, name: &str) -> bool {
        if self.is_full() {
            logger::log(&format!("Inventory: full, cannot add '{}'", name));
            return false;
        }
        self.items.push(name.to_owned());
        true
    }

    fn remove_item(&mut self, name: &str) -> bool {
        match self.items.iter().position(|item| item == name) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn item_count(&self, name: &str) -> usize {
        self.items.iter().filter(|item| *item == name).count()
    }
}
