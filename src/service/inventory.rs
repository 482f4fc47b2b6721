//! Inventory capacity rule.
//!
//! A hero can carry items whose weights sum to at most `strength * CARRY_FACTOR`.
//! Every write that can raise a hero's load (inventory add, item create with an
//! owner, item update that changes owner or weight) is checked here.
//!
//! The load read and the following write are two statements. They run while
//! holding async locks from `InventoryLocks`: the owner's lock serializes writes
//! that raise one hero's load, and the item's lock serializes writes to one item,
//! so a weight change cannot slip in between an assignment's check and its write.

use crate::error::AppError;
use crate::models::{Hero, Item, ItemPatch, NewItem};
use crate::service::{HeroRepository, ItemRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub const CARRY_FACTOR: i64 = 5;

pub fn carry_capacity(strength: i64) -> i64 {
    strength.saturating_mul(CARRY_FACTOR)
}

/// Boundary inclusive: a load exactly at capacity is allowed.
pub fn check_capacity(capacity: i64, current_load: i64, item_weight: i64) -> Result<(), AppError> {
    if current_load.saturating_add(item_weight) > capacity {
        return Err(AppError::OverCapacity {
            capacity,
            current_load,
            item_weight,
        });
    }
    Ok(())
}

/// Number of lock stripes per key space.
pub const LOCK_STRIPES: usize = 64;

/// Striped async locks for heroes and items.
///
/// Ids map onto a fixed set of stripes, so memory does not grow with the ids
/// requests name. A caller that needs both takes the item lock first.
#[derive(Clone)]
pub struct InventoryLocks {
    heroes: Arc<Vec<Mutex<()>>>,
    items: Arc<Vec<Mutex<()>>>,
}

impl Default for InventoryLocks {
    fn default() -> Self {
        let stripes = || Arc::new((0..LOCK_STRIPES).map(|_| Mutex::new(())).collect::<Vec<_>>());
        InventoryLocks {
            heroes: stripes(),
            items: stripes(),
        }
    }
}

fn stripe(id: i64) -> usize {
    id.rem_euclid(LOCK_STRIPES as i64) as usize
}

impl InventoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock_hero(&self, hero_id: i64) -> MutexGuard<'_, ()> {
        self.heroes[stripe(hero_id)].lock().await
    }

    pub async fn lock_item(&self, item_id: i64) -> MutexGuard<'_, ()> {
        self.items[stripe(item_id)].lock().await
    }

    pub fn stripes(&self) -> usize {
        self.heroes.len()
    }
}

/// Parameters of an inventory addition.
#[derive(Clone, Debug, PartialEq)]
pub enum InventoryAddition {
    /// Move an existing item (by id) to the hero.
    Existing(i64),
    /// Create a new item owned by the hero. `hero_id` is overwritten.
    New(NewItem),
}

#[derive(Clone)]
pub struct InventoryService {
    heroes: HeroRepository,
    items: ItemRepository,
    locks: InventoryLocks,
}

impl InventoryService {
    pub fn new(pool: SqlitePool, locks: InventoryLocks) -> Self {
        InventoryService {
            heroes: HeroRepository::new(pool.clone()),
            items: ItemRepository::new(pool),
            locks,
        }
    }

    async fn hero(&self, hero_id: i64) -> Result<Hero, AppError> {
        self.heroes
            .find_by_id(hero_id)
            .await?
            .ok_or(AppError::NotFound("Hero"))
    }

    /// Reject when `weight` does not fit next to what the hero already carries.
    /// `item_id` is left out of the current load so re-assigning an owned item is idempotent.
    async fn ensure_fits(&self, hero: &Hero, weight: i64, item_id: Option<i64>) -> Result<(), AppError> {
        let capacity = carry_capacity(hero.strength);
        let current_load = self.items.total_weight_for_hero(hero.id, item_id).await?;
        check_capacity(capacity, current_load, weight).inspect_err(|_| {
            tracing::warn!(
                hero_id = hero.id,
                capacity,
                current_load,
                item_weight = weight,
                "inventory addition rejected"
            );
        })
    }

    /// Items the hero carries.
    pub async fn list(&self, hero_id: i64) -> Result<Vec<Item>, AppError> {
        let hero = self.hero(hero_id).await?;
        self.items.find_by_hero(hero.id).await
    }

    pub async fn add(&self, hero_id: i64, addition: InventoryAddition) -> Result<Item, AppError> {
        match addition {
            InventoryAddition::Existing(item_id) => self.assign(hero_id, item_id).await,
            InventoryAddition::New(new) => {
                let new = NewItem {
                    hero_id: Some(hero_id),
                    ..new
                };
                self.create_item(new).await
            }
        }
    }

    async fn assign(&self, hero_id: i64, item_id: i64) -> Result<Item, AppError> {
        let _item_guard = self.locks.lock_item(item_id).await;
        let _hero_guard = self.locks.lock_hero(hero_id).await;
        let hero = self.hero(hero_id).await?;
        let item = self
            .items
            .find_by_id(item_id)
            .await?
            .ok_or(AppError::NotFound("Item"))?;
        self.ensure_fits(&hero, item.weight, Some(item.id)).await?;
        let item = self
            .items
            .update(item.id, ItemPatch::assign_to(hero.id))
            .await?
            .ok_or(AppError::NotFound("Item"))?;
        tracing::info!(hero_id = hero.id, item_id = item.id, "item assigned");
        Ok(item)
    }

    /// Create an item; when it names an owner, the owner must exist and have room.
    pub async fn create_item(&self, new: NewItem) -> Result<Item, AppError> {
        let Some(hero_id) = new.hero_id else {
            return self.items.create(&new).await;
        };
        let _guard = self.locks.lock_hero(hero_id).await;
        let hero = self.hero(hero_id).await?;
        self.ensure_fits(&hero, new.weight, None).await?;
        self.items.create(&new).await
    }

    /// Update an item; owner or weight changes are checked against the resulting owner.
    ///
    /// Every update holds the item's lock, so the owner read here stays current
    /// until the write.
    pub async fn update_item(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, AppError> {
        let _item_guard = self.locks.lock_item(id).await;
        if !patch.touches_load() {
            return self.items.update(id, patch).await;
        }
        let Some(existing) = self.items.find_by_id(id).await? else {
            return Ok(None);
        };
        let Some(hero_id) = patch.hero_id.unwrap_or(existing.hero_id) else {
            return self.items.update(id, patch).await;
        };
        let _hero_guard = self.locks.lock_hero(hero_id).await;
        let hero = self.hero(hero_id).await?;
        let weight = patch.weight.unwrap_or(existing.weight);
        self.ensure_fits(&hero, weight, Some(existing.id)).await?;
        self.items.update(id, patch).await
    }
}
