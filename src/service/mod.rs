//! Repositories over the SQL builder, the inventory capacity rule and request validation.

mod crud;
mod heroes;
mod inventory;
mod items;
mod quests;
pub mod validation;

pub use crud::CrudService;
pub use heroes::{HeroRepository, HEROES};
pub use inventory::{
    carry_capacity, check_capacity, InventoryAddition, InventoryLocks, InventoryService, CARRY_FACTOR,
};
pub use items::{ItemRepository, ITEMS};
pub use quests::{QuestRepository, QUESTS};
pub use validation::RequestValidator;
