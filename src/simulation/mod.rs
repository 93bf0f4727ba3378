//! Standalone farm and diner simulation module
//!
//! This module contains all the core simulation logic: crop growth, the farm
//! grid, the player's wallet and inventory, customers and the game session
//! that ties them together. It runs without any UI and can be driven from the
//! console or from tests.

mod catalog;
mod clock;
mod command;
mod config;
mod crop;
mod customer;
mod error;
mod farm;
mod inventory;
mod player;
mod recipe;
mod session;
mod snapshot;
mod spawner;
mod types;

// Re-export public types for external use
pub use catalog::Catalog;
pub use clock::{Clock, ManualClock, SystemClock, Ticker, MAX_CATCH_UP_TICKS};
pub use command::{Command, CommandResult, HarvestTarget, HELP_TEXT};
pub use config::{
    SimConfig, DEFAULT_TICK_RATE_HZ, FARM_HEIGHT, FARM_WIDTH, INVENTORY_CAPACITY, MAP_HEIGHT,
    MAP_WIDTH, MAX_ACTIVE_CUSTOMERS, MAX_FARM_TILES, MAX_WAITING_MILLIS, ORDERS_PER_CUSTOMER,
    PLOT_CAPACITY, STARTING_MONEY, TILE_SIZE,
};
pub use crop::{Crop, CropSpec, CropStage};
pub use customer::{
    reward_for, score_dish, Customer, CustomerState, ScoreFn, ADDITIONAL_INGREDIENT_POINTS,
    COUNT_PENALTY_PER_INGREDIENT, INITIAL_SATISFACTION, MAIN_INGREDIENT_POINTS,
};
pub use error::{ErrorKind, SimError, SimResult};
pub use farm::{Farm, FarmTile};
pub use inventory::{names_match, Inventory, InventoryChange, Item, ItemStack};
pub use player::{MoveBounds, Player};
pub use recipe::{Recipe, RecipeCatalog};
pub use session::{harvest_yield, GameSession, HarvestOutcome, SessionBuilder, TickReport};
pub use snapshot::{CropView, CustomerView, PlayerView, SessionStats, Snapshot, TileView};
pub use spawner::CustomerSpawner;
pub use types::{CustomerId, Direction, Position, SlotId, TilePos, MAX_DISH_INGREDIENTS};
