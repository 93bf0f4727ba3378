//! Session configuration
//!
//! All tunables live here so a front end can load them from a RON file.
//! Missing fields fall back to the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::types::{Position, MAX_DISH_INGREDIENTS};

/// Simulation tick rate
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Map dimensions in pixels
pub const MAP_WIDTH: f32 = 800.0;
pub const MAP_HEIGHT: f32 = 600.0;
pub const TILE_SIZE: f32 = 40.0;

/// Farm grid: 8 columns by 6 rows
pub const FARM_WIDTH: u32 = 8;
pub const FARM_HEIGHT: u32 = 6;
pub const PLOT_CAPACITY: usize = 48;

/// Largest farm grid a config may ask for
pub const MAX_FARM_TILES: usize = 4096;

/// One inventory slot per unit
pub const INVENTORY_CAPACITY: usize = 25;

pub const STARTING_MONEY: f64 = 30.0;

/// Customer timings
pub const MAX_WAITING_MILLIS: u64 = 30_000;
pub const ORDERS_PER_CUSTOMER: usize = 3;
pub const MAX_ACTIVE_CUSTOMERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate_hz: u32,

    pub map_width: f32,
    pub map_height: f32,
    pub tile_size: f32,

    pub farm_width: u32,
    pub farm_height: u32,
    /// Maximum number of crops growing at once; may be lower than the tile count
    pub plot_capacity: usize,

    pub inventory_capacity: usize,
    pub starting_money: f64,
    pub starting_items: Vec<String>,

    pub player_start: Position,
    pub player_size: f32,
    /// Pixels per movement input
    pub move_step: f32,
    /// Walk speed in pixels per second
    pub walk_speed: f32,
    /// Reach in tiles for farm actions; `None` lets slot-addressed commands work anywhere
    pub interaction_range: Option<u32>,

    pub max_active_customers: usize,
    pub customer_seats: Vec<Position>,
    pub orders_per_customer: usize,
    pub max_waiting_ms: u64,
    pub first_spawn_delay_ms: u64,
    pub spawn_interval_ms: u64,
    pub respawn_cooldown_ms: u64,

    pub max_dish_ingredients: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            tile_size: TILE_SIZE,
            farm_width: FARM_WIDTH,
            farm_height: FARM_HEIGHT,
            plot_capacity: PLOT_CAPACITY,
            inventory_capacity: INVENTORY_CAPACITY,
            starting_money: STARTING_MONEY,
            starting_items: vec!["Onion".to_string(), "Tomato".to_string()],
            player_start: Position::new(120.0, 120.0),
            player_size: 40.0,
            move_step: TILE_SIZE,
            walk_speed: 160.0,
            interaction_range: None,
            max_active_customers: MAX_ACTIVE_CUSTOMERS,
            customer_seats: vec![
                Position::new(520.0, 80.0),
                Position::new(600.0, 80.0),
                Position::new(680.0, 80.0),
            ],
            orders_per_customer: ORDERS_PER_CUSTOMER,
            max_waiting_ms: MAX_WAITING_MILLIS,
            first_spawn_delay_ms: 2_000,
            spawn_interval_ms: 5_000,
            respawn_cooldown_ms: 3_000,
            max_dish_ingredients: MAX_DISH_INGREDIENTS,
        }
    }
}

impl SimConfig {
    /// Parse a RON document
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: SimConfig = ron::from_str(text).context("Failed to parse RON config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a RON config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_ron_str(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.farm_width == 0 || self.farm_height == 0 {
            anyhow::bail!("Farm grid must have at least one tile");
        }
        match self.farm_width.checked_mul(self.farm_height) {
            Some(tiles) if tiles as usize <= MAX_FARM_TILES => {}
            _ => anyhow::bail!(
                "Farm grid {}x{} exceeds the limit of {} tiles",
                self.farm_width,
                self.farm_height,
                MAX_FARM_TILES
            ),
        }
        if self.tile_size <= 0.0 {
            anyhow::bail!("Tile size must be positive");
        }
        if self.map_width < self.player_size || self.map_height < self.player_size {
            anyhow::bail!("Map is smaller than the player");
        }
        if self.tick_rate_hz == 0 {
            anyhow::bail!("Tick rate must be positive");
        }
        if self.starting_money < 0.0 || !self.starting_money.is_finite() {
            anyhow::bail!("Starting money must be a non-negative number");
        }
        if self.max_active_customers > self.customer_seats.len() {
            anyhow::bail!(
                "{} customers allowed but only {} seats configured",
                self.max_active_customers,
                self.customer_seats.len()
            );
        }
        Ok(())
    }

    pub fn tile_count(&self) -> usize {
        self.farm_width as usize * self.farm_height as usize
    }

    pub fn max_waiting(&self) -> Duration {
        Duration::from_millis(self.max_waiting_ms)
    }

    pub fn first_spawn_delay(&self) -> Duration {
        Duration::from_millis(self.first_spawn_delay_ms)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn respawn_cooldown(&self) -> Duration {
        Duration::from_millis(self.respawn_cooldown_ms)
    }
}
