//! Player state: wallet, inventory and position
//!
//! Money handling keeps the guard-then-debit shape: every paid action calls
//! `spend_money` first and only proceeds when it returns true.

use log::{debug, warn};
use std::time::Duration;

use super::crop::Crop;
use super::error::{SimError, SimResult};
use super::inventory::{Inventory, InventoryChange, Item};
use super::types::{Direction, Position, TilePos};

/// Movement limits derived from the map and player size
#[derive(Debug, Clone, Copy)]
pub struct MoveBounds {
    pub max_x: f32,
    pub max_y: f32,
    pub step: f32,
}

#[derive(Debug, Clone)]
pub struct Player {
    money: f64,
    pub inventory: Inventory,
    pub position: Position,
    /// Where the current walk ends
    pub target: Position,
    pub size: f32,
    pending_move: Option<Direction>,
}

impl Player {
    pub fn new(money: f64, inventory_capacity: usize, position: Position, size: f32) -> Self {
        Self {
            money: money.max(0.0),
            inventory: Inventory::new(inventory_capacity),
            position,
            target: position,
            size,
            pending_move: None,
        }
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    /// Check if the player can afford a purchase
    pub fn can_afford(&self, amount: f64) -> bool {
        amount.is_finite() && amount >= 0.0 && amount <= self.money
    }

    /// Deduct money for a purchase.
    /// Returns true if successful, false if insufficient funds (money unchanged).
    pub fn spend_money(&mut self, amount: f64) -> bool {
        if !self.can_afford(amount) {
            debug!("Not enough money: need {:.2}, have {:.2}", amount, self.money);
            return false;
        }
        self.money -= amount;
        true
    }

    /// Add money from revenue
    pub fn earn_money(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.money += amount;
        }
    }

    /// Apply a customer reward. Penalties debit at most the current balance.
    /// Returns the signed change actually applied.
    pub fn apply_reward(&mut self, reward: i64) -> f64 {
        let amount = reward as f64;
        if reward >= 0 {
            self.earn_money(amount);
            amount
        } else {
            let penalty = (-amount).min(self.money);
            self.money -= penalty;
            -penalty
        }
    }

    pub fn add_item(&mut self, item: Item) -> SimResult<InventoryChange> {
        self.inventory.add_item(item)
    }

    /// Remove one unit by case-insensitive name
    pub fn remove_item(&mut self, name: &str) -> bool {
        self.inventory.remove_item(name).is_some()
    }

    /// Move one unit of a ready crop into the inventory
    pub fn harvest_crop(&mut self, crop: &Crop, now: Duration) -> SimResult<InventoryChange> {
        if !crop.is_ready_to_harvest(now) {
            return Err(SimError::NotReady {
                crop: crop.name().to_string(),
            });
        }
        self.add_item(Item::new(crop.name(), crop.spec.cost))
            .inspect_err(|_| warn!("Failed to harvest {}: inventory is full", crop.name()))
    }

    /// Buffer a movement input; the newest one wins at the next tick
    pub fn queue_move(&mut self, direction: Direction) {
        if !direction.is_zero() {
            self.pending_move = Some(direction);
        }
    }

    /// Turn the buffered input into a walk target, clamped to the map
    pub fn apply_input(&mut self, bounds: MoveBounds) -> bool {
        let Some(direction) = self.pending_move.take() else {
            return false;
        };
        let x = self.target.x + f32::from(direction.dx) * bounds.step;
        let y = self.target.y + f32::from(direction.dy) * bounds.step;
        self.target = Position::new(x.clamp(0.0, bounds.max_x), y.clamp(0.0, bounds.max_y));
        true
    }

    /// Walk toward the target for `delta_secs` at `speed` pixels per second
    pub fn advance(&mut self, delta_secs: f32, speed: f32) {
        if self.is_moving() {
            self.position = self.position.step_toward(&self.target, speed * delta_secs);
        }
    }

    pub fn is_moving(&self) -> bool {
        self.position != self.target
    }

    pub fn center(&self) -> Position {
        Position::new(self.position.x + self.size / 2.0, self.position.y + self.size / 2.0)
    }

    /// Tile under the player's centre
    pub fn tile(&self, tile_size: f32) -> TilePos {
        self.center().to_tile(tile_size)
    }
}
