//! Read-only render state
//!
//! A `Snapshot` is a frozen copy of everything a presentation layer may draw.
//! It owns its data, so reading it can never observe a half-applied tick.

use serde::Serialize;

use super::crop::CropStage;
use super::customer::CustomerState;
use super::inventory::ItemStack;
use super::types::{CustomerId, Position, SlotId, TilePos};

/// Running counters for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub customers_spawned: u32,
    pub customers_served: u32,
    pub customers_expired: u32,
    /// Sum of applied rewards; penalties count negative
    pub total_rewards: f64,
    pub crops_planted: u32,
    pub crops_harvested: u32,
    /// Harvests that rolled zero yield
    pub failed_harvests: u32,
    /// Units lost because the inventory filled up mid-harvest
    pub units_dropped: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropView {
    pub name: String,
    pub progress: u8,
    pub ready: bool,
    pub stage: CropStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub slot: SlotId,
    pub x: u32,
    pub y: u32,
    pub tilled: bool,
    pub crop: Option<CropView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub position: Position,
    pub remaining_ms: u64,
    pub orders: Vec<String>,
    pub satisfaction: u8,
    pub state: CustomerState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub position: Position,
    pub tile: TilePos,
    pub money: f64,
    pub inventory: Vec<ItemStack>,
    pub inventory_capacity: usize,
}

impl PlayerView {
    /// Units of `name` held, matching case-insensitively
    pub fn item_count(&self, name: &str) -> u32 {
        self.inventory
            .iter()
            .filter(|stack| stack.name.eq_ignore_ascii_case(name))
            .map(|stack| stack.count)
            .sum()
    }

    pub fn item_total(&self) -> u32 {
        self.inventory.iter().map(|stack| stack.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time_ms: u64,
    pub tick: u64,
    pub farm_width: u32,
    pub farm_height: u32,
    pub tiles: Vec<TileView>,
    pub customers: Vec<CustomerView>,
    pub player: PlayerView,
    pub stats: SessionStats,
}

impl Snapshot {
    pub fn tile(&self, slot: SlotId) -> Option<&TileView> {
        self.tiles.get(slot.0)
    }

    pub fn customer(&self, id: CustomerId) -> Option<&CustomerView> {
        self.customers.iter().find(|customer| customer.id == id)
    }

    pub fn planted_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.crop.is_some()).count()
    }

    /// Print a summary of the session state
    pub fn print_summary(&self) {
        println!("=== Farm Simulation Summary ===");
        println!("Time: {:.2}s (tick {})", self.time_ms as f64 / 1000.0, self.tick);
        println!(
            "Money: ${:.2}, Inventory: {}/{}",
            self.player.money,
            self.player.item_total(),
            self.player.inventory_capacity
        );
        println!(
            "Crops: {} planted, {} harvested, {} failed",
            self.planted_count(),
            self.stats.crops_harvested,
            self.stats.failed_harvests
        );
        println!(
            "Customers: {} waiting, {} served, {} expired",
            self.customers.len(),
            self.stats.customers_served,
            self.stats.customers_expired
        );
        println!();

        if !self.player.inventory.is_empty() {
            println!("--- Inventory ---");
            for stack in &self.player.inventory {
                println!("  {} x{}", stack.name, stack.count);
            }
        }

        let growing: Vec<_> = self
            .tiles
            .iter()
            .filter_map(|tile| tile.crop.as_ref().map(|crop| (tile.slot, crop)))
            .collect();
        if !growing.is_empty() {
            println!("--- Crops ---");
            for (slot, crop) in growing {
                let status = if crop.ready {
                    "ready".to_string()
                } else {
                    format!("{}%", crop.progress)
                };
                println!("  Slot {}: {} ({})", slot, crop.name, status);
            }
        }

        if !self.customers.is_empty() {
            println!("--- Customers ---");
            for customer in &self.customers {
                println!(
                    "  Customer {}: orders={:?}, remaining={:.1}s",
                    customer.id,
                    customer.orders,
                    customer.remaining_ms as f64 / 1000.0
                );
            }
        }
        println!();
    }

    /// Draw the farm grid as ASCII art
    pub fn draw_map(&self) {
        let width = self.farm_width as usize;
        let height = self.farm_height as usize;
        if width == 0 || height == 0 {
            return;
        }
        let mut grid = vec![vec!['.'; width]; height];

        for tile in &self.tiles {
            let (row, col) = (tile.y as usize, tile.x as usize);
            if row >= height || col >= width {
                continue;
            }
            grid[row][col] = match &tile.crop {
                Some(crop) if crop.ready => 'R',
                Some(_) => 'g',
                None if tile.tilled => '#',
                None => '.',
            };
        }

        let player = self.player.tile;
        if let Some(cell) = grid
            .get_mut(player.y as usize)
            .and_then(|row| row.get_mut(player.x as usize))
        {
            *cell = 'P';
        }

        println!("\n=== Farm Map ===");
        println!("Legend: .=Soil, #=Tilled, g=Growing, R=Ready, P=Player");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
