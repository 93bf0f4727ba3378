//! Core types for the farm simulation
//!
//! Identifiers, positions and the geometry constants shared by the farm,
//! the player and the customer counter.

use serde::{Deserialize, Serialize};

/// A farm slot (one tile of the farm grid), indexed row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

/// A wrapper type for customer IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer tile coordinate on the farm grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: u32,
    pub y: u32,
}

impl TilePos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, so diagonal neighbours count as one step
    pub fn distance(&self, other: &TilePos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// A 2D position in map pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move toward `target` by at most `max_step`, landing exactly on it when close enough
    pub fn step_toward(&self, target: &Position, max_step: f32) -> Position {
        let dist = self.distance(target);
        if dist <= max_step || dist == 0.0 {
            return *target;
        }
        let t = max_step / dist;
        Position {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    /// Tile containing this point for a square grid of `tile_size` pixels
    pub fn to_tile(&self, tile_size: f32) -> TilePos {
        let x = (self.x.max(0.0) / tile_size).floor() as u32;
        let y = (self.y.max(0.0) / tile_size).floor() as u32;
        TilePos::new(x, y)
    }
}

/// Unit direction for buffered movement input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    pub const UP: Direction = Direction { dx: 0, dy: -1 };
    pub const DOWN: Direction = Direction { dx: 0, dy: 1 };
    pub const LEFT: Direction = Direction { dx: -1, dy: 0 };
    pub const RIGHT: Direction = Direction { dx: 1, dy: 0 };

    /// Build a direction from arbitrary deltas, keeping only their signs
    pub fn new(dx: i32, dy: i32) -> Self {
        Self {
            dx: dx.signum() as i8,
            dy: dy.signum() as i8,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Maximum ingredients that fit on one plate
pub const MAX_DISH_INGREDIENTS: usize = 5;
