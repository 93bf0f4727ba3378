//! Farm plot manager
//!
//! The farm is a fixed grid of tiles. Each tile is one slot and can be tilled
//! and hold a single crop. The number of growing crops is bounded by the plot
//! capacity, which may be lower than the tile count.

use log::debug;
use std::time::Duration;

use super::crop::{Crop, CropSpec};
use super::error::{SimError, SimResult};
use super::types::{SlotId, TilePos};

/// A single farm tile
#[derive(Debug, Clone, Default)]
pub struct FarmTile {
    pub tilled: bool,
    pub crop: Option<Crop>,
}

impl FarmTile {
    pub fn has_crop(&self) -> bool {
        self.crop.is_some()
    }

    pub fn crop_name(&self) -> Option<&str> {
        self.crop.as_ref().map(|c| c.name())
    }

    pub fn growth_progress(&self, now: Duration) -> u8 {
        self.crop.as_ref().map_or(0, |c| c.growth_progress(now))
    }
}

#[derive(Debug, Clone)]
pub struct Farm {
    width: u32,
    height: u32,
    capacity: usize,
    tiles: Vec<FarmTile>,
    crop_count: usize,
}

impl Farm {
    pub fn new(width: u32, height: u32, capacity: usize) -> Self {
        let tile_count = width as usize * height as usize;
        Self {
            width,
            height,
            capacity: capacity.min(tile_count),
            tiles: vec![FarmTile::default(); tile_count],
            crop_count: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn crop_count(&self) -> usize {
        self.crop_count
    }

    pub fn remaining_plots(&self) -> usize {
        self.capacity - self.crop_count
    }

    pub fn is_full(&self) -> bool {
        self.crop_count >= self.capacity
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Slot for a grid coordinate, if it lies on the farm
    pub fn slot_at(&self, pos: TilePos) -> Option<SlotId> {
        if pos.x < self.width && pos.y < self.height {
            Some(SlotId((pos.y * self.width + pos.x) as usize))
        } else {
            None
        }
    }

    /// Grid coordinate of a slot
    pub fn tile_pos(&self, slot: SlotId) -> Option<TilePos> {
        if slot.0 < self.tiles.len() {
            let index = slot.0 as u32;
            Some(TilePos::new(index % self.width, index / self.width))
        } else {
            None
        }
    }

    pub fn tile(&self, slot: SlotId) -> SimResult<&FarmTile> {
        self.tiles.get(slot.0).ok_or(SimError::InvalidSlot { slot })
    }

    fn tile_mut(&mut self, slot: SlotId) -> SimResult<&mut FarmTile> {
        self.tiles.get_mut(slot.0).ok_or(SimError::InvalidSlot { slot })
    }

    /// Iterate tiles with their slot ids in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (SlotId, &FarmTile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (SlotId(index), tile))
    }

    /// Till a tile. Returns false when it was already tilled.
    pub fn till(&mut self, slot: SlotId) -> SimResult<bool> {
        let tile = self.tile_mut(slot)?;
        if tile.tilled {
            return Ok(false);
        }
        tile.tilled = true;
        debug!("Tilled slot {}", slot);
        Ok(true)
    }

    /// Check that `plant` would succeed without changing anything
    pub fn can_plant(&self, slot: SlotId) -> SimResult<()> {
        let tile = self.tile(slot)?;
        if self.is_full() {
            return Err(SimError::FarmFull {
                capacity: self.capacity,
            });
        }
        if tile.has_crop() {
            return Err(SimError::SlotOccupied { slot });
        }
        if !tile.tilled {
            return Err(SimError::NotTilled { slot });
        }
        Ok(())
    }

    /// Plant a new crop in `slot`, recording `now` as its planting time
    pub fn plant(&mut self, slot: SlotId, spec: CropSpec, now: Duration) -> SimResult<()> {
        self.can_plant(slot)?;
        let mut crop = Crop::new(spec);
        crop.plant(now);
        self.tile_mut(slot)?.crop = Some(crop);
        self.crop_count += 1;
        Ok(())
    }

    /// The crop in `slot` if it can be harvested right now
    pub fn ready_crop(&self, slot: SlotId, now: Duration) -> SimResult<&Crop> {
        let crop = self
            .tile(slot)?
            .crop
            .as_ref()
            .ok_or(SimError::SlotEmpty { slot })?;
        if !crop.is_ready_to_harvest(now) {
            return Err(SimError::NotReady {
                crop: crop.name().to_string(),
            });
        }
        Ok(crop)
    }

    /// Harvest a ready crop, freeing its slot
    pub fn harvest(&mut self, slot: SlotId, now: Duration) -> SimResult<Crop> {
        self.ready_crop(slot, now)?;
        let tile = self.tile_mut(slot)?;
        let mut crop = tile.crop.take().ok_or(SimError::SlotEmpty { slot })?;
        crop.mark_harvested(now);
        self.crop_count -= 1;
        Ok(crop)
    }

    /// Remove whatever grows in `slot` without harvesting it
    pub fn clear(&mut self, slot: SlotId) -> SimResult<Option<Crop>> {
        let tile = self.tile_mut(slot)?;
        let removed = tile.crop.take();
        if removed.is_some() {
            self.crop_count -= 1;
        }
        Ok(removed)
    }

    /// Slots whose crop is ready at `now`
    pub fn ready_slots(&self, now: Duration) -> Vec<SlotId> {
        self.tiles()
            .filter(|(_, tile)| {
                tile.crop
                    .as_ref()
                    .is_some_and(|crop| crop.is_ready_to_harvest(now))
            })
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Planted crops with their slots
    pub fn crops(&self) -> impl Iterator<Item = (SlotId, &Crop)> {
        self.tiles()
            .filter_map(|(slot, tile)| tile.crop.as_ref().map(|crop| (slot, crop)))
    }
}
