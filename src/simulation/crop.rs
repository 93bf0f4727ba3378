//! Crop growth state machine
//!
//! A crop is a value object: it stores when it was planted and how long it
//! needs, and derives readiness and progress from the current time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Static description of a plantable crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    pub name: String,
    /// Money charged when the crop is planted
    pub cost: f64,
    /// Seconds from planting until the crop is ready
    pub growth_secs: u32,
}

impl CropSpec {
    pub fn new(name: impl Into<String>, cost: f64, growth_secs: u32) -> Self {
        Self {
            name: name.into(),
            cost,
            growth_secs,
        }
    }

    pub fn growth_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.growth_secs))
    }
}

/// Where a crop is in its lifecycle at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CropStage {
    Unplanted,
    Growing,
    Ready,
    Harvested,
}

/// A crop instance owned by a farm tile
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    pub spec: CropSpec,
    planted_at: Option<Duration>,
    harvested: bool,
}

impl Crop {
    pub fn new(spec: CropSpec) -> Self {
        Self {
            spec,
            planted_at: None,
            harvested: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn planted_at(&self) -> Option<Duration> {
        self.planted_at
    }

    pub fn is_harvested(&self) -> bool {
        self.harvested
    }

    /// Start growing at `now`
    pub fn plant(&mut self, now: Duration) {
        self.planted_at = Some(now);
        self.harvested = false;
    }

    /// Time spent growing. Zero when never planted or already harvested.
    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.planted_at {
            Some(planted_at) if !self.harvested => now.saturating_sub(planted_at),
            _ => Duration::ZERO,
        }
    }

    /// Growth progress in percent, clamped to 0..=100
    pub fn growth_progress(&self, now: Duration) -> u8 {
        let growth = self.spec.growth_duration();
        if self.planted_at.is_none() || self.harvested {
            return 0;
        }
        if growth.is_zero() {
            return 100;
        }
        let ratio = self.elapsed(now).as_secs_f64() / growth.as_secs_f64();
        (ratio * 100.0).clamp(0.0, 100.0) as u8
    }

    pub fn is_ready_to_harvest(&self, now: Duration) -> bool {
        self.planted_at.is_some() && !self.harvested && self.elapsed(now) >= self.spec.growth_duration()
    }

    pub fn stage(&self, now: Duration) -> CropStage {
        if self.harvested {
            CropStage::Harvested
        } else if self.planted_at.is_none() {
            CropStage::Unplanted
        } else if self.is_ready_to_harvest(now) {
            CropStage::Ready
        } else {
            CropStage::Growing
        }
    }

    /// Time left until the crop is ready
    pub fn remaining(&self, now: Duration) -> Duration {
        if self.planted_at.is_none() || self.harvested {
            return Duration::ZERO;
        }
        self.spec.growth_duration().saturating_sub(self.elapsed(now))
    }

    /// Freeze growth. Returns false when the crop was not ready.
    pub fn mark_harvested(&mut self, now: Duration) -> bool {
        if !self.is_ready_to_harvest(now) {
            return false;
        }
        self.harvested = true;
        true
    }
}
