//! Customer spawning
//!
//! Customers arrive on a timer while seats are free. Whenever one leaves,
//! the next arrival is pushed back by the respawn cooldown.

use log::{debug, info};
use rand::Rng;
use std::time::Duration;

use super::config::SimConfig;
use super::customer::Customer;
use super::recipe::RecipeCatalog;
use super::types::{CustomerId, Position};

#[derive(Debug, Clone)]
pub struct CustomerSpawner {
    next_id: u32,
    next_spawn_at: Duration,
    interval: Duration,
    cooldown: Duration,
    max_wait: Duration,
    max_active: usize,
    orders_per_customer: usize,
    seats: Vec<Position>,
}

impl CustomerSpawner {
    pub fn new(config: &SimConfig, start: Duration) -> Self {
        Self {
            next_id: 0,
            next_spawn_at: start + config.first_spawn_delay(),
            interval: config.spawn_interval(),
            cooldown: config.respawn_cooldown(),
            max_wait: config.max_waiting(),
            max_active: config.max_active_customers.min(config.customer_seats.len()),
            orders_per_customer: config.orders_per_customer,
            seats: config.customer_seats.clone(),
        }
    }

    pub fn next_spawn_at(&self) -> Duration {
        self.next_spawn_at
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Whether a new customer may arrive now
    pub fn should_spawn(&self, now: Duration, active: usize) -> bool {
        active < self.max_active && now >= self.next_spawn_at
    }

    /// First seat nobody is sitting on
    pub fn free_seat(&self, occupied: &[Position]) -> Option<Position> {
        self.seats
            .iter()
            .find(|seat| !occupied.contains(seat))
            .copied()
    }

    /// Create a customer with random orders if one is due
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        occupied: &[Position],
        recipes: &RecipeCatalog,
        rng: &mut R,
    ) -> Option<Customer> {
        if !self.should_spawn(now, occupied.len()) {
            return None;
        }
        let seat = self.free_seat(occupied)?;
        let orders: Vec<String> = recipes
            .random_recipes(self.orders_per_customer, rng)
            .into_iter()
            .map(|recipe| recipe.name.clone())
            .collect();
        if orders.is_empty() {
            debug!("No recipes available, skipping customer spawn");
            self.next_spawn_at = now + self.interval;
            return None;
        }

        let id = CustomerId(self.next_id);
        self.next_id += 1;
        self.next_spawn_at = now + self.interval;

        info!("Customer {} arrived ordering {:?}", id, orders);
        Some(Customer::new(id, seat, now, self.max_wait, orders))
    }

    /// Skip past an id that was handed out elsewhere
    pub fn reserve_id(&mut self, id: CustomerId) {
        self.next_id = self.next_id.max(id.0.saturating_add(1));
    }

    /// A customer left; hold off the next arrival for the cooldown
    pub fn on_departure(&mut self, now: Duration) {
        self.next_spawn_at = self.next_spawn_at.max(now + self.cooldown);
    }
}
