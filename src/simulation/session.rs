//! Game session: the single owner of all mutable simulation state
//!
//! Front ends either call `execute` directly between ticks or `enqueue`
//! commands to be applied at the start of the next tick. `tick` then runs
//! movement, customer expiry and spawning, and returns a fresh snapshot.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

use super::catalog::Catalog;
use super::clock::{Clock, SystemClock, Ticker};
use super::command::{Command, CommandResult, HarvestTarget, HELP_TEXT};
use super::config::SimConfig;
use super::customer::{Customer, CustomerState};
use super::error::{ErrorKind, SimError, SimResult};
use super::farm::Farm;
use super::inventory::Item;
use super::player::{MoveBounds, Player};
use super::spawner::CustomerSpawner;
use super::snapshot::{CropView, CustomerView, PlayerView, SessionStats, Snapshot, TileView};
use super::types::{CustomerId, Position, SlotId, TilePos};

/// Units gained for a harvest roll `r` in `[0, 1)`
pub fn harvest_yield(roll: f64) -> u32 {
    if roll < 0.5 {
        0
    } else if roll < 0.7 {
        1
    } else if roll < 0.8 {
        2
    } else {
        3
    }
}

/// What a single-slot harvest produced
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestOutcome {
    pub slot: SlotId,
    pub crop: String,
    /// Units the roll granted
    pub rolled: u32,
    pub added: u32,
    pub dropped: u32,
}

impl HarvestOutcome {
    fn into_result(self) -> CommandResult {
        if self.rolled == 0 {
            CommandResult::success(format!(
                "Harvest of {} in slot {} failed. The crop was lost.",
                self.crop, self.slot
            ))
        } else if self.dropped > 0 {
            CommandResult::partial(
                format!(
                    "Harvested {} {} from slot {}, but the inventory is full: {} dropped",
                    self.added, self.crop, self.slot, self.dropped
                ),
                ErrorKind::CapacityExceeded,
            )
        } else {
            CommandResult::success(format!(
                "Harvested {} {} from slot {}",
                self.added, self.crop, self.slot
            ))
        }
    }
}

/// Everything one tick did
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    /// Results of the queued commands applied at the start of the tick
    pub commands: Vec<CommandResult>,
    pub spawned: Vec<CustomerId>,
    pub expired: Vec<CustomerId>,
    pub snapshot: Snapshot,
}

pub struct SessionBuilder {
    config: SimConfig,
    catalog: Catalog,
    clock: Option<Box<dyn Clock>>,
    seed: Option<u64>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            catalog: Catalog::standard(),
            clock: None,
            seed: None,
        }
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Fix the RNG seed for reproducible customers and harvests
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> GameSession {
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()));
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let start = clock.now();
        let config = self.config;

        let mut player = Player::new(
            config.starting_money,
            config.inventory_capacity,
            config.player_start,
            config.player_size,
        );
        for name in &config.starting_items {
            let item = Item::new(name.as_str(), self.catalog.price_of(name));
            if let Err(e) = player.add_item(item) {
                warn!("Dropping starting item {}: {}", name, e);
            }
        }
        player.inventory.take_dirty();

        GameSession {
            ticker: Ticker::new(config.tick_rate_hz, start),
            farm: Farm::new(config.farm_width, config.farm_height, config.plot_capacity),
            spawner: CustomerSpawner::new(&config, start),
            player,
            customers: Vec::new(),
            stats: SessionStats::default(),
            queue: VecDeque::new(),
            last_tick: start,
            catalog: self.catalog,
            clock,
            rng,
            config,
        }
    }
}

pub struct GameSession {
    config: SimConfig,
    clock: Box<dyn Clock>,
    ticker: Ticker,
    rng: StdRng,
    catalog: Catalog,
    farm: Farm,
    player: Player,
    customers: Vec<Customer>,
    spawner: CustomerSpawner,
    stats: SessionStats,
    queue: VecDeque<Command>,
    last_tick: Duration,
}

impl GameSession {
    /// Session with default config on the system clock
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Seat a customer directly, bypassing the spawner. Spawned customers
    /// never reuse the id afterwards.
    pub fn add_customer(&mut self, customer: Customer) -> SimResult<()> {
        if self.customer(customer.id).is_some() {
            return Err(SimError::DuplicateCustomer(customer.id));
        }
        self.spawner.reserve_id(customer.id);
        info!("Customer {} seated ordering {:?}", customer.id, customer.orders());
        self.stats.customers_spawned += 1;
        self.customers.push(customer);
        Ok(())
    }

    /// Queue a command for the next tick boundary
    pub fn enqueue(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Apply a command immediately
    pub fn execute(&mut self, command: Command) -> CommandResult {
        let result = match command {
            Command::Till { slot } => CommandResult::from_result(self.till(slot)),
            Command::Plant { slot, crop } => CommandResult::from_result(self.plant(slot, &crop)),
            Command::Harvest(HarvestTarget::Slot(slot)) => self.harvest(slot),
            Command::Harvest(HarvestTarget::All) => self.harvest_all(),
            Command::Buy { item, quantity } => CommandResult::from_result(self.buy(&item, quantity)),
            Command::Serve {
                customer,
                recipe,
                ingredients,
            } => CommandResult::from_result(self.serve(customer, &recipe, &ingredients)),
            Command::Move(direction) => {
                self.player.queue_move(direction);
                CommandResult::success(format!("Moving ({}, {})", direction.dx, direction.dy))
            }
            Command::Farm => CommandResult::success(self.farm_status()),
            Command::Player => CommandResult::success(self.player_status()),
            Command::Customers => CommandResult::success(self.customers_status()),
            Command::Help => CommandResult::success(HELP_TEXT),
            Command::Quit => CommandResult::success("Exiting game... Goodbye!"),
        };
        if !result.ok {
            warn!("Command failed: {}", result.message);
        }
        result
    }

    /// Parse and apply a text command
    pub fn execute_line(&mut self, line: &str) -> CommandResult {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => {
                warn!("Rejected input '{}': {}", line.trim(), e);
                CommandResult::failure(&e)
            }
        }
    }

    /// Run every tick the ticker says is due. Returns how many ran.
    pub fn pump(&mut self) -> u32 {
        let due = self.ticker.due(self.now());
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> TickReport {
        let now = self.now();
        let delta = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        self.stats.ticks += 1;

        let mut commands = Vec::new();
        while let Some(command) = self.queue.pop_front() {
            commands.push(self.execute(command));
        }

        // Movement
        let bounds = self.move_bounds();
        self.player.apply_input(bounds);
        self.player
            .advance(delta.as_secs_f32(), self.config.walk_speed);

        // Customers
        let expired: Vec<CustomerId> = self
            .customers
            .iter_mut()
            .filter_map(|customer| customer.expire_if_due(now).then_some(customer.id))
            .collect();
        self.retire_customers(now);

        let mut spawned = Vec::new();
        let occupied: Vec<Position> = self.customers.iter().map(|c| c.position).collect();
        if let Some(customer) =
            self.spawner
                .try_spawn(now, &occupied, &self.catalog.recipes, &mut self.rng)
        {
            spawned.push(customer.id);
            self.stats.customers_spawned += 1;
            self.customers.push(customer);
        }

        debug!(
            "Tick {}: {} customers, {} crops, money {:.2}",
            self.stats.ticks,
            self.customers.len(),
            self.farm.crop_count(),
            self.player.money()
        );

        TickReport {
            tick: self.stats.ticks,
            commands,
            spawned,
            expired,
            snapshot: self.snapshot(),
        }
    }

    fn move_bounds(&self) -> MoveBounds {
        MoveBounds {
            max_x: self.config.map_width - self.player.size,
            max_y: self.config.map_height - self.player.size,
            step: self.config.move_step,
        }
    }

    /// Drop served and expired customers, counting them and delaying the next arrival
    fn retire_customers(&mut self, now: Duration) {
        let stats = &mut self.stats;
        let mut departed = 0;
        self.customers.retain(|customer| match customer.state() {
            CustomerState::Waiting => true,
            CustomerState::Served { .. } => {
                stats.customers_served += 1;
                departed += 1;
                false
            }
            CustomerState::Expired => {
                stats.customers_expired += 1;
                departed += 1;
                false
            }
        });
        for _ in 0..departed {
            self.spawner.on_departure(now);
        }
    }

    fn player_tile(&self) -> TilePos {
        self.player.tile(self.config.tile_size)
    }

    /// An explicit slot, or the tile under the player
    fn resolve_slot(&self, slot: Option<SlotId>) -> SimResult<SlotId> {
        let slot = match slot {
            Some(slot) => slot,
            None => self
                .farm
                .slot_at(self.player_tile())
                .ok_or_else(|| SimError::invalid("you are not standing on the farm"))?,
        };
        self.farm.tile(slot)?;
        self.check_reach(slot)?;
        Ok(slot)
    }

    fn check_reach(&self, slot: SlotId) -> SimResult<()> {
        let Some(range) = self.config.interaction_range else {
            return Ok(());
        };
        let pos = self.farm.tile_pos(slot).ok_or(SimError::InvalidSlot { slot })?;
        if pos.distance(&self.player_tile()) > range {
            return Err(SimError::OutOfReach { slot });
        }
        Ok(())
    }

    fn in_reach(&self, slot: SlotId) -> bool {
        self.check_reach(slot).is_ok()
    }

    pub fn till(&mut self, slot: Option<SlotId>) -> SimResult<String> {
        let slot = self.resolve_slot(slot)?;
        if self.farm.till(slot)? {
            Ok(format!("Tilled slot {}", slot))
        } else {
            Ok(format!("Slot {} is already tilled", slot))
        }
    }

    /// Plant a crop, paying its planting cost
    pub fn plant(&mut self, slot: Option<SlotId>, crop: &str) -> SimResult<String> {
        let slot = self.resolve_slot(slot)?;
        self.farm.can_plant(slot)?;
        let spec = self.catalog.crop(crop)?.clone();

        if !self.player.spend_money(spec.cost) {
            return Err(SimError::InsufficientFunds {
                needed: spec.cost,
                available: self.player.money(),
            });
        }
        let now = self.now();
        if let Err(e) = self.farm.plant(slot, spec.clone(), now) {
            self.player.earn_money(spec.cost);
            return Err(e);
        }

        self.stats.crops_planted += 1;
        info!("Planted {} in slot {}", spec.name, slot);
        Ok(format!(
            "Planted {} in slot {} for ${:.2}",
            spec.name, slot, spec.cost
        ))
    }

    /// Harvest one slot with a fresh random roll
    pub fn harvest(&mut self, slot: SlotId) -> CommandResult {
        let roll: f64 = self.rng.random();
        self.harvest_with_roll(slot, roll)
    }

    /// Harvest one slot with a given roll in `[0, 1)`
    pub fn harvest_with_roll(&mut self, slot: SlotId, roll: f64) -> CommandResult {
        match self.harvest_slot(slot, roll) {
            Ok(outcome) => outcome.into_result(),
            Err(e) => CommandResult::failure(&e),
        }
    }

    fn harvest_slot(&mut self, slot: SlotId, roll: f64) -> SimResult<HarvestOutcome> {
        if !(0.0..1.0).contains(&roll) {
            return Err(SimError::invalid(format!(
                "harvest roll {} is outside [0, 1)",
                roll
            )));
        }
        let slot = self.resolve_slot(Some(slot))?;
        let now = self.now();
        let crop = self.farm.ready_crop(slot, now)?.clone();

        // A failed roll loses the crop whether or not there is room for it
        let rolled = harvest_yield(roll);
        if rolled > 0 && self.player.inventory.is_full() {
            return Err(SimError::InventoryFull {
                capacity: self.player.inventory.capacity(),
            });
        }

        let mut added = 0;
        for _ in 0..rolled {
            if self.player.harvest_crop(&crop, now).is_err() {
                break;
            }
            added += 1;
        }
        self.farm.harvest(slot, now)?;

        let dropped = rolled - added;
        if rolled == 0 {
            self.stats.failed_harvests += 1;
            info!("Harvest of {} in slot {} failed", crop.name(), slot);
        } else {
            self.stats.crops_harvested += 1;
            info!("Harvested {} {} from slot {}", added, crop.name(), slot);
        }
        if dropped > 0 {
            self.stats.units_dropped += dropped;
            warn!("Inventory full, dropped {} {}", dropped, crop.name());
        }

        Ok(HarvestOutcome {
            slot,
            crop: crop.name().to_string(),
            rolled,
            added,
            dropped,
        })
    }

    /// Harvest every ready crop in reach
    pub fn harvest_all(&mut self) -> CommandResult {
        let now = self.now();
        let slots: Vec<SlotId> = self
            .farm
            .ready_slots(now)
            .into_iter()
            .filter(|slot| self.in_reach(*slot))
            .collect();
        if slots.is_empty() {
            return CommandResult::success("No crops are ready to harvest in range.");
        }

        let mut messages = Vec::new();
        let mut error = None;
        for slot in slots {
            let roll: f64 = self.rng.random();
            let result = self.harvest_with_roll(slot, roll);
            messages.push(result.message);
            if !result.ok {
                error = error.or(result.error);
                if result.error == Some(ErrorKind::CapacityExceeded) {
                    break;
                }
            }
        }
        CommandResult {
            ok: error.is_none(),
            message: messages.join("\n"),
            error,
        }
    }

    /// Buy `quantity` units from the shop. Funds and space are checked up front.
    pub fn buy(&mut self, item: &str, quantity: u32) -> SimResult<String> {
        if quantity == 0 {
            return Err(SimError::invalid("quantity must be at least 1"));
        }
        let item = self.catalog.shop_item(item)?.clone();
        let total = item.price * f64::from(quantity);

        if !self.player.can_afford(total) {
            return Err(SimError::InsufficientFunds {
                needed: total,
                available: self.player.money(),
            });
        }
        if self.player.inventory.free_slots() < quantity as usize {
            return Err(SimError::InventoryFull {
                capacity: self.player.inventory.capacity(),
            });
        }
        if !self.player.spend_money(total) {
            return Err(SimError::InsufficientFunds {
                needed: total,
                available: self.player.money(),
            });
        }
        for _ in 0..quantity {
            self.player.add_item(item.clone())?;
        }

        info!("Bought {} {} for {:.2}", quantity, item.name, total);
        Ok(format!(
            "Bought {} {} for ${:.2}",
            quantity, item.name, total
        ))
    }

    /// Serve a dish from the inventory. Returns the reward message.
    pub fn serve(
        &mut self,
        customer: CustomerId,
        recipe: &str,
        ingredients: &[String],
    ) -> SimResult<String> {
        if ingredients.is_empty() {
            return Err(SimError::invalid("a dish needs at least one ingredient"));
        }
        let max = self.config.max_dish_ingredients;
        if ingredients.len() > max {
            return Err(SimError::invalid(format!(
                "a dish can have at most {} ingredients",
                max
            )));
        }

        let now = self.now();
        let index = self
            .customers
            .iter()
            .position(|c| c.id == customer)
            .ok_or(SimError::CustomerNotFound(customer))?;
        self.customers[index].check_servable(recipe, now)?;
        if let Some(missing) = self.player.inventory.first_missing(ingredients) {
            return Err(SimError::MissingIngredient(missing.to_string()));
        }

        for ingredient in ingredients {
            self.player.remove_item(ingredient);
        }
        let reward = self.customers[index].serve(&self.catalog.recipes, recipe, ingredients, now)?;
        let satisfaction = self.customers[index].satisfaction();
        let applied = self.player.apply_reward(reward);
        self.stats.total_rewards += applied;
        self.retire_customers(now);

        if reward >= 0 {
            Ok(format!(
                "Customer {} enjoyed the {} (satisfaction {}) and paid ${}",
                customer, recipe, satisfaction, reward
            ))
        } else {
            Ok(format!(
                "Customer {} disliked the {} (satisfaction {}): penalty ${:.2}",
                customer, recipe, satisfaction, -applied
            ))
        }
    }

    pub fn farm_status(&self) -> String {
        let now = self.now();
        let lines: Vec<String> = self
            .farm
            .crops()
            .map(|(slot, crop)| {
                let status = if crop.is_ready_to_harvest(now) {
                    "Ready to Harvest".to_string()
                } else {
                    format!("Growing ({}%)", crop.growth_progress(now))
                };
                format!("Slot {}: {} - {}", slot, crop.name(), status)
            })
            .collect();
        if lines.is_empty() {
            return "No crops planted.".to_string();
        }
        format!(
            "Farm ({} of {} plots used):\n{}",
            self.farm.crop_count(),
            self.farm.capacity(),
            lines.join("\n")
        )
    }

    pub fn player_status(&self) -> String {
        let inventory = &self.player.inventory;
        let items: Vec<String> = inventory
            .stacks()
            .iter()
            .map(|stack| format!("{} x{}", stack.name, stack.count))
            .collect();
        format!(
            "Money: ${:.2}\nInventory ({}/{}): {}",
            self.player.money(),
            inventory.len(),
            inventory.capacity(),
            if items.is_empty() {
                "empty".to_string()
            } else {
                items.join(", ")
            }
        )
    }

    pub fn customers_status(&self) -> String {
        let now = self.now();
        if self.customers.is_empty() {
            return "No customers waiting.".to_string();
        }
        self.customers
            .iter()
            .map(|c| {
                format!(
                    "Customer {}: orders {} ({:.1}s left)",
                    c.id,
                    c.orders().join(", "),
                    c.remaining(now).as_secs_f32()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Frozen copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        let now = self.now();
        let tiles = self
            .farm
            .tiles()
            .map(|(slot, tile)| {
                let pos = self.farm.tile_pos(slot).unwrap_or(TilePos::new(0, 0));
                TileView {
                    slot,
                    x: pos.x,
                    y: pos.y,
                    tilled: tile.tilled,
                    crop: tile.crop.as_ref().map(|crop| CropView {
                        name: crop.name().to_string(),
                        progress: crop.growth_progress(now),
                        ready: crop.is_ready_to_harvest(now),
                        stage: crop.stage(now),
                    }),
                }
            })
            .collect();
        let customers = self
            .customers
            .iter()
            .map(|c| CustomerView {
                id: c.id,
                position: c.position,
                remaining_ms: c.remaining(now).as_millis() as u64,
                orders: c.orders().to_vec(),
                satisfaction: c.satisfaction(),
                state: c.state(),
            })
            .collect();

        Snapshot {
            time_ms: now.as_millis() as u64,
            tick: self.stats.ticks,
            farm_width: self.farm.width(),
            farm_height: self.farm.height(),
            tiles,
            customers,
            player: PlayerView {
                position: self.player.position,
                tile: self.player_tile(),
                money: self.player.money(),
                inventory: self.player.inventory.stacks(),
                inventory_capacity: self.player.inventory.capacity(),
            },
            stats: self.stats.clone(),
        }
    }

    /// Lines of the end-of-run summary block
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "=== SIMULATION COMPLETE ===".to_string(),
            format!("Ticks run: {}", self.stats.ticks),
            format!("Customers spawned: {}", self.stats.customers_spawned),
            format!("Customers served: {}", self.stats.customers_served),
            format!("Customers expired: {}", self.stats.customers_expired),
            format!("Crops harvested: {}", self.stats.crops_harvested),
            format!("Final money: {:.2}", self.player.money()),
        ]
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
