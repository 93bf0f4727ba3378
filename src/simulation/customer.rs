//! Customer lifecycle and satisfaction scoring
//!
//! A customer waits at a seat with a few ordered dishes. Serving scores the
//! plate against the first ordered recipe and turns the score into a reward.
//! A customer that waits past its patience expires without paying.

use log::info;
use serde::Serialize;
use std::time::Duration;

use super::error::{SimError, SimResult};
use super::inventory::names_match;
use super::recipe::{Recipe, RecipeCatalog};
use super::types::{CustomerId, Position};

/// Satisfaction a customer starts with
pub const INITIAL_SATISFACTION: u8 = 100;

/// Points for including the main ingredient
pub const MAIN_INGREDIENT_POINTS: i32 = 50;
/// Points for matching the remaining ingredients
pub const ADDITIONAL_INGREDIENT_POINTS: i32 = 50;
/// Deducted per ingredient of difference in plate size
pub const COUNT_PENALTY_PER_INGREDIENT: i32 = 10;

/// Scoring strategy: recipe and submitted ingredients in, satisfaction 0..=100 out
pub type ScoreFn = fn(&Recipe, &[String]) -> u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerState {
    Waiting,
    Served { reward: i64 },
    Expired,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub position: Position,
    spawned_at: Duration,
    max_wait: Duration,
    orders: Vec<String>,
    satisfaction: u8,
    state: CustomerState,
    scoring: ScoreFn,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        position: Position,
        spawned_at: Duration,
        max_wait: Duration,
        orders: Vec<String>,
    ) -> Self {
        Self {
            id,
            position,
            spawned_at,
            max_wait,
            orders,
            satisfaction: INITIAL_SATISFACTION,
            state: CustomerState::Waiting,
            scoring: score_dish,
        }
    }

    /// Swap the scoring strategy
    pub fn with_scoring(mut self, scoring: ScoreFn) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn orders(&self) -> &[String] {
        &self.orders
    }

    /// The dish every plate is judged against
    pub fn first_order(&self) -> Option<&str> {
        self.orders.first().map(String::as_str)
    }

    pub fn has_ordered(&self, recipe: &str) -> bool {
        self.orders.iter().any(|order| names_match(order, recipe))
    }

    pub fn satisfaction(&self) -> u8 {
        self.satisfaction
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub fn spawned_at(&self) -> Duration {
        self.spawned_at
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    pub fn is_waiting(&self) -> bool {
        self.state == CustomerState::Waiting
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_waiting()
    }

    pub fn waited(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }

    /// Patience left before the customer gives up
    pub fn remaining(&self, now: Duration) -> Duration {
        self.max_wait.saturating_sub(self.waited(now))
    }

    pub fn is_waiting_too_long(&self, now: Duration) -> bool {
        self.waited(now) > self.max_wait
    }

    /// Score a plate against the first ordered recipe and store it
    pub fn update_satisfaction(&mut self, recipes: &RecipeCatalog, ingredients: &[String]) -> SimResult<u8> {
        if self.is_terminal() {
            return Err(SimError::CustomerGone(self.id));
        }
        self.satisfaction = match self.first_order().and_then(|name| recipes.get_recipe(name)) {
            Some(recipe) => (self.scoring)(recipe, ingredients).min(100),
            None => 0,
        };
        Ok(self.satisfaction)
    }

    /// Reward for the current satisfaction; zero when the recipe is unknown
    pub fn calculate_reward(&self, recipes: &RecipeCatalog) -> i64 {
        self.first_order()
            .and_then(|name| recipes.get_recipe(name))
            .map_or(0, |recipe| reward_for(recipe.base_reward, self.satisfaction))
    }

    /// Serve a dish. `recipe` must be one of the orders; the plate is still
    /// judged against the first order. Returns the reward.
    pub fn serve(
        &mut self,
        recipes: &RecipeCatalog,
        recipe: &str,
        ingredients: &[String],
        now: Duration,
    ) -> SimResult<i64> {
        self.check_servable(recipe, now)?;
        self.update_satisfaction(recipes, ingredients)?;
        let reward = self.calculate_reward(recipes);
        self.state = CustomerState::Served { reward };
        info!(
            "Customer {} served {} (satisfaction {}, reward {})",
            self.id, recipe, self.satisfaction, reward
        );
        Ok(reward)
    }

    /// Validate a serve without changing anything
    pub fn check_servable(&self, recipe: &str, now: Duration) -> SimResult<()> {
        if self.is_terminal() || self.is_waiting_too_long(now) {
            return Err(SimError::CustomerGone(self.id));
        }
        if !self.has_ordered(recipe) {
            return Err(SimError::NotOrdered {
                customer: self.id,
                recipe: recipe.to_string(),
            });
        }
        Ok(())
    }

    /// Expire the customer if its patience ran out. Returns true on transition.
    pub fn expire_if_due(&mut self, now: Duration) -> bool {
        if self.is_waiting() && self.is_waiting_too_long(now) {
            self.state = CustomerState::Expired;
            info!("Customer {} left after waiting {:?}", self.id, self.waited(now));
            return true;
        }
        false
    }
}

/// Default scoring: main ingredient, plate size and the remaining ingredients.
///
/// The additional-ingredient ratio is rounded to 0 or 1 before weighting, so a
/// plate with at least half of the remaining ingredients earns the full 50.
pub fn score_dish(recipe: &Recipe, submitted: &[String]) -> u8 {
    let contains = |name: &str| submitted.iter().any(|s| names_match(s, name));

    let main_match = match recipe.main_ingredient() {
        Some(main) if contains(main) => MAIN_INGREDIENT_POINTS,
        _ => 0,
    };

    let size_difference = recipe.ingredients.len().abs_diff(submitted.len()) as i32;
    let count_penalty = COUNT_PENALTY_PER_INGREDIENT * size_difference;

    let additional = recipe.additional_ingredients();
    let match_ratio = if additional.is_empty() {
        0
    } else {
        let matched = additional.iter().filter(|name| contains(name)).count();
        (matched as f64 / additional.len() as f64).round() as i32
    };
    let additional_match = ADDITIONAL_INGREDIENT_POINTS * match_ratio;

    (main_match - count_penalty + additional_match).clamp(0, 100) as u8
}

/// `base * (satisfaction * 2 - 100) / 100`, truncated toward zero
pub fn reward_for(base_reward: i64, satisfaction: u8) -> i64 {
    let factor = (f64::from(satisfaction) * 2.0 - 100.0) / 100.0;
    (base_reward as f64 * factor).trunc() as i64
}
