//! Recipe catalog
//!
//! A read-only registry of dishes. It is built once and handed to the session
//! and to whoever needs lookups; nothing global.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{SimError, SimResult};
use super::inventory::names_match;

/// A dish: ordered ingredients (the first is the main one) and its reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub base_reward: i64,
}

impl Recipe {
    pub fn new(name: impl Into<String>, ingredients: &[&str], base_reward: i64) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            base_reward,
        }
    }

    pub fn main_ingredient(&self) -> Option<&str> {
        self.ingredients.first().map(String::as_str)
    }

    /// Everything except the main ingredient
    pub fn additional_ingredients(&self) -> &[String] {
        self.ingredients.get(1..).unwrap_or(&[])
    }

    /// Number of ingredients
    pub fn difficulty(&self) -> usize {
        self.ingredients.len()
    }

    pub fn uses(&self, ingredient: &str) -> bool {
        self.ingredients.iter().any(|i| names_match(i, ingredient))
    }
}

/// Name-keyed recipe registry. Ordered so seeded draws are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCatalog {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeCatalog {
    pub fn new(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        Self {
            recipes: recipes
                .into_iter()
                .map(|recipe| (recipe.name.clone(), recipe))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Exact name first, then a case-insensitive scan
    pub fn get_recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name).or_else(|| {
            self.recipes
                .values()
                .find(|recipe| names_match(&recipe.name, name))
        })
    }

    /// Like `get_recipe`, but reports a missing recipe as an error
    pub fn require(&self, name: &str) -> SimResult<&Recipe> {
        self.get_recipe(name)
            .ok_or_else(|| SimError::UnknownRecipe(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.recipes.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Draw up to `count` distinct recipes without replacement
    pub fn random_recipes<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Recipe> {
        let all: Vec<&Recipe> = self.recipes.values().collect();
        all.choose_multiple(rng, count).copied().collect()
    }

    pub fn recipes_by_difficulty(&self, difficulty: usize) -> Vec<&Recipe> {
        self.recipes
            .values()
            .filter(|recipe| recipe.difficulty() == difficulty)
            .collect()
    }

    /// How many submitted ingredients belong to the recipe (0 for unknown recipes)
    pub fn check_ingredients<S: AsRef<str>>(&self, name: &str, submitted: &[S]) -> usize {
        match self.get_recipe(name) {
            Some(recipe) => submitted
                .iter()
                .filter(|ingredient| recipe.uses(ingredient.as_ref()))
                .count(),
            None => 0,
        }
    }
}
