//! Static game data: plantable crops, shop stock and recipes
//!
//! `Catalog::standard()` holds the built-in data. A front end may build its
//! own catalog and pass it to the session instead.

use serde::{Deserialize, Serialize};

use super::crop::CropSpec;
use super::error::{SimError, SimResult};
use super::inventory::{names_match, Item};
use super::recipe::{Recipe, RecipeCatalog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub crops: Vec<CropSpec>,
    pub shop: Vec<Item>,
    pub recipes: RecipeCatalog,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// Built-in crops, shop items and the ten house recipes
    pub fn standard() -> Self {
        Self {
            crops: standard_crops(),
            shop: standard_shop(),
            recipes: RecipeCatalog::new(standard_recipes()),
        }
    }

    /// Look up a crop by case-insensitive name
    pub fn crop(&self, name: &str) -> SimResult<&CropSpec> {
        self.crops
            .iter()
            .find(|spec| names_match(&spec.name, name))
            .ok_or_else(|| SimError::UnknownCrop(name.to_string()))
    }

    /// Look up a shop item by case-insensitive name
    pub fn shop_item(&self, name: &str) -> SimResult<&Item> {
        self.shop
            .iter()
            .find(|item| item.matches(name))
            .ok_or_else(|| SimError::UnknownItem(name.to_string()))
    }

    /// Price used when an item is created outside the shop (starting kit)
    pub fn price_of(&self, name: &str) -> f64 {
        self.shop_item(name)
            .map(|item| item.price)
            .or_else(|_| self.crop(name).map(|spec| spec.cost))
            .unwrap_or(0.0)
    }
}

/// Crops: (name, planting cost, growth seconds)
fn standard_crops() -> Vec<CropSpec> {
    vec![
        CropSpec::new("Onion", 2.0, 5),
        CropSpec::new("Tomato", 3.0, 8),
        CropSpec::new("Lettuce", 2.0, 6),
        CropSpec::new("Wheat", 1.0, 4),
        CropSpec::new("Olive", 4.0, 12),
        CropSpec::new("Truffle", 10.0, 30),
    ]
}

fn standard_shop() -> Vec<Item> {
    vec![
        Item::new("Onion", 2.0),
        Item::new("Tomato", 3.0),
        Item::new("Lettuce", 2.0),
        Item::new("Wheat", 1.0),
        Item::new("Olive", 4.0),
        Item::new("Truffle", 10.0),
        Item::new("Cheese", 3.0),
        Item::new("Butter", 2.0),
        Item::new("Meat", 4.0),
        Item::new("Egg", 1.0),
        Item::new("Milk", 1.0),
        Item::new("Potato", 1.0),
        Item::new("Snail", 3.0),
    ]
}

fn standard_recipes() -> Vec<Recipe> {
    vec![
        // 3 ingredients
        Recipe::new("onion_soup", &["onion", "cheese", "butter"], 6),
        Recipe::new("salad", &["lettuce", "tomato", "olive"], 5),
        Recipe::new("tomato_pasta", &["wheat", "tomato", "meat"], 9),
        Recipe::new("sandwich", &["wheat", "lettuce", "tomato"], 7),
        Recipe::new("steak", &["meat", "onion", "butter"], 10),
        Recipe::new("escargot", &["snail", "onion", "butter"], 11),
        // 4 ingredients
        Recipe::new("hamburger", &["meat", "wheat", "lettuce", "tomato"], 9),
        // 5 ingredients
        Recipe::new(
            "carbonara_pasta",
            &["wheat", "egg", "cheese", "meat", "onion"],
            11,
        ),
        Recipe::new(
            "cream_gnocchi",
            &["wheat", "milk", "potato", "butter", "cheese"],
            12,
        ),
        Recipe::new(
            "truffle_pasta",
            &["truffle", "cheese", "milk", "butter", "wheat"],
            16,
        ),
    ]
}
