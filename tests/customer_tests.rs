//! Customer scoring, lifecycle, recipe catalog and spawner tests

use harvest_diner::simulation::{
    reward_for, score_dish, Catalog, Customer, CustomerId, CustomerSpawner, CustomerState,
    Position, Recipe, RecipeCatalog, SimConfig, SimError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::Duration;

const MAX_WAIT: Duration = Duration::from_millis(30_000);

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn recipes() -> RecipeCatalog {
    Catalog::standard().recipes
}

fn customer_ordering(orders: &[&str]) -> Customer {
    Customer::new(
        CustomerId(1),
        Position::new(520.0, 80.0),
        Duration::ZERO,
        MAX_WAIT,
        strings(orders),
    )
}

#[test]
fn test_perfect_dish_scores_full_reward() {
    let catalog = recipes();
    let mut customer = customer_ordering(&["onion_soup", "salad", "steak"]);

    let satisfaction = customer
        .update_satisfaction(&catalog, &strings(&["onion", "cheese", "butter"]))
        .unwrap();
    assert_eq!(satisfaction, 100);
    assert_eq!(customer.calculate_reward(&catalog), 6);
}

#[test]
fn test_partial_dish_rounds_additional_ratio_up() {
    // No main ingredient, two short, one of two extras (ratio 0.5 rounds to 1)
    let catalog = recipes();
    let mut customer = customer_ordering(&["onion_soup"]);

    let satisfaction = customer
        .update_satisfaction(&catalog, &strings(&["cheese"]))
        .unwrap();
    assert_eq!(satisfaction, 30);
    assert_eq!(customer.calculate_reward(&catalog), -2);
}

#[test]
fn test_wrong_dish_clamps_to_zero_and_penalizes() {
    let catalog = recipes();
    let mut customer = customer_ordering(&["onion_soup"]);

    let satisfaction = customer
        .update_satisfaction(&catalog, &strings(&["milk"]))
        .unwrap();
    assert_eq!(satisfaction, 0);
    assert_eq!(customer.calculate_reward(&catalog), -6);
}

#[test]
fn test_score_dish_components() {
    let recipe = Recipe::new("steak", &["meat", "onion", "butter"], 10);

    // Main plus one of two extras, right size
    assert_eq!(score_dish(&recipe, &strings(&["meat", "onion", "egg"])), 100);
    // Main only, two short, no extras
    assert_eq!(score_dish(&recipe, &strings(&["meat"])), 30);
    // Extra ingredients count against the plate
    assert_eq!(
        score_dish(&recipe, &strings(&["meat", "onion", "butter", "egg", "milk"])),
        80
    );
    // Case does not matter
    assert_eq!(score_dish(&recipe, &strings(&["MEAT", "Onion", "butter"])), 100);
}

#[test]
fn test_single_ingredient_recipe_has_no_additional_points() {
    let recipe = Recipe::new("toast", &["wheat"], 2);
    assert_eq!(score_dish(&recipe, &strings(&["wheat"])), 50);
}

#[test]
fn test_reward_is_monotonic_in_satisfaction() {
    assert_eq!(reward_for(6, 100), 6);
    assert_eq!(reward_for(6, 50), 0);
    assert_eq!(reward_for(6, 0), -6);

    let mut last = i64::MIN;
    for satisfaction in 0..=100u8 {
        let reward = reward_for(11, satisfaction);
        assert!(reward >= last, "Reward dropped at satisfaction {}", satisfaction);
        last = reward;
    }
}

#[test]
fn test_unknown_recipe_scores_zero_reward() {
    let catalog = recipes();
    let mut customer = customer_ordering(&["mystery_stew"]);

    assert_eq!(
        customer.update_satisfaction(&catalog, &strings(&["onion"])),
        Ok(0)
    );
    assert_eq!(customer.calculate_reward(&catalog), 0);
}

#[test]
fn test_customer_expires_after_max_wait() {
    let mut customer = customer_ordering(&["salad"]);

    assert!(!customer.is_waiting_too_long(Duration::from_millis(30_000)));
    assert!(!customer.expire_if_due(Duration::from_millis(30_000)));
    assert!(customer.is_waiting_too_long(Duration::from_millis(30_001)));

    assert!(customer.expire_if_due(Duration::from_millis(30_001)));
    assert_eq!(customer.state(), CustomerState::Expired);
    assert!(customer.is_terminal());
    assert!(!customer.expire_if_due(Duration::from_millis(40_000)));
}

#[test]
fn test_serve_transitions_to_served() {
    let catalog = recipes();
    let mut customer = customer_ordering(&["onion_soup", "salad"]);

    // Ordering a later dish is allowed; scoring still uses the first order
    let reward = customer
        .serve(
            &catalog,
            "salad",
            &strings(&["onion", "cheese", "butter"]),
            Duration::from_secs(3),
        )
        .unwrap();
    assert_eq!(reward, 6);
    assert_eq!(customer.state(), CustomerState::Served { reward: 6 });

    let err = customer
        .serve(&catalog, "salad", &strings(&["onion"]), Duration::from_secs(4))
        .unwrap_err();
    assert_eq!(err, SimError::CustomerGone(CustomerId(1)));
    assert_eq!(customer.satisfaction(), 100, "Terminal customers are frozen");
}

#[test]
fn test_serve_rejects_unordered_recipe() {
    let catalog = recipes();
    let mut customer = customer_ordering(&["onion_soup"]);

    let err = customer
        .serve(&catalog, "steak", &strings(&["meat"]), Duration::from_secs(1))
        .unwrap_err();
    assert_eq!(
        err,
        SimError::NotOrdered {
            customer: CustomerId(1),
            recipe: "steak".to_string()
        }
    );
    assert!(customer.is_waiting());
}

#[test]
fn test_serve_after_patience_runs_out_fails() {
    let catalog = recipes();
    let mut customer = customer_ordering(&["onion_soup"]);
    let err = customer
        .serve(
            &catalog,
            "onion_soup",
            &strings(&["onion"]),
            Duration::from_millis(30_001),
        )
        .unwrap_err();
    assert_eq!(err, SimError::CustomerGone(CustomerId(1)));
}

#[test]
fn test_custom_scoring_strategy() {
    fn always_half(_: &Recipe, _: &[String]) -> u8 {
        50
    }
    let catalog = recipes();
    let mut customer = customer_ordering(&["steak"]).with_scoring(always_half);
    let reward = customer
        .serve(&catalog, "steak", &strings(&["meat"]), Duration::from_secs(1))
        .unwrap();
    assert_eq!(reward, 0);
}

#[test]
fn test_recipe_catalog_lookup() {
    let catalog = recipes();
    assert_eq!(catalog.len(), 10);

    let soup = catalog.get_recipe("onion_soup").unwrap();
    assert_eq!(soup.main_ingredient(), Some("onion"));
    assert_eq!(soup.additional_ingredients(), &strings(&["cheese", "butter"])[..]);
    assert_eq!(soup.base_reward, 6);

    assert!(catalog.get_recipe("Onion_Soup").is_some());
    assert!(catalog.get_recipe("pizza").is_none());
    assert_eq!(
        catalog.require("pizza").unwrap_err(),
        SimError::UnknownRecipe("pizza".to_string())
    );
}

#[test]
fn test_recipes_by_difficulty() {
    let catalog = recipes();
    assert_eq!(catalog.recipes_by_difficulty(3).len(), 6);
    assert_eq!(catalog.recipes_by_difficulty(4).len(), 1);
    assert_eq!(catalog.recipes_by_difficulty(5).len(), 3);
    assert_eq!(
        catalog.check_ingredients("hamburger", &["meat", "tomato", "snail"]),
        2
    );
    assert_eq!(catalog.check_ingredients("pizza", &["meat"]), 0);
}

#[test]
fn test_random_recipes_are_distinct() {
    let catalog = recipes();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let drawn = catalog.random_recipes(3, &mut rng);
        assert_eq!(drawn.len(), 3);
        let names: HashSet<&str> = drawn.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 3, "Recipes must be drawn without replacement");
    }

    assert_eq!(catalog.random_recipes(50, &mut rng).len(), 10);
    assert!(RecipeCatalog::default()
        .random_recipes(3, &mut rng)
        .is_empty());
}

#[test]
fn test_spawner_schedule() {
    let config = SimConfig::default();
    let catalog = recipes();
    let mut rng = StdRng::seed_from_u64(1);
    let mut spawner = CustomerSpawner::new(&config, Duration::ZERO);

    assert_eq!(spawner.next_spawn_at(), Duration::from_secs(2));
    assert!(spawner
        .try_spawn(Duration::from_secs(1), &[], &catalog, &mut rng)
        .is_none());

    let first = spawner
        .try_spawn(Duration::from_secs(2), &[], &catalog, &mut rng)
        .unwrap();
    assert_eq!(first.id, CustomerId(0));
    assert_eq!(first.position, Position::new(520.0, 80.0));
    assert_eq!(first.orders().len(), 3);
    assert_eq!(first.satisfaction(), 100);
    assert_eq!(spawner.next_spawn_at(), Duration::from_secs(7));

    let second = spawner
        .try_spawn(Duration::from_secs(7), &[first.position], &catalog, &mut rng)
        .unwrap();
    assert_eq!(second.id, CustomerId(1));
    assert_eq!(second.position, Position::new(600.0, 80.0), "Takes the next free seat");

    spawner.on_departure(Duration::from_secs(10));
    assert_eq!(spawner.next_spawn_at(), Duration::from_secs(13));
}

#[test]
fn test_spawner_respects_cap() {
    let config = SimConfig::default();
    let catalog = recipes();
    let mut rng = StdRng::seed_from_u64(1);
    let mut spawner = CustomerSpawner::new(&config, Duration::ZERO);

    let full = config.customer_seats.clone();
    assert!(!spawner.should_spawn(Duration::from_secs(60), full.len()));
    assert!(spawner
        .try_spawn(Duration::from_secs(60), &full, &catalog, &mut rng)
        .is_none());
}
