//! Player wallet, inventory and movement tests

use harvest_diner::simulation::{
    Crop, CropSpec, Direction, ErrorKind, Inventory, InventoryChange, Item, MoveBounds, Player,
    Position, SimError, TilePos,
};
use std::time::Duration;

fn player_with(money: f64, capacity: usize) -> Player {
    Player::new(money, capacity, Position::new(120.0, 120.0), 40.0)
}

#[test]
fn test_spend_money_guards_balance() {
    let mut player = player_with(30.0, 25);

    assert!(!player.spend_money(30.5));
    assert_eq!(player.money(), 30.0, "Money should be unchanged");

    assert!(player.spend_money(12.5));
    assert_eq!(player.money(), 17.5);

    assert!(player.spend_money(17.5));
    assert_eq!(player.money(), 0.0);
    assert!(!player.spend_money(0.01));
}

#[test]
fn test_spend_money_rejects_nonsense_amounts() {
    let mut player = player_with(10.0, 25);
    assert!(!player.spend_money(-5.0));
    assert!(!player.spend_money(f64::NAN));
    assert_eq!(player.money(), 10.0);
}

#[test]
fn test_earn_money() {
    let mut player = player_with(0.0, 25);
    player.earn_money(7.0);
    assert_eq!(player.money(), 7.0);
    assert!(player.can_afford(7.0));
}

#[test]
fn test_penalty_never_makes_money_negative() {
    let mut player = player_with(4.0, 25);

    assert_eq!(player.apply_reward(6), 6.0);
    assert_eq!(player.money(), 10.0);

    assert_eq!(player.apply_reward(-6), -6.0);
    assert_eq!(player.money(), 4.0);

    assert_eq!(player.apply_reward(-16), -4.0, "Penalty is capped at the balance");
    assert_eq!(player.money(), 0.0);
}

#[test]
fn test_inventory_capacity() {
    let mut inventory = Inventory::new(2);
    assert!(inventory.add_item(Item::new("Onion", 2.0)).is_ok());
    assert!(inventory.add_item(Item::new("Onion", 2.0)).is_ok());
    assert!(inventory.is_full());

    let err = inventory.add_item(Item::new("Tomato", 3.0)).unwrap_err();
    assert_eq!(err, SimError::InventoryFull { capacity: 2 });
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(inventory.len(), 2);
}

#[test]
fn test_inventory_change_tracking() {
    let mut inventory = Inventory::new(5);
    assert!(!inventory.take_dirty());

    let change = inventory.add_item(Item::new("Cheese", 3.0)).unwrap();
    assert_eq!(change, InventoryChange::Added("Cheese".to_string()));
    assert_eq!(inventory.revision(), 1);
    assert!(inventory.take_dirty());
    assert!(!inventory.take_dirty(), "Dirty flag should clear after reading");

    let (item, change) = inventory.remove_item("cheese").unwrap();
    assert_eq!(item.name, "Cheese");
    assert_eq!(change, InventoryChange::Removed("Cheese".to_string()));
    assert_eq!(inventory.revision(), 2);

    assert!(inventory.remove_item("cheese").is_none());
    assert_eq!(inventory.revision(), 2, "Failed removal must not bump the revision");
    assert!(inventory.take_dirty());
}

#[test]
fn test_inventory_names_are_case_insensitive() {
    let mut inventory = Inventory::new(10);
    inventory.add_item(Item::new("Onion", 2.0)).unwrap();
    inventory.add_item(Item::new("onion", 2.0)).unwrap();
    inventory.add_item(Item::new("Tomato", 3.0)).unwrap();

    assert_eq!(inventory.count("ONION"), 2);
    assert!(inventory.contains("tomato"));

    let stacks = inventory.stacks();
    assert_eq!(stacks.len(), 2);
    assert_eq!(stacks[0].name, "Onion");
    assert_eq!(stacks[0].count, 2);
    assert_eq!(stacks[1].name, "Tomato");
    assert_eq!(stacks[1].count, 1);
}

#[test]
fn test_inventory_missing_counts_repeats() {
    let mut inventory = Inventory::new(10);
    inventory.add_item(Item::new("Onion", 2.0)).unwrap();
    inventory.add_item(Item::new("Butter", 2.0)).unwrap();

    assert!(inventory.contains_all(&["onion", "butter"]));
    assert_eq!(inventory.first_missing(&["onion", "onion"]), Some("onion"));
    assert_eq!(inventory.first_missing(&["butter", "cheese"]), Some("cheese"));
}

#[test]
fn test_player_remove_item() {
    let mut player = player_with(0.0, 5);
    player.add_item(Item::new("Egg", 1.0)).unwrap();
    assert!(player.remove_item("EGG"));
    assert!(!player.remove_item("egg"));
}

#[test]
fn test_harvest_crop_into_inventory() {
    let mut player = player_with(0.0, 1);
    let mut crop = Crop::new(CropSpec::new("Wheat", 1.0, 4));
    crop.plant(Duration::ZERO);

    let err = player.harvest_crop(&crop, Duration::from_secs(1)).unwrap_err();
    assert_eq!(
        err,
        SimError::NotReady {
            crop: "Wheat".to_string()
        }
    );
    assert!(player.inventory.is_empty());

    assert!(player.harvest_crop(&crop, Duration::from_secs(4)).is_ok());
    assert_eq!(player.inventory.count("wheat"), 1);

    let err = player.harvest_crop(&crop, Duration::from_secs(4)).unwrap_err();
    assert_eq!(err, SimError::InventoryFull { capacity: 1 });
}

#[test]
fn test_movement_is_buffered_and_clamped() {
    let mut player = Player::new(0.0, 5, Position::new(0.0, 0.0), 40.0);
    let bounds = MoveBounds {
        max_x: 760.0,
        max_y: 560.0,
        step: 40.0,
    };

    assert!(!player.apply_input(bounds), "No input buffered yet");

    player.queue_move(Direction::LEFT);
    player.queue_move(Direction::RIGHT);
    assert!(player.apply_input(bounds));
    assert_eq!(player.target, Position::new(40.0, 0.0), "Newest input wins");

    player.advance(0.125, 160.0);
    assert_eq!(player.position, Position::new(20.0, 0.0));
    assert!(player.is_moving());
    player.advance(1.0, 160.0);
    assert_eq!(player.position, Position::new(40.0, 0.0));
    assert!(!player.is_moving());

    player.queue_move(Direction::UP);
    player.apply_input(bounds);
    assert_eq!(player.target, Position::new(40.0, 0.0), "Clamped at the top edge");
}

#[test]
fn test_player_tile_uses_center() {
    let player = player_with(0.0, 5);
    assert_eq!(player.center(), Position::new(140.0, 140.0));
    assert_eq!(player.tile(40.0), TilePos::new(3, 3));
}
