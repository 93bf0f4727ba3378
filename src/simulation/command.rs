//! Commands accepted from the front end and their structured results
//!
//! Text parsing lives here too so that any line-based front end (console,
//! script file, test) speaks the same grammar.

use serde::Serialize;
use std::str::FromStr;

use super::error::{ErrorKind, SimError};
use super::types::{CustomerId, Direction, SlotId};

/// Which crops a harvest command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestTarget {
    Slot(SlotId),
    /// Every ready crop in reach
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Till a slot, or the tile under the player when `None`
    Till { slot: Option<SlotId> },
    Plant { slot: Option<SlotId>, crop: String },
    Harvest(HarvestTarget),
    Buy { item: String, quantity: u32 },
    Serve {
        customer: CustomerId,
        recipe: String,
        ingredients: Vec<String>,
    },
    Move(Direction),
    /// List planted crops and their growth
    Farm,
    /// Show money and inventory
    Player,
    /// List waiting customers and their orders
    Customers,
    Help,
    Quit,
}

impl Command {
    /// Whether the command changes simulation state
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Command::Farm | Command::Player | Command::Customers | Command::Help | Command::Quit
        )
    }
}

/// Outcome of a command, reported instead of performing I/O
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub ok: bool,
    pub message: String,
    pub error: Option<ErrorKind>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(error: &SimError) -> Self {
        Self {
            ok: false,
            message: error.to_string(),
            error: Some(error.kind()),
        }
    }

    /// A failure that is not a `SimError`, such as a partially completed harvest
    pub fn partial(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            ok: false,
            message: message.into(),
            error: Some(kind),
        }
    }

    pub fn from_result(result: Result<String, SimError>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(error) => Self::failure(&error),
        }
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  till [slot]                         Till a slot (default: tile under the player)
  plant [slot] <crop>                 Plant a crop on a tilled slot
  harvest [slot|all]                  Harvest one slot or every ready crop in reach
  buy <item> <quantity>               Buy items from the shop
  serve <customer> <recipe> <items..> Serve a dish made of the listed ingredients
  move <up|down|left|right>           Walk one tile (also w/a/s/d)
  farm                                Show farm status
  player                              Show money and inventory
  customers                           Show waiting customers
  help                                Show this help
  quit                                Quit the game";

fn parse_number<T: FromStr>(text: &str, what: &str) -> Result<T, SimError> {
    text.parse()
        .map_err(|_| SimError::invalid(format!("'{}' is not a valid {}", text, what)))
}

fn parse_direction(text: &str) -> Result<Direction, SimError> {
    match text.to_ascii_lowercase().as_str() {
        "up" | "w" | "north" => Ok(Direction::UP),
        "down" | "s" | "south" => Ok(Direction::DOWN),
        "left" | "a" | "west" => Ok(Direction::LEFT),
        "right" | "d" | "east" => Ok(Direction::RIGHT),
        other => Err(SimError::invalid(format!("unknown direction '{}'", other))),
    }
}

impl FromStr for Command {
    type Err = SimError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Err(SimError::invalid("empty command"));
        };
        let args: Vec<&str> = words.collect();

        match keyword.to_ascii_lowercase().as_str() {
            "till" => match args.as_slice() {
                [] => Ok(Command::Till { slot: None }),
                [slot] => Ok(Command::Till {
                    slot: Some(SlotId(parse_number(slot, "slot")?)),
                }),
                _ => Err(SimError::invalid("usage: till [slot]")),
            },
            "plant" => match args.as_slice() {
                [crop] => Ok(Command::Plant {
                    slot: None,
                    crop: crop.to_string(),
                }),
                [slot, crop] => Ok(Command::Plant {
                    slot: Some(SlotId(parse_number(slot, "slot")?)),
                    crop: crop.to_string(),
                }),
                _ => Err(SimError::invalid("usage: plant [slot] <crop>")),
            },
            "harvest" => match args.as_slice() {
                [] => Ok(Command::Harvest(HarvestTarget::All)),
                [target] if target.eq_ignore_ascii_case("all") => {
                    Ok(Command::Harvest(HarvestTarget::All))
                }
                [slot] => Ok(Command::Harvest(HarvestTarget::Slot(SlotId(parse_number(
                    slot, "slot",
                )?)))),
                _ => Err(SimError::invalid("usage: harvest [slot|all]")),
            },
            "buy" => match args.as_slice() {
                [item, quantity] => {
                    let quantity: u32 = parse_number(quantity, "item count")?;
                    if quantity == 0 {
                        return Err(SimError::invalid("quantity must be at least 1"));
                    }
                    Ok(Command::Buy {
                        item: item.to_string(),
                        quantity,
                    })
                }
                _ => Err(SimError::invalid("usage: buy <item> <quantity>")),
            },
            "serve" => match args.as_slice() {
                [customer, recipe, ingredients @ ..] => {
                    let ingredients: Vec<String> = ingredients
                        .iter()
                        .flat_map(|word| word.split(','))
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect();
                    Ok(Command::Serve {
                        customer: CustomerId(parse_number(customer, "customer id")?),
                        recipe: recipe.to_string(),
                        ingredients,
                    })
                }
                _ => Err(SimError::invalid(
                    "usage: serve <customer> <recipe> <ingredient>...",
                )),
            },
            "move" => match args.as_slice() {
                [direction] => Ok(Command::Move(parse_direction(direction)?)),
                _ => Err(SimError::invalid("usage: move <up|down|left|right>")),
            },
            "w" | "a" | "s" | "d" if args.is_empty() => Ok(Command::Move(parse_direction(keyword)?)),
            "farm" => Ok(Command::Farm),
            "player" | "inventory" => Ok(Command::Player),
            "customers" => Ok(Command::Customers),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(SimError::UnknownCommand(keyword.to_string())),
        }
    }
}
