//! Error taxonomy for the simulation
//!
//! Every failure is recoverable. Component methods return `SimError`, and the
//! session turns it into a `CommandResult` at the command boundary.

use serde::Serialize;
use thiserror::Error;

use super::types::{CustomerId, SlotId};

/// Coarse classification reported to front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed command arguments
    InvalidInput,
    /// The world is not in a state that allows the action
    PreconditionFailed,
    /// A bounded container (farm plot, inventory) is full
    CapacityExceeded,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("slot {slot} is outside the farm")]
    InvalidSlot { slot: SlotId },

    #[error("slot {slot} is not tilled")]
    NotTilled { slot: SlotId },

    #[error("slot {slot} already has a crop")]
    SlotOccupied { slot: SlotId },

    #[error("slot {slot} has no crop")]
    SlotEmpty { slot: SlotId },

    #[error("slot {slot} is too far away")]
    OutOfReach { slot: SlotId },

    #[error("{crop} is not ready to harvest yet")]
    NotReady { crop: String },

    #[error("no available plots (capacity {capacity})")]
    FarmFull { capacity: usize },

    #[error("inventory is full (capacity {capacity})")]
    InventoryFull { capacity: usize },

    #[error("not enough money: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("unknown crop '{0}'")]
    UnknownCrop(String),

    #[error("item '{0}' not found in the shop")]
    UnknownItem(String),

    #[error("unknown recipe '{0}'")]
    UnknownRecipe(String),

    #[error("missing ingredient: {0}")]
    MissingIngredient(String),

    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("customer {0} has already left")]
    CustomerGone(CustomerId),

    #[error("customer {0} is already seated")]
    DuplicateCustomer(CustomerId),

    #[error("customer {customer} did not order {recipe}")]
    NotOrdered { customer: CustomerId, recipe: String },
}

impl SimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::InvalidInput(_) | SimError::UnknownCommand(_) | SimError::InvalidSlot { .. } => {
                ErrorKind::InvalidInput
            }
            SimError::FarmFull { .. } | SimError::InventoryFull { .. } => {
                ErrorKind::CapacityExceeded
            }
            SimError::NotTilled { .. }
            | SimError::SlotOccupied { .. }
            | SimError::SlotEmpty { .. }
            | SimError::OutOfReach { .. }
            | SimError::NotReady { .. }
            | SimError::InsufficientFunds { .. }
            | SimError::UnknownCrop(_)
            | SimError::UnknownItem(_)
            | SimError::UnknownRecipe(_)
            | SimError::MissingIngredient(_)
            | SimError::CustomerNotFound(_)
            | SimError::CustomerGone(_)
            | SimError::DuplicateCustomer(_)
            | SimError::NotOrdered { .. } => ErrorKind::PreconditionFailed,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        SimError::InvalidInput(message.into())
    }
}

pub type SimResult<T> = std::result::Result<T, SimError>;
