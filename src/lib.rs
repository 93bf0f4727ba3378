//! Farm and Diner Simulation Library
//!
//! A farming and restaurant simulation core that runs headless or behind any
//! front end that can issue commands and draw snapshots.

pub mod simulation;
