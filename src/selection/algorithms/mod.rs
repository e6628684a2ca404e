//! Selection algorithms
//!
//! Three independent solvers over the same group pool. Branch-and-bound
//! hunts for a changeless exact match, single random draw trades waste for
//! unlinkability, and knapsack approximates a subset that funds the target
//! plus a healthy change output. Callers run any combination and compare
//! the results by waste.

pub mod bnb;
pub mod knapsack;
pub mod srd;

pub use bnb::{select_coins_bnb, TOTAL_TRIES};
pub use knapsack::{select_coins_knapsack, ITERATIONS};
pub use srd::select_coins_srd;
