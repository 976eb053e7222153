//! Shopping cart domain module.
//!
//! A cart belongs to exactly one session and lives as long as its owner keeps
//! it; there is no process-wide cart.

pub mod cart;

pub use cart::{Cart, CartLine, Subtotal};
