//! Expense line items.

mod item;

pub use item::{LineItem, DEFAULT_RATE};
