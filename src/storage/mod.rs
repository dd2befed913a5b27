//! Sheet persistence.

mod json_store;

pub use json_store::{validate_sheet_name, JsonStore, SHEET_EXTENSION};
