//! Output formatting module

pub mod formatter;
pub mod human;
pub mod ini;
pub mod json;
pub mod yaml;

pub use formatter::{format_inventory, InventoryFormat};
pub use yaml::to_yaml;
