pub mod config;
pub mod inventory;
pub mod types;
pub mod units;

pub use config::Settings;
pub use inventory::{Inventory, InventoryError};
pub use types::*;
pub use units::UnitError;
