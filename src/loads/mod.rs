pub mod category;
pub mod types;

pub use category::LoadCategory;
pub use types::{CircuitLoad, LoadType, Location, Supply, SupplyType};
