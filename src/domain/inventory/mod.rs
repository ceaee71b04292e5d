// Kitchen inventory domain
// Quantities, stored items, and the pure add/remove rules

pub mod kitchen;
pub mod pantry;
pub mod quantity;

pub use kitchen::{InventoryItem, KitchenInventory, RequestedItem};
pub use pantry::{AddOutcome, Pantry, RemoveOutcome};
pub use quantity::{Quantity, QuantityError, Unit};
