// Inventory client: talks to the exhibition search endpoint.

pub mod http;
pub mod traits;

pub use http::{CasperClient, SessionConfig};
pub use traits::InventoryClient;
