pub mod lead_store;
pub mod manager;
pub mod models;
pub mod property_store;

pub use lead_store::LeadStore;
pub use manager::{DatabaseError, DatabaseManager};
pub use property_store::PropertyStore;
