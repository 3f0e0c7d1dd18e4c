pub mod lead;
pub mod property;
pub mod user;

pub use lead::{Lead, LeadStatus, NewLead};
pub use property::{Condition, Facing, Listing, NewProperty, Property};
pub use user::User;
