pub mod catalog;
pub mod roster;

pub use catalog::{CatalogRepository, SurrealCatalogRepository};
pub use roster::{RosterRepository, SurrealRosterRepository};
