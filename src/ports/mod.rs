//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ItemRepository` - Storage collaborator for items
//! - `DirectoryLookup` - Identity-to-role/team collaborator

mod directory_lookup;
mod item_repository;

pub use directory_lookup::{DirectoryEntry, DirectoryLookup};
pub use item_repository::{ItemQuery, ItemRepository, SortOrder};
