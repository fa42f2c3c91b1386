//! Storage Adapters
//!
//! Implementations of the `ItemRepository` port.
//!
//! ## Available Adapters
//!
//! - **InMemoryItemRepository** - Stores items in memory (testing/development)

mod in_memory_item_repository;

pub use in_memory_item_repository::InMemoryItemRepository;
