//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Item repository implementations (in-memory)
//! - `directory` - Directory lookup implementations (in-memory, config-seeded)

pub mod directory;
pub mod storage;

pub use directory::InMemoryDirectory;
pub use storage::InMemoryItemRepository;
