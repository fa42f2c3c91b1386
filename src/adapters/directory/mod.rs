//! Directory adapters - implementations of the `DirectoryLookup` port.

mod in_memory_directory;

pub use in_memory_directory::InMemoryDirectory;
