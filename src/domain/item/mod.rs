//! Item module - owned records protected by the authorization engine.

mod access_level;
#[allow(clippy::module_inception)]
mod item;

pub use access_level::AccessLevel;
pub use item::{Item, ItemDraft};
