//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, claims)
//! - `validation` - Aggregatable validation results
//! - `user` - Callers, roles and team memberships
//! - `item` - Owned records and their visibility
//! - `authorization` - Read/modify decisions over (user, item) pairs

pub mod authorization;
pub mod foundation;
pub mod item;
pub mod user;
pub mod validation;
