//! User module - callers, roles and team memberships.

mod role;
#[allow(clippy::module_inception)]
mod user;

pub use role::Role;
pub use user::User;
