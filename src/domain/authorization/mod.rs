//! Authorization module - role/team based access control for items.
//!
//! The engine functions are pure: no I/O, no shared state. Business
//! validation phases call them and report denials as validation errors.

mod decision;
mod engine;

pub use decision::AccessDecision;
pub use engine::{
    access_reason, can_access, can_access_team, can_modify, is_valid_team_assignment,
    AccessAction, AccessReason,
};
