//! Item Service - request pipeline and access control core.
//!
//! This crate implements the reusable core of a shared-items backend:
//! a multi-phase service pipeline with aggregated validation reporting,
//! and a role/team-based authorization engine deciding who may read or
//! write an item.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
