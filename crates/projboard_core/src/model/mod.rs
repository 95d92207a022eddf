//! Project domain model.
//!
//! # Responsibility
//! - Define the data shape shared by the store and every component.
//!
//! # Invariants
//! - Every project is identified by a stable `ProjectId`.
//! - Projects are never deleted; only their status changes.

pub mod project;
