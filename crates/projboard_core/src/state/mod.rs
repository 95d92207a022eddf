//! Application state container.
//!
//! # Responsibility
//! - Hold the single project sequence shared by all components.
//! - Notify subscribers with snapshots after every mutation.
//!
//! # See also
//! - `ui::board` for where the one store instance is constructed.

pub mod project_state;
