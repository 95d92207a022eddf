//! Component layer over an abstract rendering surface.
//!
//! # Responsibility
//! - Define the surface contract and an in-memory implementation.
//! - Implement the form, list and item components and wire them together.
//!
//! # Invariants
//! - Components only talk to markup through `RenderSurface`.
//! - Event handlers capture what they need by value (cloned handles), never a
//!   back-reference to the component.

pub mod board;
pub mod component;
pub mod dom;
pub mod event;
pub mod project_input;
pub mod project_item;
pub mod project_list;
pub mod surface;
