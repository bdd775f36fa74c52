//! Domain model for quiz projects and their ordered items.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Express per-type item content as a closed sum type.
//!
//! # Invariants
//! - Every item belongs to exactly one project.
//! - An `ItemContent` value can only be produced by the content validator,
//!   so an item's content always matches its own type tag.

pub mod content;
pub mod item;
pub mod project;
