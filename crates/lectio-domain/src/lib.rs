//! Domain types shared across Lectio crates.
//!
//! Pure types with no framework dependencies.

pub mod id;
pub mod pagination;
