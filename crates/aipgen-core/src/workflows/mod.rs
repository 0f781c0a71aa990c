//! # Workflows Module
//!
//! High-level entry points that tie the typing, surface and engine layers
//! together for one molecule.
//!
//! - **Footprint Workflow** ([`footprint`]) - Atom typing, per-atom AIP extraction
//!   and tight-surface statistics in a single call.

pub mod footprint;

#[cfg(test)]
pub(crate) mod fixtures;
