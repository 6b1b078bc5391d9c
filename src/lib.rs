//! Spritemod - sprite substitution and recoloring for SVG animation frames
//!
//! This library provides functionality to:
//! - Resolve named sprites to their mutable path containers, through
//!   `<use>` indirection when needed
//! - Substitute replacement geometry while preserving placement attributes
//! - Extract and globally rewrite color tokens
//! - Snapshot and reapply per-path attribute edits across substitutions
//! - Coordinate first-write backups and recursive restores per collection

pub mod backup;
pub mod classify;
pub mod cli;
pub mod color;
pub mod dom;
pub mod engine;
pub mod frames;
pub mod recolor;
pub mod resolver;
pub mod snapshot;
pub mod substitute;
