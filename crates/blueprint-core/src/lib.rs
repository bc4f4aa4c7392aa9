//! Blueprint Core -- shared vocabulary for the blueprint entity model.
//!
//! This crate holds the pieces every other blueprint crate agrees on:
//!
//! - [`id`] -- arena handles for entities, tiles and wires, plus the 1-based
//!   [`id::ExportId`] used by the external schema.
//! - [`geometry`] -- [`geometry::Position`], [`geometry::Size`] and the
//!   8-way [`geometry::Direction`] with its axis-parity rule.
//! - [`catalog`] -- the read-only [`catalog::EntityCatalog`] of dimensions,
//!   capability flags and signal types, and the [`catalog::Capabilities`]
//!   record entities capture from it once.
//! - [`names`] -- the [`names::NameCanonicalizer`] policy between hyphenated
//!   external names and underscored canonical names.
//! - [`error`] -- capability, validation and schema errors.

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod id;
pub mod names;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
