//! Blueprint entity model.
//!
//! Ties the lower crates together: an [`entity::Entity`] carries its
//! geometry, tables, condition and parameter blocks; a
//! [`blueprint::Blueprint`] owns entities and tiles together with the
//! placement grid and the wire graph, and converts the whole set to and
//! from the game's JSON schema.

pub mod blueprint;
pub mod entity;
pub mod export;
pub mod params;
pub mod tile;

pub use blueprint::{Blueprint, BlueprintError, ExportError, PlacementError};
pub use entity::{DirectionType, Entity, ItemStack};
pub use params::{AlertParameters, CircuitParameters, SpeakerParameters};
pub use tile::Tile;
