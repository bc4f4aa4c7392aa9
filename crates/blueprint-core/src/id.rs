use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies an entity (placed building) inside a blueprint arena.
    pub struct EntityId;

    /// Identifies a floor tile inside a blueprint arena.
    pub struct TileId;

    /// Identifies a wire (circuit connection) in the connection graph.
    pub struct WireId;
}

/// The 1-based number an entity carries in the external schema
/// (`entity_number`, and `entity_id` inside connection lists).
///
/// Assigned by the owning blueprint right before export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExportId(pub u32);
