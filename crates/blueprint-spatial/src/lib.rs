//! Placement grid for blueprint entities.
//!
//! Provides a sparse 2D index from integer tile coordinates to the entities
//! covering them, with overlap queries used before placement. Entities use
//! continuous top-left positions; [`Footprint`] turns such a box into the
//! integer tiles it covers.

use blueprint_core::geometry::{MAX_COORDINATE, Position, Size};
use blueprint_core::id::EntityId;
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An integer tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    /// A tile from its integer coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Slack subtracted from the far edge so exact integer extents do not
/// spill into the next tile.
const FAR_EDGE_SLACK: f64 = 0.9;

/// Clamp a whole-numbered coordinate into the map and convert it to a tile
/// index. NaN lands on 0.
fn tile_index(v: f64) -> i32 {
    v.clamp(-MAX_COORDINATE, MAX_COORDINATE) as i32
}

/// The axis-aligned box an entity occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub top_left: Position,
    pub size: Size,
}

impl Footprint {
    pub fn new(top_left: Position, size: Size) -> Self {
        Self { top_left, size }
    }

    /// The far corner: `top_left` plus the full extent.
    pub fn bottom_right(&self) -> Position {
        self.top_left.offset_by(self.size, 1.0, 1.0)
    }

    /// Whether both corners lie on the map.
    pub fn in_bounds(&self) -> bool {
        self.top_left.in_bounds() && self.bottom_right().in_bounds()
    }

    /// Iterate over every tile this box covers: starting at the floor of the
    /// top-left corner and stopping before `bottom_right - 0.9` on each axis.
    ///
    /// Coordinates are clamped to the map, so the walk stays bounded even
    /// for a box that is not [`in_bounds`](Self::in_bounds).
    pub fn tiles(&self) -> impl Iterator<Item = TilePos> {
        let end = self.bottom_right();
        let xs = tile_index(self.top_left.x.floor())..tile_index((end.x - FAR_EDGE_SLACK).ceil());
        let ys = tile_index(self.top_left.y.floor())..tile_index((end.y - FAR_EDGE_SLACK).ceil());
        xs.flat_map(move |x| ys.clone().map(move |y| TilePos::new(x, y)))
    }
}

/// Errors from grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpatialError {
    #[error("entity is not placed on the grid")]
    NotPlaced,
    #[error("entity is already placed on the grid")]
    AlreadyPlaced,
    #[error("footprint lies outside the map")]
    OutOfBounds,
}

/// Entity pairs allowed to share tiles: a gate may sit on a straight rail.
pub fn may_coexist(a: &str, b: &str) -> bool {
    matches!(
        (a, b),
        ("gate", "straight_rail") | ("straight_rail", "gate")
    )
}

// ---------------------------------------------------------------------------
// PlacementGrid
// ---------------------------------------------------------------------------

/// Sparse map from tile to the entities covering it.
///
/// Tiles normally hold a single occupant; coexisting pairs (see
/// [`may_coexist`]) stack in placement order. Entries are entity handles,
/// never copies.
#[derive(Debug, Default)]
pub struct PlacementGrid {
    tiles: BTreeMap<TilePos, Vec<EntityId>>,
    footprints: SecondaryMap<EntityId, Footprint>,
}

impl PlacementGrid {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Placement --

    /// Mark every tile covered by `footprint` as occupied by `entity`.
    ///
    /// Does not check for overlap; callers consult [`Self::overlap`] first.
    /// Footprints reaching off the map are refused.
    pub fn place(&mut self, entity: EntityId, footprint: Footprint) -> Result<(), SpatialError> {
        if self.footprints.contains_key(entity) {
            return Err(SpatialError::AlreadyPlaced);
        }
        if !footprint.in_bounds() {
            return Err(SpatialError::OutOfBounds);
        }
        for tile in footprint.tiles() {
            log::trace!("tile ({}, {}) <- {entity:?}", tile.x, tile.y);
            self.tiles.entry(tile).or_default().push(entity);
        }
        self.footprints.insert(entity, footprint);
        Ok(())
    }

    /// Clear the tiles held by `entity`. Returns the footprint it occupied.
    pub fn remove(&mut self, entity: EntityId) -> Result<Footprint, SpatialError> {
        let footprint = self
            .footprints
            .remove(entity)
            .ok_or(SpatialError::NotPlaced)?;
        for tile in footprint.tiles() {
            if let Some(occupants) = self.tiles.get_mut(&tile) {
                occupants.retain(|&e| e != entity);
                if occupants.is_empty() {
                    self.tiles.remove(&tile);
                }
            }
        }
        Ok(footprint)
    }

    // -- Queries --

    /// The first entity (in tile order) already covering any tile of `footprint`.
    pub fn overlap(&self, footprint: Footprint) -> Option<EntityId> {
        self.overlaps(footprint).into_iter().next()
    }

    /// Every distinct entity covering any tile of `footprint`, in tile order.
    pub fn overlaps(&self, footprint: Footprint) -> Vec<EntityId> {
        let mut found = Vec::new();
        for tile in footprint.tiles() {
            for &occupant in self.tiles.get(&tile).into_iter().flatten() {
                if !found.contains(&occupant) {
                    found.push(occupant);
                }
            }
        }
        found
    }

    /// The first entity placed on a tile.
    pub fn entity_at(&self, tile: TilePos) -> Option<EntityId> {
        self.tiles.get(&tile).and_then(|v| v.first().copied())
    }

    /// All entities stacked on a tile.
    pub fn occupants(&self, tile: TilePos) -> &[EntityId] {
        self.tiles.get(&tile).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any entity covers `tile`.
    pub fn is_occupied(&self, tile: TilePos) -> bool {
        self.tiles.contains_key(&tile)
    }

    /// Whether `entity` currently holds tiles on this grid.
    pub fn is_placed(&self, entity: EntityId) -> bool {
        self.footprints.contains_key(entity)
    }

    /// The footprint `entity` was placed with.
    pub fn footprint(&self, entity: EntityId) -> Option<Footprint> {
        self.footprints.get(entity).copied()
    }

    // -- Stats --

    /// Number of entities placed on the grid.
    pub fn entity_count(&self) -> usize {
        self.footprints.len()
    }

    /// Number of occupied tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}
