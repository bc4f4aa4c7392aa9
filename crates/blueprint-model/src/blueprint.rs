//! The owning arena for entities and tiles.
//!
//! Entities never hold references to each other. They live in a `SlotMap`
//! and are named by [`EntityId`]; the placement grid and the wire graph
//! store those handles. Bulk imports run in two phases: every entity is
//! constructed first, then each one is placed and its raw connections are
//! resolved against the full batch.

use blueprint_core::error::{EntityError, SchemaError, ValidationError};
use blueprint_core::geometry::{Direction, Position};
use blueprint_core::id::{EntityId, ExportId, TileId, WireId};
use blueprint_core::names::Lookup;
use blueprint_data::schema::{
    BlueprintData, ConnectionPointData, ConnectionSideData, ConnectionsData, EntityData, TileData,
};
use blueprint_logic::graph::{Connection, ConnectionGraph, WireEnd};
use blueprint_logic::wire::{Side, SideSpec, WireColor};
use blueprint_spatial::{PlacementGrid, SpatialError, may_coexist};
use slotmap::SlotMap;

use crate::entity::Entity;
use crate::tile::Tile;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while placing an entity and resolving its wires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),
    #[error("entity {0:?} is already placed")]
    AlreadyPlaced(EntityId),
    #[error("entity {0:?} would reach off the map")]
    OutOfBounds(EntityId),
    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// Errors raised while writing the external representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),
    #[error("tile not found: {0:?}")]
    TileNotFound(TileId),
    #[error("'{entity}' is wired to '{peer}', which has no export id; call assign_ids first")]
    UnassignedPeer { entity: String, peer: String },
}

/// Any failure of a whole-blueprint operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlueprintError {
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

// ---------------------------------------------------------------------------
// Blueprint
// ---------------------------------------------------------------------------

/// Entities, tiles, their placement grid and their wires.
pub struct Blueprint<'a> {
    lookup: Lookup<'a>,
    entities: SlotMap<EntityId, Entity>,
    /// Insertion order; export numbers follow it.
    entity_order: Vec<EntityId>,
    tiles: SlotMap<TileId, Tile>,
    tile_order: Vec<TileId>,
    grid: PlacementGrid,
    wires: ConnectionGraph,
}

impl<'a> Blueprint<'a> {
    pub fn new(lookup: Lookup<'a>) -> Self {
        Self {
            lookup,
            entities: SlotMap::with_key(),
            entity_order: Vec::new(),
            tiles: SlotMap::with_key(),
            tile_order: Vec::new(),
            grid: PlacementGrid::new(),
            wires: ConnectionGraph::new(),
        }
    }

    /// Build a blueprint from its external form. Positions are read in the
    /// game's center convention.
    pub fn from_data(data: &BlueprintData, lookup: Lookup<'a>) -> Result<Self, BlueprintError> {
        let mut bp = Self::new(lookup);
        bp.import(data, true)?;
        Ok(bp)
    }

    pub fn lookup(&self) -> Lookup<'a> {
        self.lookup
    }

    // -- Import --

    /// Add every entity and tile of `data`. Entities are all constructed
    /// before any is placed, so connections may refer forward.
    pub fn import(&mut self, data: &BlueprintData, center: bool) -> Result<Vec<EntityId>, BlueprintError> {
        let mut batch = Vec::with_capacity(data.entities.len());
        for raw in &data.entities {
            batch.push(self.add_entity(raw, center)?);
        }
        for &id in &batch {
            self.place(id, &batch)?;
        }
        for raw in &data.tiles {
            self.add_tile(raw)?;
        }
        log::debug!(
            "imported {} entities, {} tiles, {} wires",
            batch.len(),
            data.tiles.len(),
            self.wires.wire_count()
        );
        Ok(batch)
    }

    /// Construct an entity from external data without placing it.
    pub fn add_entity(&mut self, data: &EntityData, center: bool) -> Result<EntityId, EntityError> {
        let entity = Entity::from_data(data, self.lookup, center)?;
        Ok(self.insert_entity(entity))
    }

    /// Take ownership of an entity without placing it.
    pub fn insert_entity(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        self.entity_order.push(id);
        id
    }

    /// Put an entity on the grid and resolve its raw connections. Raw
    /// `entity_id`s are 1-based positions in `batch`.
    ///
    /// Every connection is resolved before anything changes, so a failure
    /// leaves the entity unplaced with its raw connections intact.
    pub fn place(&mut self, id: EntityId, batch: &[EntityId]) -> Result<(), PlacementError> {
        let entity = self.get(id)?;
        if self.grid.is_placed(id) {
            return Err(PlacementError::AlreadyPlaced(id));
        }
        let halves = match &entity.raw_connections {
            Some(raw) => self.resolve_connections(id, raw, batch)?,
            None => Vec::new(),
        };
        let footprint = entity.footprint();
        self.grid.place(id, footprint).map_err(|e| match e {
            SpatialError::OutOfBounds => PlacementError::OutOfBounds(id),
            SpatialError::AlreadyPlaced | SpatialError::NotPlaced => PlacementError::AlreadyPlaced(id),
        })?;
        if let Some(entity) = self.entities.get_mut(id) {
            entity.raw_connections = None;
        }
        log::trace!("placed {:?} at ({}, {})", id, footprint.top_left.x, footprint.top_left.y);

        for (local, remote, color) in halves {
            self.wires.attach_half(local, remote, color);
        }
        Ok(())
    }

    /// Turn raw connection points into wire halves without touching the
    /// graph.
    fn resolve_connections(
        &self,
        id: EntityId,
        raw: &ConnectionsData,
        batch: &[EntityId],
    ) -> Result<Vec<(WireEnd, WireEnd, WireColor)>, EntityError> {
        let mut halves = Vec::new();
        for (key, side_data) in raw {
            let Ok(number) = key.parse::<u8>() else {
                log::warn!("skipping non-circuit connection point '{key}'");
                continue;
            };
            let side = Side::from_number(number)
                .ok_or_else(|| ValidationError::InvalidSide(key.clone()))?;

            let colored = [
                (WireColor::Red, side_data.red.as_deref()),
                (WireColor::Green, side_data.green.as_deref()),
            ];
            for (color, points) in colored {
                for point in points.unwrap_or_default() {
                    let peer = usize::try_from(point.entity_id)
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| batch.get(i).copied())
                        .filter(|&p| self.entities.contains_key(p))
                        .ok_or(SchemaError::DanglingConnection(point.entity_id))?;
                    let peer_side = match point.circuit_id {
                        None => Side::One,
                        Some(n) => Side::from_number(n).ok_or_else(|| {
                            ValidationError::InvalidSide(n.to_string())
                        })?,
                    };
                    halves.push((
                        WireEnd::new(id, side, point.circuit_id.is_some()),
                        WireEnd::new(peer, peer_side, false),
                        color,
                    ));
                }
            }
        }
        Ok(halves)
    }

    // -- Removal --

    /// Detach an entity from the grid, cut its wires and drop it.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        // Unplaced entities have nothing on the grid.
        self.grid.remove(id).ok();
        let cut = self.wires.disconnect_entity(id);
        self.entity_order.retain(|&e| e != id);
        log::debug!("removed '{}' ({cut} wires cut)", entity.name());
        Some(entity)
    }

    pub fn add_tile(&mut self, data: &TileData) -> Result<TileId, EntityError> {
        let tile = Tile::from_data(data, self.lookup.names)?;
        Ok(self.insert_tile(tile))
    }

    pub fn insert_tile(&mut self, tile: Tile) -> TileId {
        let id = self.tiles.insert(tile);
        self.tile_order.push(id);
        id
    }

    pub fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(id)?;
        self.tile_order.retain(|&t| t != id);
        Some(tile)
    }

    // -- Geometry --

    /// Turn an entity, keeping the grid in step with its new footprint.
    pub fn rotate(&mut self, id: EntityId, direction: Direction) -> Result<(), PlacementError> {
        self.regrid(id, |e| e.set_direction(direction))
    }

    /// Move an entity's top-left corner, keeping the grid in step.
    pub fn move_entity(&mut self, id: EntityId, position: Position) -> Result<(), PlacementError> {
        self.regrid(id, |e| e.set_position(position))
    }

    /// Apply a geometry change and move the entity's tiles with it. A change
    /// that would put the entity off the map is undone.
    fn regrid(&mut self, id: EntityId, change: impl FnOnce(&mut Entity)) -> Result<(), PlacementError> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(PlacementError::EntityNotFound(id))?;
        let (position, direction) = (entity.top_left(), entity.direction());
        change(entity);
        if !entity.footprint().in_bounds() {
            entity.set_direction(direction);
            entity.set_position(position);
            return Err(PlacementError::OutOfBounds(id));
        }
        if self.grid.remove(id).is_ok() {
            self.grid
                .place(id, entity.footprint())
                .map_err(|_| PlacementError::AlreadyPlaced(id))?;
        }
        Ok(())
    }

    /// The first other entity sharing a tile with `id`.
    pub fn overlap(&self, id: EntityId) -> Option<EntityId> {
        self.overlapping(id).next()
    }

    /// True when nothing else covers the entity's tiles, or everything that
    /// does is a gate/straight-rail partner.
    pub fn is_clear(&self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get(id) else {
            return false;
        };
        self.overlapping(id).all(|other| {
            self.entities
                .get(other)
                .is_some_and(|o| may_coexist(entity.name(), o.name()))
        })
    }

    fn overlapping(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        let found = self
            .entities
            .get(id)
            .map(|e| self.grid.overlaps(e.footprint()))
            .unwrap_or_default();
        found.into_iter().filter(move |&other| other != id)
    }

    pub fn is_placed(&self, id: EntityId) -> bool {
        self.grid.is_placed(id)
    }

    // -- Wiring --

    /// Wire two entities. Sides may be numeric or `"in"` / `"out"`; the
    /// latter only reaches side 2 on dual-terminal combinators. Colors may
    /// be given as tokens, where anything but `"green"` means red.
    pub fn connect(
        &mut self,
        a: EntityId,
        b: EntityId,
        side_a: impl Into<SideSpec>,
        side_b: impl Into<SideSpec>,
        color: impl Into<WireColor>,
    ) -> Result<WireId, BlueprintError> {
        let (end_a, end_b) = self.ends(a, b, side_a.into(), side_b.into())?;
        Ok(self.wires.connect(end_a, end_b, color.into()))
    }

    /// Remove one wire matching sides and color exactly.
    pub fn disconnect(
        &mut self,
        a: EntityId,
        b: EntityId,
        side_a: impl Into<SideSpec>,
        side_b: impl Into<SideSpec>,
        color: impl Into<WireColor>,
    ) -> Result<Option<WireId>, BlueprintError> {
        let (end_a, end_b) = self.ends(a, b, side_a.into(), side_b.into())?;
        Ok(self.wires.disconnect(a, end_a.side, b, end_b.side, color.into()))
    }

    /// Remove every wire between `a` and `b`, optionally of one color only.
    pub fn disconnect_all(&mut self, a: EntityId, b: EntityId, color: Option<WireColor>) -> usize {
        self.wires.disconnect_all(a, b, color)
    }

    pub fn disconnect_entity(&mut self, id: EntityId) -> usize {
        self.wires.disconnect_entity(id)
    }

    pub fn connections(&self, id: EntityId) -> Vec<Connection> {
        self.wires.connections(id)
    }

    fn ends(
        &self,
        a: EntityId,
        b: EntityId,
        side_a: SideSpec,
        side_b: SideSpec,
    ) -> Result<(WireEnd, WireEnd), BlueprintError> {
        let kind_a = self.get(a)?.kind();
        let kind_b = self.get(b)?.kind();
        let sa = side_a.resolve(kind_a.is_dual_terminal()).map_err(EntityError::from)?;
        let sb = side_b.resolve(kind_b.is_dual_terminal()).map_err(EntityError::from)?;
        Ok((
            WireEnd::new(a, sa, kind_b.is_dual_terminal()),
            WireEnd::new(b, sb, kind_a.is_dual_terminal()),
        ))
    }

    fn get(&self, id: EntityId) -> Result<&Entity, PlacementError> {
        self.entities.get(id).ok_or(PlacementError::EntityNotFound(id))
    }

    // -- Access --

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutable access for attribute setters. Use [`Self::rotate`] and
    /// [`Self::move_entity`] for geometry changes on placed entities.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entity_order.iter().map(|&id| (id, &self.entities[id]))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tile_order.iter().map(|&id| (id, &self.tiles[id]))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.wire_count()
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    // -- Export --

    /// Number entities and tiles 1.. in insertion order.
    pub fn assign_ids(&mut self) {
        for (n, &id) in (1u32..).zip(&self.entity_order) {
            self.entities[id].export_id = Some(ExportId(n));
        }
        for (n, &id) in (1u32..).zip(&self.tile_order) {
            self.tiles[id].export_id = Some(ExportId(n));
        }
    }

    /// One entity in external form. Every wired peer must have an id.
    pub fn entity_data(&self, id: EntityId) -> Result<EntityData, ExportError> {
        let entity = self.entities.get(id).ok_or(ExportError::EntityNotFound(id))?;

        let mut map = ConnectionsData::new();
        for conn in self.wires.connections(id) {
            let peer = &self.entities[conn.peer];
            let peer_id = peer.export_id().ok_or_else(|| ExportError::UnassignedPeer {
                entity: entity.name().to_string(),
                peer: peer.name().to_string(),
            })?;
            let side: &mut ConnectionSideData = map.entry(conn.side.key().to_string()).or_default();
            let list = match conn.color {
                WireColor::Red => &mut side.red,
                WireColor::Green => &mut side.green,
            };
            list.get_or_insert_with(Vec::new).push(ConnectionPointData {
                entity_id: peer_id.0,
                circuit_id: conn.circuit_id.map(Side::number),
            });
        }

        Ok(entity.to_data(Some(map), self.lookup))
    }

    pub fn tile_data(&self, id: TileId) -> Result<TileData, ExportError> {
        self.tiles
            .get(id)
            .map(|t| t.to_data(self.lookup.names))
            .ok_or(ExportError::TileNotFound(id))
    }

    /// Assign ids, then write every entity and tile.
    pub fn to_data(&mut self) -> Result<BlueprintData, ExportError> {
        self.assign_ids();
        let entities = self
            .entity_order
            .iter()
            .map(|&id| self.entity_data(id))
            .collect::<Result<Vec<_>, _>>()?;
        let tiles = self
            .tile_order
            .iter()
            .map(|&id| self.tile_data(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BlueprintData { entities, tiles })
    }
}

impl std::fmt::Debug for Blueprint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("entities", &self.entities.len())
            .field("tiles", &self.tiles.len())
            .field("wires", &self.wires.wire_count())
            .finish()
    }
}
