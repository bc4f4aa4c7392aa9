//! Wire connection graph between entities.
//!
//! Every logical wire is stored exactly once in a `SlotMap`. Per-entity
//! adjacency lists only hold `(WireId, End)` references, so the two views
//! of a wire (from either entity) can never disagree.

use blueprint_core::id::{EntityId, WireId};
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

use crate::wire::{Side, WireColor};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One end of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnd {
    pub entity: EntityId,
    pub side: Side,
    /// Whether this end's connection record names the far side as its
    /// `circuit_id`. Set when the far entity is a dual-terminal combinator.
    pub reports_circuit_id: bool,
}

impl WireEnd {
    pub fn new(entity: EntityId, side: Side, reports_circuit_id: bool) -> Self {
        Self {
            entity,
            side,
            reports_circuit_id,
        }
    }

    fn same_terminal(&self, other: &WireEnd) -> bool {
        self.entity == other.entity && self.side == other.side
    }
}

/// Which end of a wire an adjacency entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum End {
    A,
    B,
}

impl End {
    fn flip(self) -> End {
        match self {
            End::A => End::B,
            End::B => End::A,
        }
    }
}

/// A single logical wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    pub a: WireEnd,
    pub b: WireEnd,
    pub color: WireColor,
    /// False while only one side of an imported wire has been seen.
    paired: bool,
}

impl Wire {
    pub fn end(&self, end: End) -> &WireEnd {
        match end {
            End::A => &self.a,
            End::B => &self.b,
        }
    }

    pub fn touches(&self, entity: EntityId) -> bool {
        self.a.entity == entity || self.b.entity == entity
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }
}

/// A wire as seen from one of its entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub wire: WireId,
    pub peer: EntityId,
    pub color: WireColor,
    /// The terminal on the viewing entity.
    pub side: Side,
    /// The terminal on the peer.
    pub peer_side: Side,
    /// The peer side as written into `circuit_id`, when recorded.
    pub circuit_id: Option<Side>,
}

// ---------------------------------------------------------------------------
// ConnectionGraph
// ---------------------------------------------------------------------------

/// Undirected multigraph of circuit wires.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    wires: SlotMap<WireId, Wire>,
    adjacency: SecondaryMap<EntityId, Vec<(WireId, End)>>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Mutation --

    /// Add a wire between two terminals. Parallel wires are allowed.
    pub fn connect(&mut self, a: WireEnd, b: WireEnd, color: WireColor) -> WireId {
        self.insert(Wire {
            a,
            b,
            color,
            paired: true,
        })
    }

    /// Record one half of an imported wire, as listed by `near`.
    ///
    /// The far entity usually lists the same wire from its side. If that
    /// mirror half was recorded first, the two halves are joined into the
    /// existing wire; otherwise a new wire is opened and waits for its
    /// mirror. Either way the wire is stored once.
    pub fn attach_half(&mut self, near: WireEnd, far: WireEnd, color: WireColor) -> WireId {
        let pending = self.adjacency.get(far.entity).and_then(|adj| {
            adj.iter().copied().find(|&(id, end)| {
                let wire = &self.wires[id];
                end == End::A
                    && !wire.paired
                    && wire.color == color
                    && wire.a.same_terminal(&far)
                    && wire.b.same_terminal(&near)
            })
        });

        if let Some((id, _)) = pending {
            let wire = &mut self.wires[id];
            wire.b.reports_circuit_id = near.reports_circuit_id;
            wire.paired = true;
            // Re-append so `near` lists its wires in the order it wrote them.
            if let Some(list) = self.adjacency.get_mut(near.entity) {
                if let Some(pos) = list.iter().position(|&e| e == (id, End::B)) {
                    let entry = list.remove(pos);
                    list.push(entry);
                }
            }
            return id;
        }

        self.insert(Wire {
            a: near,
            b: far,
            color,
            paired: false,
        })
    }

    /// Remove exactly one wire joining `(a, side_a)` to `(b, side_b)` in
    /// `color`: the first in `a`'s connection order.
    pub fn disconnect(
        &mut self,
        a: EntityId,
        side_a: Side,
        b: EntityId,
        side_b: Side,
        color: WireColor,
    ) -> Option<WireId> {
        let id = self
            .connections(a)
            .into_iter()
            .find(|c| c.peer == b && c.side == side_a && c.peer_side == side_b && c.color == color)
            .map(|c| c.wire)?;
        self.remove_wire(id);
        Some(id)
    }

    /// Remove every wire between `a` and `b`, optionally only of one color.
    /// Returns the number of wires removed.
    pub fn disconnect_all(&mut self, a: EntityId, b: EntityId, color: Option<WireColor>) -> usize {
        let doomed: Vec<WireId> = self
            .connections(a)
            .into_iter()
            .filter(|c| c.peer == b && color.is_none_or(|col| c.color == col))
            .map(|c| c.wire)
            .collect();
        let mut removed = 0;
        for id in doomed {
            // A self-loop appears twice in the adjacency list.
            if self.remove_wire(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Sever every wire touching `entity`. Returns the number removed.
    pub fn disconnect_entity(&mut self, entity: EntityId) -> usize {
        let Some(adj) = self.adjacency.remove(entity) else {
            return 0;
        };
        let mut removed = 0;
        for (id, _) in adj {
            if self.remove_wire(id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    // -- Queries --

    /// All wires of `entity`, in the order they were attached.
    pub fn connections(&self, entity: EntityId) -> Vec<Connection> {
        self.adjacency
            .get(entity)
            .map(|adj| {
                adj.iter()
                    .map(|&(id, end)| self.view(id, end))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter()
    }

    /// Number of logical wires.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn is_connected(&self, a: EntityId, b: EntityId) -> bool {
        self.connections(a).iter().any(|c| c.peer == b)
    }

    // -- Internals --

    fn insert(&mut self, wire: Wire) -> WireId {
        let (ea, eb) = (wire.a.entity, wire.b.entity);
        let id = self.wires.insert(wire);
        self.push_adjacency(ea, id, End::A);
        self.push_adjacency(eb, id, End::B);
        log::trace!("wire {id:?} added between {ea:?} and {eb:?}");
        id
    }

    fn push_adjacency(&mut self, entity: EntityId, id: WireId, end: End) {
        match self.adjacency.get_mut(entity) {
            Some(list) => list.push((id, end)),
            None => {
                self.adjacency.insert(entity, vec![(id, end)]);
            }
        }
    }

    fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let wire = self.wires.remove(id)?;
        for entity in [wire.a.entity, wire.b.entity] {
            if let Some(list) = self.adjacency.get_mut(entity) {
                list.retain(|&(w, _)| w != id);
                if list.is_empty() {
                    self.adjacency.remove(entity);
                }
            }
        }
        Some(wire)
    }

    fn view(&self, id: WireId, end: End) -> Connection {
        let wire = &self.wires[id];
        let near = wire.end(end);
        let far = wire.end(end.flip());
        Connection {
            wire: id,
            peer: far.entity,
            color: wire.color,
            side: near.side,
            peer_side: far.side,
            circuit_id: near.reports_circuit_id.then_some(far.side),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
