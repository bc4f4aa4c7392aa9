//! Property-based tests for the wire graph and the sparse signal tables.
//!
//! Random mutation sequences are applied, then structural invariants are
//! checked against the resulting state.

use blueprint_core::id::EntityId;
use blueprint_logic::filter::SlotTable;
use blueprint_logic::graph::{ConnectionGraph, WireEnd};
use blueprint_logic::wire::{Side, WireColor};
use proptest::prelude::*;
use slotmap::SlotMap;

// ===========================================================================
// Generators
// ===========================================================================

const ENTITIES: usize = 6;

#[derive(Debug, Clone)]
enum WireOp {
    Connect(usize, usize, bool, bool),
    Disconnect(usize, usize, bool, bool),
    DisconnectAll(usize, usize),
    DisconnectEntity(usize),
}

fn arb_wire_ops(max_ops: usize) -> impl Strategy<Value = Vec<WireOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..ENTITIES, 0..ENTITIES, any::<bool>(), any::<bool>())
                .prop_map(|(a, b, s, g)| WireOp::Connect(a, b, s, g)),
            (0..ENTITIES, 0..ENTITIES, any::<bool>(), any::<bool>())
                .prop_map(|(a, b, s, g)| WireOp::Disconnect(a, b, s, g)),
            (0..ENTITIES, 0..ENTITIES).prop_map(|(a, b)| WireOp::DisconnectAll(a, b)),
            (0..ENTITIES).prop_map(WireOp::DisconnectEntity),
        ],
        1..=max_ops,
    )
}

#[derive(Debug, Clone)]
enum SlotOp {
    Set(u32, i32),
    Clear(u32),
}

fn arb_slot_ops(max_ops: usize) -> impl Strategy<Value = Vec<SlotOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..12u32, -100..100i32).prop_map(|(i, c)| SlotOp::Set(i, c)),
            (0..12u32).prop_map(SlotOp::Clear),
        ],
        1..=max_ops,
    )
}

fn entities() -> Vec<EntityId> {
    let mut sm = SlotMap::<EntityId, ()>::with_key();
    (0..ENTITIES).map(|_| sm.insert(())).collect()
}

fn side(two: bool) -> Side {
    if two { Side::Two } else { Side::One }
}

fn color(green: bool) -> WireColor {
    if green { WireColor::Green } else { WireColor::Red }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every wire is visible from both of its ends, and nothing else is.
    #[test]
    fn connections_stay_symmetric(ops in arb_wire_ops(60)) {
        let ids = entities();
        let mut graph = ConnectionGraph::new();

        for op in ops {
            match op {
                WireOp::Connect(a, b, s, g) => {
                    graph.connect(
                        WireEnd::new(ids[a], side(s), false),
                        WireEnd::new(ids[b], Side::One, false),
                        color(g),
                    );
                }
                WireOp::Disconnect(a, b, s, g) => {
                    graph.disconnect(ids[a], side(s), ids[b], Side::One, color(g));
                }
                WireOp::DisconnectAll(a, b) => {
                    graph.disconnect_all(ids[a], ids[b], None);
                }
                WireOp::DisconnectEntity(a) => {
                    graph.disconnect_entity(ids[a]);
                }
            }
        }

        let total_degree: usize = ids.iter().map(|&e| graph.connections(e).len()).sum();
        prop_assert_eq!(total_degree, graph.wire_count() * 2);

        for &e in &ids {
            for conn in graph.connections(e) {
                let mirrored = graph
                    .connections(conn.peer)
                    .into_iter()
                    .filter(|back| back.wire == conn.wire)
                    .any(|back| back.peer == e && back.side == conn.peer_side && back.color == conn.color);
                prop_assert!(mirrored, "wire {:?} has no mirror on {:?}", conn.wire, conn.peer);
            }
        }
    }

    /// `disconnect_all` leaves no wire between the pair on either side.
    #[test]
    fn disconnect_all_empties_pair(ops in arb_wire_ops(40), a in 0..ENTITIES, b in 0..ENTITIES) {
        let ids = entities();
        let mut graph = ConnectionGraph::new();
        for op in ops {
            if let WireOp::Connect(x, y, s, g) = op {
                graph.connect(
                    WireEnd::new(ids[x], side(s), false),
                    WireEnd::new(ids[y], Side::One, false),
                    color(g),
                );
            }
        }

        graph.disconnect_all(ids[a], ids[b], None);
        prop_assert!(!graph.is_connected(ids[a], ids[b]));
        prop_assert!(!graph.is_connected(ids[b], ids[a]));
    }

    /// A slot table never holds a cleared index, and always iterates sorted.
    #[test]
    fn slot_table_stays_sparse(ops in arb_slot_ops(80)) {
        let mut table = SlotTable::new();
        let mut model = std::collections::BTreeMap::new();

        for op in ops {
            match op {
                SlotOp::Set(i, c) => {
                    table.set(i, Some(format!("signal_{i}")), Some(c));
                    model.insert(i, c);
                }
                SlotOp::Clear(i) => {
                    table.set(i, None, None);
                    model.remove(&i);
                }
            }
        }

        let got: Vec<(u32, i32)> = table.iter().map(|(i, s)| (i, s.count)).collect();
        let want: Vec<(u32, i32)> = model.into_iter().collect();
        prop_assert_eq!(got, want);
    }
}
