//! Property-based tests for the blueprint arena.
//!
//! Random edit sequences are applied, then the placement grid and the
//! exported document are checked against the entities they describe.

use blueprint_core::geometry::{Direction, Position};
use blueprint_core::id::EntityId;
use blueprint_core::test_utils::test_lookup;
use blueprint_logic::wire::{Side, WireColor};
use blueprint_model::{Blueprint, Entity};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

const NAMES: [&str; 4] = [
    "small-lamp",
    "decider-combinator",
    "assembling-machine-2",
    "straight-rail",
];

#[derive(Debug, Clone)]
enum EditOp {
    Add(usize, i8, i8),
    Rotate(usize, u8),
    Move(usize, i8, i8),
    Remove(usize),
}

fn arb_edit_ops(max_ops: usize) -> impl Strategy<Value = Vec<EditOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..NAMES.len(), any::<i8>(), any::<i8>()).prop_map(|(n, x, y)| EditOp::Add(n, x, y)),
            (0..16usize, 0..8u8).prop_map(|(i, d)| EditOp::Rotate(i, d)),
            (0..16usize, any::<i8>(), any::<i8>()).prop_map(|(i, x, y)| EditOp::Move(i, x, y)),
            (0..16usize).prop_map(EditOp::Remove),
        ],
        1..=max_ops,
    )
}

/// `(a, b, side_a_is_out, side_b_is_out, green)` over `n` entities.
fn arb_wires(n: usize) -> impl Strategy<Value = Vec<(usize, usize, bool, bool, bool)>> {
    proptest::collection::vec(
        (0..n, 0..n, any::<bool>(), any::<bool>(), any::<bool>()),
        0..=3 * n,
    )
}

fn pos(x: i8, y: i8) -> Position {
    Position::new(f64::from(x), f64::from(y))
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    /// After any edit sequence the grid holds exactly the live entities,
    /// each at its current footprint.
    #[test]
    fn grid_tracks_entity_geometry(ops in arb_edit_ops(40)) {
        let mut bp = Blueprint::new(test_lookup());
        let mut live: Vec<EntityId> = Vec::new();

        for op in ops {
            match op {
                EditOp::Add(n, x, y) => {
                    let id = bp.insert_entity(Entity::new(NAMES[n], pos(x, y), test_lookup()));
                    bp.place(id, &[]).unwrap();
                    live.push(id);
                }
                EditOp::Rotate(i, d) if !live.is_empty() => {
                    bp.rotate(live[i % live.len()], Direction(d)).unwrap();
                }
                EditOp::Move(i, x, y) if !live.is_empty() => {
                    bp.move_entity(live[i % live.len()], pos(x, y)).unwrap();
                }
                EditOp::Remove(i) if !live.is_empty() => {
                    let id = live.remove(i % live.len());
                    prop_assert!(bp.remove_entity(id).is_some());
                }
                _ => {}
            }
        }

        prop_assert_eq!(bp.grid().entity_count(), live.len());
        for &id in &live {
            let entity = bp.entity(id).unwrap();
            prop_assert_eq!(bp.grid().footprint(id), Some(entity.footprint()));
        }
    }

    /// Exporting a wired blueprint and importing the result gives back the
    /// same document and the same number of wires.
    #[test]
    fn wired_export_reimports(
        (kinds, wires) in (2..8usize).prop_flat_map(|n| {
            (proptest::collection::vec(any::<bool>(), n), arb_wires(n))
        })
    ) {
        let mut bp = Blueprint::new(test_lookup());
        let ids: Vec<EntityId> = kinds
            .iter()
            .enumerate()
            .map(|(i, &decider)| {
                let name = if decider { "decider-combinator" } else { "small-lamp" };
                let x = f64::from(u32::try_from(i).unwrap() * 3);
                let id = bp.insert_entity(Entity::new(name, Position::new(x, 0.0), test_lookup()));
                bp.place(id, &[]).unwrap();
                id
            })
            .collect();

        // Side 2 exists only on combinators.
        let side = |i: usize, out: bool| if out && kinds[i] { Side::Two } else { Side::One };
        for &(a, b, out_a, out_b, green) in &wires {
            if a == b {
                continue;
            }
            let color = if green { WireColor::Green } else { WireColor::Red };
            bp.connect(ids[a], ids[b], side(a, out_a), side(b, out_b), color).unwrap();
        }

        let first = bp.to_data().unwrap();
        let mut again = Blueprint::from_data(&first, test_lookup()).unwrap();
        prop_assert_eq!(again.wire_count(), bp.wire_count());
        prop_assert_eq!(again.to_data().unwrap(), first);
    }
}
