//! Property-based tests for geometry and name canonicalization.

use blueprint_core::geometry::{Direction, Position, Size};
use blueprint_core::names::{HyphenNames, NameCanonicalizer};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_direction() -> impl Strategy<Value = Direction> {
    (0..8u8).prop_map(Direction)
}

fn arb_size() -> impl Strategy<Value = Size> {
    (1..=8u32, 1..=8u32).prop_map(|(w, h)| Size::new(w, h))
}

/// External names: lowercase words joined by hyphens.
fn arb_external_name() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z0-9]{1,8}", 1..=4).prop_map(|parts| parts.join("-"))
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    /// Any turn sequence leaves the size swapped iff the final parity differs
    /// from the starting one.
    #[test]
    fn size_follows_final_parity(
        base in arb_size(),
        turns in proptest::collection::vec(arb_direction(), 0..16),
    ) {
        let mut size = base;
        let mut current = Direction::NORTH;
        for next in &turns {
            if current.swaps_axes(*next) {
                size = size.swapped();
            }
            current = *next;
        }
        let expected = if current.axis_parity() == 0 { base } else { base.swapped() };
        prop_assert_eq!(size, expected);
    }

    #[test]
    fn hyphen_names_invert(name in arb_external_name()) {
        let internal = HyphenNames.to_internal(&name);
        prop_assert!(!internal.contains('-'));
        prop_assert_eq!(HyphenNames.to_external(&internal), name);
    }

    #[test]
    fn rounding_is_idempotent(x in -1.0e4..1.0e4f64, y in -1.0e4..1.0e4f64) {
        let once = Position::new(x, y).rounded();
        prop_assert_eq!(once.rounded(), once);
    }
}
