//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::catalog::{Catalog, CatalogBuilder, EntityMetadata, SignalType};
use crate::names::{HyphenNames, Lookup};

// ===========================================================================
// Metadata constructors
// ===========================================================================

pub fn sized(width: u32, height: u32) -> EntityMetadata {
    EntityMetadata {
        width,
        height,
        ..EntityMetadata::default()
    }
}

pub fn with_inventory(size: u32) -> EntityMetadata {
    EntityMetadata {
        inventory_size: Some(size),
        ..EntityMetadata::default()
    }
}

// ===========================================================================
// Standard catalog
// ===========================================================================

/// A small catalog covering every capability the model gates on.
pub fn test_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    let entries: Vec<(&str, EntityMetadata)> = vec![
        ("decider_combinator", sized(1, 2)),
        ("arithmetic_combinator", sized(1, 2)),
        ("constant_combinator", sized(1, 1)),
        ("small_lamp", sized(1, 1)),
        ("medium_electric_pole", sized(1, 1)),
        ("wooden_chest", with_inventory(16)),
        (
            "logistic_chest_requester",
            EntityMetadata {
                inventory_size: Some(48),
                ..EntityMetadata::default()
            },
        ),
        (
            "filter_inserter",
            EntityMetadata {
                filter_amount: false,
                ..EntityMetadata::default()
            },
        ),
        (
            "underground_belt",
            EntityMetadata {
                direction_type: true,
                ..EntityMetadata::default()
            },
        ),
        (
            "assembling_machine_2",
            EntityMetadata {
                width: 3,
                height: 3,
                recipe: true,
                modules: true,
                ..EntityMetadata::default()
            },
        ),
        (
            "programmable_speaker",
            EntityMetadata {
                parameters: true,
                alert_parameters: true,
                ..EntityMetadata::default()
            },
        ),
        ("gate", sized(1, 1)),
        ("stone_wall", sized(1, 1)),
        ("straight_rail", sized(2, 2)),
        ("pump", sized(1, 2)),
    ];
    for (name, meta) in entries {
        b.register(name, meta).expect("unique fixture names");
    }

    let signals = [
        ("iron_plate", SignalType::Item),
        ("copper_plate", SignalType::Item),
        ("speed_module", SignalType::Item),
        ("water", SignalType::Fluid),
        ("signal_each", SignalType::Virtual),
        ("signal_everything", SignalType::Virtual),
        ("signal_anything", SignalType::Virtual),
        ("signal_a", SignalType::Virtual),
        ("signal_red", SignalType::Virtual),
    ];
    for (name, kind) in signals {
        b.register_signal(name, kind).expect("unique fixture names");
    }
    b.build()
}

/// Leak a test catalog so a `Lookup<'static>` can be handed around freely.
pub fn test_lookup() -> Lookup<'static> {
    let catalog: &'static Catalog = Box::leak(Box::new(test_catalog()));
    Lookup::new(catalog, &HyphenNames)
}
