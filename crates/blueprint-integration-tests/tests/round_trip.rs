//! Import a game export and write it straight back out. The JSON that comes
//! out must match the JSON that went in, key for key.

use blueprint_core::error::{EntityError, SchemaError};
use blueprint_core::geometry::{Position, Size};
use blueprint_core::test_utils::test_lookup;
use blueprint_data::BlueprintData;
use blueprint_logic::{Side, WireColor};
use blueprint_model::{Blueprint, BlueprintError, PlacementError};
use serde_json::{Value, json};

const CIRCUIT: &str = include_str!("fixtures/circuit.json");
const LOGISTICS: &str = include_str!("fixtures/logistics.json");

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn import(text: &str) -> Blueprint<'static> {
    let data = BlueprintData::from_json(text).unwrap();
    Blueprint::from_data(&data, test_lookup()).unwrap()
}

fn export(bp: &mut Blueprint<'_>) -> Value {
    serde_json::to_value(bp.to_data().unwrap()).unwrap()
}

fn assert_round_trip(text: &str) {
    let expected: Value = serde_json::from_str(text).unwrap();
    let mut bp = import(text);
    assert_eq!(export(&mut bp), expected);
}

// ===========================================================================
// Whole-document round trips
// ===========================================================================

#[test]
fn circuit_blueprint_round_trips() {
    init_logging();
    assert_round_trip(CIRCUIT);
}

#[test]
fn logistics_blueprint_round_trips() {
    init_logging();
    assert_round_trip(LOGISTICS);
}

#[test]
fn second_pass_is_stable() {
    init_logging();
    let mut first = import(CIRCUIT);
    let once = first.to_data().unwrap();
    let mut second = Blueprint::from_data(&once, test_lookup()).unwrap();
    assert_eq!(second.to_data().unwrap(), once);
}

// ===========================================================================
// What the import builds
// ===========================================================================

#[test]
fn each_wire_is_stored_once() {
    init_logging();
    let bp = import(CIRCUIT);
    // constant-decider, constant-pole, decider-arithmetic, arithmetic-lamp, lamp-pole
    assert_eq!(bp.wire_count(), 5);
    assert_eq!(bp.entity_count(), 6);
    assert_eq!(bp.tile_count(), 2);
}

#[test]
fn combinator_terminals_resolved() {
    init_logging();
    let bp = import(CIRCUIT);
    let ids: Vec<_> = bp.entities().map(|(id, _)| id).collect();
    let (decider, arithmetic) = (ids[1], ids[2]);

    let conns = bp.connections(decider);
    let out = conns
        .iter()
        .find(|c| c.peer == arithmetic)
        .expect("decider output wired to arithmetic input");
    assert_eq!(out.side, Side::Two);
    assert_eq!(out.peer_side, Side::One);
    assert_eq!(out.color, WireColor::Green);
}

#[test]
fn rotated_decider_geometry() {
    init_logging();
    let bp = import(CIRCUIT);
    let (_, decider) = bp.entities().nth(1).unwrap();
    assert_eq!(decider.name(), "decider_combinator");
    assert_eq!(decider.size(), Size::new(2, 1));
    assert_eq!(decider.top_left(), Position::new(2.0, 0.0));
}

#[test]
fn constants_stored_zero_based() {
    init_logging();
    let bp = import(CIRCUIT);
    let (_, constant) = bp.entities().next().unwrap();
    let table = constant.constants();
    assert_eq!(table.get(0).map(|s| s.count), Some(10));
    assert_eq!(table.get(2).map(|s| s.name.as_str()), Some("iron_plate"));
    assert!(table.get(1).is_none());
}

#[test]
fn gate_may_sit_on_rail() {
    init_logging();
    let bp = import(LOGISTICS);
    let ids: Vec<_> = bp.entities().map(|(id, _)| id).collect();
    let (rail, gate) = (ids[6], ids[7]);
    assert_eq!(bp.overlap(gate), Some(rail));
    assert!(bp.is_clear(gate));
    assert!(bp.is_clear(rail));
}

// ===========================================================================
// Import edge cases
// ===========================================================================

#[test]
fn legacy_circuit_parameters_move_under_control_behavior() {
    init_logging();
    let text = r#"{"entities": [{
        "entity_number": 1,
        "name": "programmable-speaker",
        "position": {"x": 0, "y": 0},
        "circuit_parameters": {"instrument_id": 2}
    }]}"#;
    let mut bp = import(text);
    let out = export(&mut bp);
    let entity = &out["entities"][0];
    assert!(entity.get("circuit_parameters").is_none());
    assert_eq!(
        entity["control_behavior"]["circuit_parameters"],
        json!({"signal_value_is_pitch": false, "instrument_id": 2, "note_id": 0})
    );
}

#[test]
fn string_copy_count_is_read_as_bool() {
    init_logging();
    let text = r#"{"entities": [{
        "name": "decider-combinator",
        "position": {"x": 0, "y": 0.5},
        "control_behavior": {"decider_conditions": {"copy_count_from_input": "true"}}
    }]}"#;
    let mut bp = import(text);
    let out = export(&mut bp);
    assert_eq!(
        out["entities"][0]["control_behavior"]["decider_conditions"]["copy_count_from_input"],
        json!(true)
    );
}

#[test]
fn dangling_connection_rejected() {
    init_logging();
    let text = r#"{"entities": [{
        "name": "small-lamp",
        "position": {"x": 0, "y": 0},
        "connections": {"1": {"red": [{"entity_id": 9}]}}
    }]}"#;
    let data = BlueprintData::from_json(text).unwrap();
    let err = Blueprint::from_data(&data, test_lookup()).unwrap_err();
    assert_eq!(
        err,
        BlueprintError::Placement(PlacementError::Entity(EntityError::Schema(
            SchemaError::DanglingConnection(9)
        )))
    );
}

#[test]
fn missing_position_rejected() {
    init_logging();
    let text = r#"{"entities": [{"name": "small-lamp"}]}"#;
    let data = BlueprintData::from_json(text).unwrap();
    let err = Blueprint::from_data(&data, test_lookup()).unwrap_err();
    assert!(matches!(
        err,
        BlueprintError::Entity(EntityError::Schema(SchemaError::MissingPosition { .. }))
    ));
}

#[test]
fn unknown_entities_fall_back_to_defaults() {
    init_logging();
    let text = r#"{"entities": [{"entity_number": 1, "name": "mystery-box", "position": {"x": 3, "y": 4}}]}"#;
    assert_round_trip(text);
}
