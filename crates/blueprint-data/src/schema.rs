//! Serde structs for the game's external blueprint schema.
//!
//! These mirror the nested JSON exactly: optional fields are `Option`s that
//! are skipped on output, so an exported object carries only the keys the
//! game itself would write.

use blueprint_core::catalog::SignalType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

fn is_zero(v: &u8) -> bool {
    *v == 0
}

/// Write integral floats as integers so `10.0` round-trips as `10`.
fn compact_f64<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

fn compact_opt_f64<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(v) => compact_f64(v, s),
        None => s.serialize_none(),
    }
}

// ===========================================================================
// Blueprint
// ===========================================================================

/// The entity and tile lists of one blueprint (the transport envelope is
/// handled elsewhere).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlueprintData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<TileData>,
}

impl BlueprintData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ===========================================================================
// Geometry
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(serialize_with = "compact_f64")]
    pub x: f64,
    #[serde(serialize_with = "compact_f64")]
    pub y: f64,
}

impl PositionData {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ===========================================================================
// Entity
// ===========================================================================

/// One placed entity as written by the game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_number: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionData>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub direction: u8,
    /// Underground belt half: `"input"` or `"output"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub direction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemStackData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_filters: Option<Vec<RequestFilterData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<ConnectionsData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SpeakerParametersData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_parameters: Option<AlertParametersData>,
    /// Older exports put speaker circuit parameters here instead of under
    /// `control_behavior`. Read, never written.
    #[serde(default, skip_serializing)]
    pub circuit_parameters: Option<CircuitParametersData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_behavior: Option<ControlBehaviorData>,
}

impl EntityData {
    /// Minimal entity at a position; everything else absent.
    pub fn at(name: &str, x: f64, y: f64) -> Self {
        Self {
            name: name.to_string(),
            position: Some(PositionData::new(x, y)),
            ..Self::default()
        }
    }
}

/// A module (or other item) stack inside an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStackData {
    pub item: String,
    pub count: u32,
}

// ===========================================================================
// Signals and filters
// ===========================================================================

/// A typed signal reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalIdData {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub name: String,
}

/// A container or combinator filter slot.
///
/// Amount-carrying entities write `{index, signal, count}`; the rest write
/// `{index, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterData {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalIdData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FilterData {
    /// The filtered name, whichever shape the slot was written in.
    pub fn filtered_name(&self) -> Option<&str> {
        self.signal
            .as_ref()
            .map(|s| s.name.as_str())
            .or(self.name.as_deref())
    }
}

/// A requester chest request slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilterData {
    pub index: u32,
    pub name: String,
    pub count: i32,
}

/// A constant combinator output slot (1-based external index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantFilterData {
    pub signal: SignalIdData,
    pub count: i32,
    pub index: u32,
}

// ===========================================================================
// Connections
// ===========================================================================

/// Wire connections keyed by side (`"1"`, `"2"`).
///
/// Keys that are not side numbers (e.g. copper-cable points) are kept by
/// the deserializer but ignored by the model.
pub type ConnectionsData = BTreeMap<String, ConnectionSideData>;

/// Wires leaving one side, grouped by color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionSideData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<Vec<ConnectionPointData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<Vec<ConnectionPointData>>,
}

/// The far end of one wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPointData {
    pub entity_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<u8>,
}

// ===========================================================================
// Control behavior
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlBehaviorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<ConstantFilterData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decider_conditions: Option<ConditionData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arithmetic_conditions: Option<ConditionData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_condition: Option<ConditionData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_parameters: Option<CircuitParametersData>,
}

impl ControlBehaviorData {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whichever condition object is present, decider first.
    pub fn condition(&self) -> Option<&ConditionData> {
        self.decider_conditions
            .as_ref()
            .or(self.arithmetic_conditions.as_ref())
            .or(self.circuit_condition.as_ref())
    }
}

/// A boolean the game has written both as `true` and as `"true"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseBool(pub bool);

impl Serialize for LooseBool {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(self.0)
    }
}

impl<'de> Deserialize<'de> for LooseBool {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(d)? {
            Raw::Bool(b) => LooseBool(b),
            Raw::Text(t) => LooseBool(t == "true"),
        })
    }
}

/// Decider, arithmetic or circuit condition, as nested in `control_behavior`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal: Option<SignalIdData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal: Option<SignalIdData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_signal: Option<SignalIdData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_enable_disable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_read_hand_contents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_contents_read_mode: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_count_from_input: Option<LooseBool>,
}

// ===========================================================================
// Parameter blocks
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircuitParametersData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_value_is_pitch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeakerParametersData {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "compact_opt_f64"
    )]
    pub playback_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_globally: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_polyphony: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertParametersData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_alert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on_map: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_message: Option<String>,
}

// ===========================================================================
// Tile
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionData>,
}

// ===========================================================================
// Tests
// ===========================================================================
