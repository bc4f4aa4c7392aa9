//! Writing entities back into the game's nested schema.
//!
//! Every optional attribute that is unset is left out, so the output has
//! exactly the keys the game would write for the same entity.

use blueprint_core::catalog::EntityKind;
use blueprint_core::names::Lookup;
use blueprint_data::schema::{
    ConnectionsData, ConstantFilterData, ControlBehaviorData, EntityData, FilterData,
    ItemStackData, RequestFilterData, SignalIdData,
};

use crate::entity::{Entity, pos_to_center};

fn signal(name: &str, lookup: Lookup<'_>) -> SignalIdData {
    SignalIdData {
        signal_type: lookup.catalog.signal_type(name),
        name: lookup.external(name),
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

impl Entity {
    /// External form of this entity. `connections` comes from the owning
    /// blueprint, which knows the peers' export ids.
    pub fn to_data(&self, connections: Option<ConnectionsData>, lookup: Lookup<'_>) -> EntityData {
        let filter_amount = self.capabilities().filter_amount;

        let filters = self
            .filters()
            .iter()
            .map(|(index, slot)| {
                if filter_amount {
                    FilterData {
                        index,
                        signal: Some(signal(&slot.name, lookup)),
                        count: Some(slot.count),
                        name: None,
                    }
                } else {
                    FilterData {
                        index,
                        signal: None,
                        count: None,
                        name: Some(lookup.external(&slot.name)),
                    }
                }
            })
            .collect();

        let request_filters = self
            .request_filters()
            .iter()
            .map(|(index, slot)| RequestFilterData {
                index,
                name: lookup.external(&slot.name),
                count: slot.count,
            })
            .collect();

        EntityData {
            entity_number: self.export_id().map(|id| id.0),
            name: lookup.external(self.name()),
            position: Some(pos_to_center(self)),
            direction: self.direction().0,
            direction_type: self.direction_type().map(|t| t.as_str().to_string()),
            recipe: self.recipe().map(|r| lookup.external(r)),
            bar: self.bar().and_then(|b| i32::try_from(b).ok()),
            items: self.modules().map(|stacks| {
                stacks
                    .iter()
                    .map(|s| ItemStackData {
                        item: lookup.external(&s.item),
                        count: s.count,
                    })
                    .collect()
            }),
            filters: non_empty(filters),
            request_filters: non_empty(request_filters),
            connections: connections.filter(|c| !c.is_empty()),
            parameters: self.parameters().map(|p| p.to_data()),
            alert_parameters: self.alert_parameters().map(|p| p.to_data()),
            circuit_parameters: None,
            control_behavior: Some(self.control_behavior(lookup)).filter(|cb| !cb.is_empty()),
        }
    }

    fn control_behavior(&self, lookup: Lookup<'_>) -> ControlBehaviorData {
        let constants = self
            .constants()
            .iter()
            .map(|(index, slot)| ConstantFilterData {
                signal: signal(&slot.name, lookup),
                count: slot.count,
                index: index + 1,
            })
            .collect();

        let mut cb = ControlBehaviorData {
            filters: non_empty(constants),
            circuit_parameters: self.circuit_parameters().map(|p| p.to_data()),
            ..ControlBehaviorData::default()
        };

        if let Some(cond) = self.condition() {
            let data = Some(cond.to_data(self.kind(), lookup));
            match self.kind() {
                EntityKind::DeciderCombinator => cb.decider_conditions = data,
                EntityKind::ArithmeticCombinator => cb.arithmetic_conditions = data,
                EntityKind::Other => cb.circuit_condition = data,
                EntityKind::ConstantCombinator => {}
            }
        }
        cb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::catalog::SignalType;
    use blueprint_core::geometry::{Direction, Position};
    use blueprint_core::names::HyphenNames;
    use blueprint_core::test_utils::test_lookup;
    use blueprint_logic::condition::{ComparisonOp, Condition, Operand, Operator};
    use serde_json::json;

    fn entity(name: &str, x: f64, y: f64) -> Entity {
        Entity::new(name, Position::new(x, y), test_lookup())
    }

    fn export(e: &Entity) -> serde_json::Value {
        serde_json::to_value(e.to_data(None, test_lookup())).unwrap()
    }

    #[test]
    fn bare_entity_has_only_name_and_position() {
        let e = entity("small-lamp", 2.0, 3.0);
        assert_eq!(
            export(&e),
            json!({"name": "small-lamp", "position": {"x": 2, "y": 3}})
        );
    }

    #[test]
    fn amounted_filters_use_signal_shape() {
        let mut e = entity("wooden-chest", 0.0, 0.0);
        e.set_filter(2, Some("iron_plate"), Some(10), &HyphenNames);
        e.set_filter(1, Some("water"), None, &HyphenNames);
        assert_eq!(
            export(&e)["filters"],
            json!([
                {"index": 1, "signal": {"type": "fluid", "name": "water"}, "count": 0},
                {"index": 2, "signal": {"type": "item", "name": "iron-plate"}, "count": 10}
            ])
        );
    }

    #[test]
    fn unamounted_filters_use_name_shape() {
        let mut e = entity("filter-inserter", 0.0, 0.0);
        e.set_filter(1, Some("iron_plate"), Some(10), &HyphenNames);
        assert_eq!(
            export(&e)["filters"],
            json!([{"index": 1, "name": "iron-plate"}])
        );
    }

    #[test]
    fn constants_shift_to_one_based() {
        let mut e = entity("constant-combinator", 0.0, 0.0);
        e.set_constant(0, Some("signal_a"), Some(5), &HyphenNames).unwrap();
        let cb = &export(&e)["control_behavior"];
        assert_eq!(
            cb["filters"],
            json!([{"signal": {"type": "virtual", "name": "signal-a"}, "count": 5, "index": 1}])
        );
    }

    #[test]
    fn condition_goes_under_kind_specific_key() {
        let cond = Condition {
            left: Some("iron_plate".into()),
            right: Some(Operand::Constant(3)),
            operator: Some(Operator::Compare(ComparisonOp::Lt)),
            ..Condition::default()
        };
        let mut lamp = entity("small-lamp", 0.0, 0.0);
        lamp.set_condition(cond.clone(), &HyphenNames).unwrap();
        let mut decider = entity("decider-combinator", 0.0, 0.0);
        decider.set_condition(cond, &HyphenNames).unwrap();

        let lamp_cb = &export(&lamp)["control_behavior"];
        assert_eq!(lamp_cb["circuit_condition"]["comparator"], "<");
        assert!(lamp_cb.get("decider_conditions").is_none());
        let decider_cb = &export(&decider)["control_behavior"];
        assert_eq!(decider_cb["decider_conditions"]["constant"], 3);
    }

    #[test]
    fn position_and_direction() {
        let mut e = entity("decider-combinator", 10.0, 10.0);
        e.set_direction(Direction::EAST);
        let data = e.to_data(None, test_lookup());
        assert_eq!(data.direction, 2);
        // 2x1 after rotation: center (11, 10.5) minus half a tile.
        let pos = data.position.unwrap();
        assert_eq!((pos.x, pos.y), (10.5, 10.0));
    }

    #[test]
    fn speaker_blocks_exported_with_defaults() {
        let e = entity("programmable-speaker", 0.0, 0.0);
        let value = export(&e);
        assert_eq!(
            value["parameters"],
            json!({"playback_volume": 1, "playback_globally": false, "allow_polyphony": true})
        );
        assert_eq!(value["alert_parameters"]["alert_message"], "");
    }

    #[test]
    fn empty_connections_omitted() {
        let e = entity("small-lamp", 0.0, 0.0);
        let data = e.to_data(Some(ConnectionsData::new()), test_lookup());
        assert!(data.connections.is_none());
        assert!(data.control_behavior.is_none());
    }

    #[test]
    fn signal_types_from_catalog() {
        let lookup = test_lookup();
        assert_eq!(signal("water", lookup).signal_type, SignalType::Fluid);
        assert_eq!(signal("unknown_thing", lookup).signal_type, SignalType::Item);
    }
}
