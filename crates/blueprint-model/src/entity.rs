//! A single placed entity and its capability-gated attributes.

use blueprint_core::catalog::{Capabilities, EntityKind};
use blueprint_core::error::{CapabilityError, EntityError, SchemaError, ValidationError};
use blueprint_core::geometry::{Direction, Position, Size};
use blueprint_core::id::ExportId;
use blueprint_core::names::{Lookup, NameCanonicalizer};
use blueprint_data::schema::{
    AlertParametersData, CircuitParametersData, ConnectionsData, EntityData, PositionData,
    SpeakerParametersData,
};
use blueprint_logic::condition::{Condition, ReadMode};
use blueprint_logic::filter::{ConstantTable, SlotTable};
use blueprint_spatial::Footprint;
use serde::{Deserialize, Serialize};

use crate::params::{AlertParameters, CircuitParameters, SpeakerParameters};

// ---------------------------------------------------------------------------
// Attribute types
// ---------------------------------------------------------------------------

/// Which half of an underground belt pair an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionType {
    #[default]
    Input,
    Output,
}

impl DirectionType {
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        match token {
            "input" => Ok(DirectionType::Input),
            "output" => Ok(DirectionType::Output),
            other => Err(ValidationError::InvalidDirectionType(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectionType::Input => "input",
            DirectionType::Output => "output",
        }
    }
}

/// A stack of modules (or other items) inserted into an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One placed object. Names are canonical; the catalog is consulted once,
/// at construction, and its answers are kept in [`Capabilities`].
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) export_id: Option<ExportId>,
    name: String,
    kind: EntityKind,
    caps: Capabilities,
    position: Position,
    direction: Direction,
    size: Size,
    condition: Option<Condition>,
    filters: SlotTable,
    request_filters: SlotTable,
    constants: ConstantTable,
    modules: Option<Vec<ItemStack>>,
    bar: Option<u32>,
    recipe: Option<String>,
    direction_type: Option<DirectionType>,
    circuit_parameters: Option<CircuitParameters>,
    parameters: Option<SpeakerParameters>,
    alert_parameters: Option<AlertParameters>,
    /// Connections as read, waiting for the batch they refer to.
    pub(crate) raw_connections: Option<ConnectionsData>,
}

impl Entity {
    /// A bare entity facing north with its top-left corner at `position`.
    pub fn new(name: &str, position: Position, lookup: Lookup<'_>) -> Self {
        let name = lookup.internal(name);
        let meta = lookup.catalog.metadata_or_default(&name);
        let caps = Capabilities::from_metadata(&meta);
        Self {
            export_id: None,
            kind: EntityKind::of(&name),
            position: position.rounded(),
            direction: Direction::NORTH,
            size: meta.size(),
            condition: None,
            filters: SlotTable::new(),
            request_filters: SlotTable::new(),
            constants: ConstantTable::new(),
            modules: None,
            bar: None,
            recipe: None,
            direction_type: caps.direction_type.then_some(DirectionType::Input),
            circuit_parameters: None,
            parameters: caps.parameters.then(SpeakerParameters::default),
            alert_parameters: caps.alert_parameters.then(AlertParameters::default),
            raw_connections: None,
            caps,
            name,
        }
    }

    /// Build an entity from its external representation.
    ///
    /// With `center` set, `data.position` is read in the game's convention
    /// (tile center minus half a tile) and converted to the top-left corner.
    /// Connections are kept raw until the entity is placed. Positions off
    /// the map are a schema error.
    pub fn from_data(data: &EntityData, lookup: Lookup<'_>, center: bool) -> Result<Self, EntityError> {
        let pos = data.position.ok_or_else(|| SchemaError::MissingPosition {
            kind: "entity",
            name: data.name.clone(),
        })?;
        if !Position::new(pos.x, pos.y).in_bounds() {
            return Err(SchemaError::PositionOutOfRange {
                kind: "entity",
                name: data.name.clone(),
            }
            .into());
        }
        let mut entity = Entity::new(&data.name, Position::new(pos.x, pos.y), lookup);
        let names = lookup.names;

        entity.set_direction(Direction(data.direction));

        if let Some(filters) = &data.filters {
            for f in filters {
                let Some(name) = f.filtered_name() else {
                    log::warn!("{}: filter slot {} names no signal, skipped", entity.name, f.index);
                    continue;
                };
                let amount = if entity.caps.filter_amount { f.count } else { None };
                entity.set_filter(f.index, Some(name), amount, names);
            }
        }
        if let Some(requests) = &data.request_filters {
            for r in requests {
                entity.set_request_filter(r.index, Some(&r.name), Some(r.count), names);
            }
        }

        if entity.caps.direction_type {
            let token = data.direction_type.as_deref().unwrap_or("input");
            entity.direction_type = Some(DirectionType::parse(token)?);
        }
        entity.recipe = data.recipe.as_deref().map(|r| names.to_internal(r));
        entity.bar = data.bar.and_then(|b| u32::try_from(b).ok());
        entity.modules = data.items.as_ref().map(|items| {
            items
                .iter()
                .map(|s| ItemStack::new(names.to_internal(&s.item), s.count))
                .collect()
        });

        if let Some(patch) = &data.parameters {
            entity.parameters.get_or_insert_with(SpeakerParameters::default).merge(patch);
        }
        if let Some(patch) = &data.alert_parameters {
            entity
                .alert_parameters
                .get_or_insert_with(AlertParameters::default)
                .merge(patch);
        }

        let behavior = data.control_behavior.as_ref();
        if let Some(patch) = behavior
            .and_then(|cb| cb.circuit_parameters.as_ref())
            .or(data.circuit_parameters.as_ref())
        {
            entity.set_circuit_parameters(patch);
        }
        if let Some(cb) = behavior {
            if let Some(constants) = &cb.filters {
                if entity.kind == EntityKind::ConstantCombinator {
                    for c in constants {
                        let index = i64::from(c.index) - 1;
                        entity.set_constant(index, Some(&c.signal.name), Some(c.count), names)?;
                    }
                } else {
                    log::warn!("{}: ignoring constant filters on a non-constant entity", entity.name);
                }
            }
            if let Some(cond) = cb.condition() {
                if entity.kind == EntityKind::ConstantCombinator {
                    log::warn!("{}: ignoring condition on a constant combinator", entity.name);
                } else {
                    entity.condition = Some(Condition::from_data(cond, entity.kind, names)?);
                }
            }
        }

        if center {
            entity.position = pos_from_center(Position::new(pos.x, pos.y), entity.size);
        }
        entity.raw_connections = data.connections.clone().filter(|c| !c.is_empty());
        Ok(entity)
    }

    // -- Identity --

    /// The internal name, e.g. `small_lamp`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Behavioral category, derived from the name.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// What the catalog said this entity supports.
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// The number assigned for export, if any.
    pub fn export_id(&self) -> Option<ExportId> {
        self.export_id
    }

    // -- Geometry --

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Width and height in tiles, already swapped for east/west facings.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The stored position. The corner accessors below derive from it and
    /// the current size.
    pub fn top_left(&self) -> Position {
        self.position
    }

    pub fn top_right(&self) -> Position {
        self.position.offset_by(self.size, 1.0, 0.0)
    }

    pub fn bottom_left(&self) -> Position {
        self.position.offset_by(self.size, 0.0, 1.0)
    }

    pub fn bottom_right(&self) -> Position {
        self.position.offset_by(self.size, 1.0, 1.0)
    }

    pub fn center(&self) -> Position {
        self.position.offset_by(self.size, 0.5, 0.5)
    }

    /// The box this entity claims on a placement grid.
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.position, self.size)
    }

    /// Move the top-left corner. Placed entities should be moved through
    /// the blueprint so the grid follows.
    pub fn set_position(&mut self, position: Position) {
        self.position = position.rounded();
    }

    /// Turn the entity, swapping width and height when the axis parity
    /// (`direction % 4`) changes.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction.swaps_axes(direction) {
            self.size = self.size.swapped();
        }
        self.direction = direction;
    }

    // -- Gated attributes --

    /// `Some` only for entities with an input/output mode.
    pub fn direction_type(&self) -> Option<DirectionType> {
        self.direction_type
    }

    pub fn set_direction_type(&mut self, token: &str) -> Result<(), EntityError> {
        if !self.caps.direction_type {
            return Err(CapabilityError::NoDirectionType {
                entity: self.name.clone(),
            }
            .into());
        }
        self.direction_type = Some(DirectionType::parse(token)?);
        Ok(())
    }

    pub fn recipe(&self) -> Option<&str> {
        self.recipe.as_deref()
    }

    pub fn set_recipe(
        &mut self,
        recipe: Option<&str>,
        names: &dyn NameCanonicalizer,
    ) -> Result<(), CapabilityError> {
        if !self.caps.recipe {
            return Err(CapabilityError::NoRecipe {
                entity: self.name.clone(),
            });
        }
        self.recipe = recipe.map(|r| names.to_internal(r));
        Ok(())
    }

    pub fn bar(&self) -> Option<u32> {
        self.bar
    }

    /// Limit the inventory to `bar` slots. `None`, or a value at or past
    /// the inventory size, clears the limit.
    pub fn set_bar(&mut self, bar: Option<i64>) -> Result<(), EntityError> {
        let Some(size) = self.caps.inventory_size else {
            return Err(CapabilityError::NoInventory {
                entity: self.name.clone(),
            }
            .into());
        };
        self.bar = match bar {
            Some(n) if n < 0 => return Err(ValidationError::NegativeBar(n).into()),
            Some(n) if n >= i64::from(size) => None,
            Some(n) => u32::try_from(n).ok(),
            None => None,
        };
        Ok(())
    }

    pub fn modules(&self) -> Option<&[ItemStack]> {
        self.modules.as_deref()
    }

    pub fn set_modules(
        &mut self,
        modules: Option<Vec<ItemStack>>,
        names: &dyn NameCanonicalizer,
    ) -> Result<(), CapabilityError> {
        if !self.caps.modules {
            return Err(CapabilityError::NoModules {
                entity: self.name.clone(),
            });
        }
        self.modules = modules.map(|stacks| {
            stacks
                .into_iter()
                .map(|s| ItemStack::new(names.to_internal(&s.item), s.count))
                .collect()
        });
        Ok(())
    }

    // -- Tables --

    pub fn filters(&self) -> &SlotTable {
        &self.filters
    }

    pub fn set_filter(
        &mut self,
        index: u32,
        name: Option<&str>,
        amount: Option<i32>,
        names: &dyn NameCanonicalizer,
    ) {
        self.filters
            .set(index, name.map(|n| names.to_internal(n)), amount);
    }

    pub fn remove_all_filters(&mut self) {
        self.filters.clear();
    }

    pub fn request_filters(&self) -> &SlotTable {
        &self.request_filters
    }

    pub fn set_request_filter(
        &mut self,
        index: u32,
        name: Option<&str>,
        amount: Option<i32>,
        names: &dyn NameCanonicalizer,
    ) {
        self.request_filters
            .set(index, name.map(|n| names.to_internal(n)), amount);
    }

    pub fn remove_all_request_filters(&mut self) {
        self.request_filters.clear();
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// Set output slot `index` (0..=17) of a constant combinator.
    pub fn set_constant(
        &mut self,
        index: i64,
        name: Option<&str>,
        count: Option<i32>,
        names: &dyn NameCanonicalizer,
    ) -> Result<(), EntityError> {
        if self.kind != EntityKind::ConstantCombinator {
            return Err(CapabilityError::NoConstants {
                entity: self.name.clone(),
            }
            .into());
        }
        self.constants
            .set(index, name.map(|n| names.to_internal(n)), count)?;
        Ok(())
    }

    // -- Condition --

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Merge `patch` into the current condition. The patch is checked
    /// before anything changes; on error the condition is untouched.
    pub fn set_condition(
        &mut self,
        mut patch: Condition,
        names: &dyn NameCanonicalizer,
    ) -> Result<(), EntityError> {
        patch.canonicalize(names);
        self.merge_condition(&patch)
    }

    /// Set how circuit-read contents are reported: `"pulse"` or `"hold"`.
    pub fn set_read_mode(&mut self, token: &str) -> Result<(), EntityError> {
        let patch = Condition {
            read_mode: Some(ReadMode::parse(token)?),
            ..Condition::default()
        };
        self.merge_condition(&patch)
    }

    fn merge_condition(&mut self, patch: &Condition) -> Result<(), EntityError> {
        if self.kind == EntityKind::ConstantCombinator {
            return Err(CapabilityError::NoCondition {
                entity: self.name.clone(),
            }
            .into());
        }
        let current = self.condition.clone().unwrap_or_default();
        self.condition = Some(current.apply(patch, self.kind, &self.name)?);
        Ok(())
    }

    // -- Parameter blocks --

    pub fn circuit_parameters(&self) -> Option<&CircuitParameters> {
        self.circuit_parameters.as_ref()
    }

    pub fn set_circuit_parameters(&mut self, patch: &CircuitParametersData) {
        self.circuit_parameters
            .get_or_insert_with(CircuitParameters::default)
            .merge(patch);
    }

    pub fn parameters(&self) -> Option<&SpeakerParameters> {
        self.parameters.as_ref()
    }

    pub fn set_parameters(&mut self, patch: &SpeakerParametersData) -> Result<(), CapabilityError> {
        if !self.caps.parameters {
            return Err(CapabilityError::NoParameters {
                entity: self.name.clone(),
            });
        }
        self.parameters
            .get_or_insert_with(SpeakerParameters::default)
            .merge(patch);
        Ok(())
    }

    pub fn alert_parameters(&self) -> Option<&AlertParameters> {
        self.alert_parameters.as_ref()
    }

    pub fn set_alert_parameters(&mut self, patch: &AlertParametersData) -> Result<(), CapabilityError> {
        if !self.caps.alert_parameters {
            return Err(CapabilityError::NoAlertParameters {
                entity: self.name.clone(),
            });
        }
        self.alert_parameters
            .get_or_insert_with(AlertParameters::default)
            .merge(patch);
        Ok(())
    }

    /// Whether raw connections are still waiting to be resolved.
    pub fn has_pending_connections(&self) -> bool {
        self.raw_connections.is_some()
    }
}

/// Convert a game position (center minus half a tile) to a top-left corner.
fn pos_from_center(pos: Position, size: Size) -> Position {
    (pos + Position::new(0.5, 0.5) - size.half()).rounded()
}

/// The game position (center minus half a tile) of a top-left corner.
pub(crate) fn pos_to_center(entity: &Entity) -> PositionData {
    let p = (entity.center() - Position::new(0.5, 0.5)).rounded();
    PositionData::new(p.x, p.y)
}
