//! Floor tiles: a name and a grid-aligned position, nothing else.

use blueprint_core::error::SchemaError;
use blueprint_core::geometry::Position;
use blueprint_core::id::ExportId;
use blueprint_core::names::NameCanonicalizer;
use blueprint_data::schema::{PositionData, TileData};

/// A floor tile. Tiles take no part in placement or wiring.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Set by `Blueprint::assign_ids`.
    pub(crate) export_id: Option<ExportId>,
    /// Internal (underscore) form.
    name: String,
    position: Position,
}

impl Tile {
    /// `name` may be in either form; it is stored canonicalized.
    pub fn new(name: &str, position: Position, names: &dyn NameCanonicalizer) -> Self {
        Self {
            export_id: None,
            name: names.to_internal(name),
            position,
        }
    }

    /// Tiles must carry a position on the map; there is no default.
    pub fn from_data(data: &TileData, names: &dyn NameCanonicalizer) -> Result<Self, SchemaError> {
        let pos = data.position.ok_or_else(|| SchemaError::MissingPosition {
            kind: "tile",
            name: data.name.clone(),
        })?;
        let position = Position::new(pos.x, pos.y);
        if !position.in_bounds() {
            return Err(SchemaError::PositionOutOfRange {
                kind: "tile",
                name: data.name.clone(),
            });
        }
        Ok(Self::new(&data.name, position, names))
    }

    /// The internal name, e.g. `stone_path`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// `None` until the owning blueprint numbers its tiles.
    pub fn export_id(&self) -> Option<ExportId> {
        self.export_id
    }

    /// Back to external form, with the hyphenated name.
    pub fn to_data(&self, names: &dyn NameCanonicalizer) -> TileData {
        TileData {
            name: names.to_external(&self.name),
            position: Some(PositionData::new(self.position.x, self.position.y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::names::HyphenNames;

    #[test]
    fn round_trip() {
        let data = TileData {
            name: "refined-concrete".into(),
            position: Some(PositionData::new(-3.0, 7.0)),
        };
        let tile = Tile::from_data(&data, &HyphenNames).unwrap();
        assert_eq!(tile.name(), "refined_concrete");
        assert_eq!(tile.to_data(&HyphenNames), data);
    }

    #[test]
    fn position_required() {
        let data = TileData {
            name: "stone-path".into(),
            position: None,
        };
        assert_eq!(
            Tile::from_data(&data, &HyphenNames),
            Err(SchemaError::MissingPosition {
                kind: "tile",
                name: "stone-path".into()
            })
        );
    }

    #[test]
    fn off_map_position_rejected() {
        let data = TileData {
            name: "stone-path".into(),
            position: Some(PositionData::new(0.0, -2.5e9)),
        };
        assert_eq!(
            Tile::from_data(&data, &HyphenNames),
            Err(SchemaError::PositionOutOfRange {
                kind: "tile",
                name: "stone-path".into()
            })
        );
    }
}
