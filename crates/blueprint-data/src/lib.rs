//! External schema and catalog data files for the blueprint model.
//!
//! - [`schema`] -- serde structs matching the game's nested blueprint JSON.
//! - [`loader`] -- reads catalog data files (RON, JSON or TOML) into a
//!   [`blueprint_core::catalog::Catalog`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, catalog_from_str, load_catalog, load_catalog_dir};
pub use schema::{
    AlertParametersData, BlueprintData, CircuitParametersData, ConditionData,
    ConnectionPointData, ConnectionSideData, ConnectionsData, ConstantFilterData,
    ControlBehaviorData, EntityData, FilterData, ItemStackData, LooseBool, PositionData,
    RequestFilterData, SignalIdData, SpeakerParametersData, TileData,
};
