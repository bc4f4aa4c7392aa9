//! Read-only entity catalog: per-name dimensions, capability flags and
//! signal types.
//!
//! The catalog is built once through [`CatalogBuilder`] and then frozen.
//! Lookups never fail hard: an unknown name resolves to
//! [`EntityMetadata::default`], so forward-compatible blueprints containing
//! names the catalog has not heard of can still be imported.

use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Signal type
// ---------------------------------------------------------------------------

/// The kind of value a signal carries on a circuit network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    #[default]
    Item,
    Fluid,
    Virtual,
}

impl SignalType {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::Item => "item",
            SignalType::Fluid => "fluid",
            SignalType::Virtual => "virtual",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Static facts about one canonical entity or signal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub width: u32,
    pub height: u32,
    /// Whether filters on this entity carry a count.
    pub filter_amount: bool,
    /// Whether the entity has an input/output direction type (underground belts).
    pub direction_type: bool,
    pub recipe: bool,
    pub modules: bool,
    pub inventory_size: Option<u32>,
    /// Programmable-speaker style playback parameters.
    pub parameters: bool,
    pub alert_parameters: bool,
    pub signal_type: SignalType,
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            filter_amount: true,
            direction_type: false,
            recipe: false,
            modules: false,
            inventory_size: None,
            parameters: false,
            alert_parameters: false,
            signal_type: SignalType::Item,
        }
    }
}

impl EntityMetadata {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Entity kind and capabilities
// ---------------------------------------------------------------------------

/// Entity families whose behavior differs in the external schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    DeciderCombinator,
    ArithmeticCombinator,
    ConstantCombinator,
    Other,
}

impl EntityKind {
    /// Classify a canonical (underscored) entity name.
    pub fn of(name: &str) -> Self {
        match name {
            "decider_combinator" => EntityKind::DeciderCombinator,
            "arithmetic_combinator" => EntityKind::ArithmeticCombinator,
            "constant_combinator" => EntityKind::ConstantCombinator,
            _ => EntityKind::Other,
        }
    }

    /// Decider and arithmetic combinators expose two circuit terminals.
    pub fn is_dual_terminal(self) -> bool {
        matches!(
            self,
            EntityKind::DeciderCombinator | EntityKind::ArithmeticCombinator
        )
    }
}

/// Capability flags captured once from the catalog when an entity is built.
///
/// Every gated setter reads these fields; the catalog is never consulted
/// again for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub filter_amount: bool,
    pub direction_type: bool,
    pub recipe: bool,
    pub modules: bool,
    pub inventory_size: Option<u32>,
    pub parameters: bool,
    pub alert_parameters: bool,
}

impl Capabilities {
    pub fn from_metadata(meta: &EntityMetadata) -> Self {
        Self {
            filter_amount: meta.filter_amount,
            direction_type: meta.direction_type,
            recipe: meta.recipe,
            modules: meta.modules,
            inventory_size: meta.inventory_size.filter(|&n| n > 0),
            parameters: meta.parameters,
            alert_parameters: meta.alert_parameters,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::from_metadata(&EntityMetadata::default())
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// Read-only metadata lookup keyed by canonical name.
pub trait EntityCatalog {
    fn metadata(&self, name: &str) -> Option<&EntityMetadata>;

    /// Metadata for `name`, or the defaults when the name is unknown.
    fn metadata_or_default(&self, name: &str) -> EntityMetadata {
        match self.metadata(name) {
            Some(meta) => meta.clone(),
            None => {
                log::warn!("no catalog entry for '{name}', using default metadata");
                EntityMetadata::default()
            }
        }
    }

    /// Signal type used when exporting a signal reference.
    fn signal_type(&self, name: &str) -> SignalType {
        self.metadata(name)
            .map(|m| m.signal_type)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate catalog entry: {0}")]
    Duplicate(String),
    #[error("catalog entry '{0}' has a zero dimension")]
    ZeroSize(String),
}

/// Builder for an immutable [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: HashMap<String, EntityMetadata>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a canonical name.
    pub fn register(
        &mut self,
        name: &str,
        metadata: EntityMetadata,
    ) -> Result<&mut Self, CatalogError> {
        if self.entries.contains_key(name) {
            return Err(CatalogError::Duplicate(name.to_string()));
        }
        if metadata.width == 0 || metadata.height == 0 {
            return Err(CatalogError::ZeroSize(name.to_string()));
        }
        self.entries.insert(name.to_string(), metadata);
        Ok(self)
    }

    /// Register a signal-only name (items, fluids, virtual signals).
    pub fn register_signal(
        &mut self,
        name: &str,
        signal_type: SignalType,
    ) -> Result<&mut Self, CatalogError> {
        self.register(
            name,
            EntityMetadata {
                signal_type,
                ..EntityMetadata::default()
            },
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Freeze the catalog.
    pub fn build(self) -> Catalog {
        log::debug!("catalog built with {} entries", self.entries.len());
        Catalog {
            entries: self.entries,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable catalog. Frozen after [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, EntityMetadata>,
}

impl Catalog {
    /// An empty catalog: every lookup falls back to defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of known entity names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` (internal form) has an entry. Unknown names still
    /// resolve, to default metadata.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every entry's internal name, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl EntityCatalog for Catalog {
    fn metadata(&self, name: &str) -> Option<&EntityMetadata> {
        self.entries.get(name)
    }
}
