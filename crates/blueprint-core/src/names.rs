//! Name canonicalization between the external (hyphenated) and internal
//! (underscored) spellings.

use crate::catalog::EntityCatalog;

/// Bidirectional mapping between external and canonical names.
///
/// Implementations must be bijective over the catalog's canonical name set:
/// `to_external(to_internal(n)) == n` for every external name `n` the
/// catalog knows.
pub trait NameCanonicalizer {
    fn to_internal(&self, name: &str) -> String;
    fn to_external(&self, name: &str) -> String;
}

/// The game's default spelling rule: `-` externally, `_` internally.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyphenNames;

impl NameCanonicalizer for HyphenNames {
    fn to_internal(&self, name: &str) -> String {
        name.replace('-', "_")
    }

    fn to_external(&self, name: &str) -> String {
        name.replace('_', "-")
    }
}

/// Catalog and naming policy, borrowed together for the duration of a
/// conversion.
#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    pub catalog: &'a dyn EntityCatalog,
    pub names: &'a dyn NameCanonicalizer,
}

impl<'a> Lookup<'a> {
    pub fn new(catalog: &'a dyn EntityCatalog, names: &'a dyn NameCanonicalizer) -> Self {
        Self { catalog, names }
    }

    pub fn internal(&self, name: &str) -> String {
        self.names.to_internal(name)
    }

    pub fn external(&self, name: &str) -> String {
        self.names.to_external(name)
    }
}

impl std::fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup").finish_non_exhaustive()
    }
}
