//! Catalog loading: reads entity metadata data files and builds a
//! [`Catalog`].
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers. Names in data files may use either spelling;
//! they are canonicalized through the supplied [`NameCanonicalizer`].

use blueprint_core::catalog::{Catalog, CatalogBuilder, CatalogError, EntityMetadata, SignalType};
use blueprint_core::names::NameCanonicalizer;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading catalog data.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The parsed entries do not form a valid catalog.
    #[error("invalid catalog in {file}: {source}")]
    Catalog {
        file: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Data file structs
// ===========================================================================

/// One entity row in a catalog data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntryData {
    pub name: String,
    #[serde(default = "default_extent")]
    pub width: u32,
    #[serde(default = "default_extent")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub filter_amount: bool,
    #[serde(default)]
    pub direction_type: bool,
    #[serde(default)]
    pub recipe: bool,
    #[serde(default)]
    pub modules: bool,
    #[serde(default)]
    pub inventory_size: Option<u32>,
    #[serde(default)]
    pub parameters: bool,
    #[serde(default)]
    pub alert_parameters: bool,
    #[serde(rename = "type", default)]
    pub signal_type: SignalType,
}

/// One signal-only row (items, fluids, virtual signals).
#[derive(Debug, Clone, Deserialize)]
pub struct SignalEntryData {
    pub name: String,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
}

fn default_extent() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl From<&CatalogEntryData> for EntityMetadata {
    fn from(row: &CatalogEntryData) -> Self {
        EntityMetadata {
            width: row.width,
            height: row.height,
            filter_amount: row.filter_amount,
            direction_type: row.direction_type,
            recipe: row.recipe,
            modules: row.modules,
            inventory_size: row.inventory_size,
            parameters: row.parameters,
            alert_parameters: row.alert_parameters,
            signal_type: row.signal_type,
        }
    }
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize a list from text. TOML has no top-level arrays, so for TOML
/// the list is read from `toml_key` of the top-level table.
pub fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    toml_key: &str,
    file: &Path,
) -> Result<Vec<T>, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => {
            let table: toml::Value =
                toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_err(format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_err(e.to_string()))
        }
    }
}

/// Read a file and deserialize a list according to its extension.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, toml_key, path)
}

// ===========================================================================
// Catalog assembly
// ===========================================================================

/// Build a catalog from already-parsed rows.
pub fn build_catalog(
    entities: &[CatalogEntryData],
    signals: &[SignalEntryData],
    names: &dyn NameCanonicalizer,
    file: &Path,
) -> Result<Catalog, DataLoadError> {
    let wrap = |source: CatalogError| DataLoadError::Catalog {
        file: file.to_path_buf(),
        source,
    };

    let mut builder = CatalogBuilder::new();
    for row in entities {
        builder
            .register(&names.to_internal(&row.name), EntityMetadata::from(row))
            .map_err(wrap)?;
    }
    for row in signals {
        let name = names.to_internal(&row.name);
        // Entity rows may already describe the same name as a placeable item.
        if builder.contains(&name) {
            log::debug!("signal '{name}' already registered as an entity, skipping");
            continue;
        }
        builder
            .register_signal(&name, row.signal_type)
            .map_err(wrap)?;
    }
    Ok(builder.build())
}

/// Parse a single entity list from in-memory text.
pub fn catalog_from_str(
    content: &str,
    format: Format,
    names: &dyn NameCanonicalizer,
) -> Result<Catalog, DataLoadError> {
    let origin = Path::new("<memory>");
    let rows: Vec<CatalogEntryData> = parse_list(content, format, "entities", origin)?;
    build_catalog(&rows, &[], names, origin)
}

/// Load a catalog from one entity data file.
pub fn load_catalog(path: &Path, names: &dyn NameCanonicalizer) -> Result<Catalog, DataLoadError> {
    let rows: Vec<CatalogEntryData> = deserialize_list(path, "entities")?;
    log::debug!("loaded {} catalog rows from {}", rows.len(), path.display());
    build_catalog(&rows, &[], names, path)
}

/// Load a catalog from a directory holding a required `entities` file and an
/// optional `signals` file, each in any supported format.
pub fn load_catalog_dir(
    dir: &Path,
    names: &dyn NameCanonicalizer,
) -> Result<Catalog, DataLoadError> {
    let entities_path = require_data_file(dir, "entities")?;
    let entities: Vec<CatalogEntryData> = deserialize_list(&entities_path, "entities")?;

    let signals: Vec<SignalEntryData> = match find_data_file(dir, "signals")? {
        Some(path) => deserialize_list(&path, "signals")?,
        None => Vec::new(),
    };

    log::debug!(
        "loaded {} entities and {} signals from {}",
        entities.len(),
        signals.len(),
        dir.display()
    );
    build_catalog(&entities, &signals, names, &entities_path)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::catalog::EntityCatalog;
    use blueprint_core::geometry::Size;
    use blueprint_core::names::HyphenNames;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "blueprint_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const JSON_ENTITIES: &str = r#"[
        {"name": "decider-combinator", "width": 1, "height": 2},
        {"name": "filter-inserter", "filter_amount": false},
        {"name": "wooden-chest", "inventory_size": 16}
    ]"#;

    const RON_ENTITIES: &str = r#"[
        (name: "decider-combinator", width: 1, height: 2),
        (name: "filter-inserter", filter_amount: false),
        (name: "wooden-chest", inventory_size: Some(16)),
    ]"#;

    const TOML_ENTITIES: &str = r#"
        [[entities]]
        name = "decider-combinator"
        width = 1
        height = 2

        [[entities]]
        name = "filter-inserter"
        filter_amount = false

        [[entities]]
        name = "wooden-chest"
        inventory_size = 16
    "#;

    fn assert_standard(catalog: &Catalog) {
        assert_eq!(catalog.len(), 3);
        let decider = catalog.metadata("decider_combinator").unwrap();
        assert_eq!(decider.size(), Size::new(1, 2));
        assert!(decider.filter_amount);
        assert!(!catalog.metadata("filter_inserter").unwrap().filter_amount);
        assert_eq!(
            catalog.metadata("wooden_chest").unwrap().inventory_size,
            Some(16)
        );
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("entities.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("entities")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // In-memory parsing
    // -----------------------------------------------------------------------

    #[test]
    fn same_catalog_from_every_format() {
        for (text, format) in [
            (JSON_ENTITIES, Format::Json),
            (RON_ENTITIES, Format::Ron),
            (TOML_ENTITIES, Format::Toml),
        ] {
            let catalog = catalog_from_str(text, format, &HyphenNames).unwrap();
            assert_standard(&catalog);
        }
    }

    #[test]
    fn toml_without_key_is_parse_error() {
        let result = catalog_from_str("[[rows]]\nname = \"x\"", Format::Toml, &HyphenNames);
        assert!(matches!(result, Err(DataLoadError::Parse { detail, .. }) if detail.contains("entities")));
    }

    #[test]
    fn duplicate_rows_rejected() {
        let text = r#"[{"name": "gate"}, {"name": "gate"}]"#;
        let result = catalog_from_str(text, Format::Json, &HyphenNames);
        assert!(matches!(
            result,
            Err(DataLoadError::Catalog {
                source: CatalogError::Duplicate(_),
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let result = catalog_from_str("[{", Format::Json, &HyphenNames);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
    }

    // -----------------------------------------------------------------------
    // Files and directories
    // -----------------------------------------------------------------------

    #[test]
    fn load_single_file() {
        let dir = make_test_dir("single");
        let path = dir.join("catalog.ron");
        fs::write(&path, RON_ENTITIES).unwrap();

        let catalog = load_catalog(&path, &HyphenNames).unwrap();
        assert_standard(&catalog);

        cleanup(&dir);
    }

    #[test]
    fn load_dir_with_signals() {
        let dir = make_test_dir("with_signals");
        fs::write(dir.join("entities.toml"), TOML_ENTITIES).unwrap();
        fs::write(
            dir.join("signals.json"),
            r#"[{"name": "signal-each", "type": "virtual"}, {"name": "water", "type": "fluid"}]"#,
        )
        .unwrap();

        let catalog = load_catalog_dir(&dir, &HyphenNames).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.signal_type("signal_each"), SignalType::Virtual);
        assert_eq!(catalog.signal_type("water"), SignalType::Fluid);

        cleanup(&dir);
    }

    #[test]
    fn load_dir_missing_entities() {
        let dir = make_test_dir("missing");
        let result = load_catalog_dir(&dir, &HyphenNames);
        assert!(matches!(result, Err(DataLoadError::MissingRequired { file, .. }) if file == "entities"));
        cleanup(&dir);
    }

    #[test]
    fn load_dir_conflicting_formats() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("entities.json"), JSON_ENTITIES).unwrap();
        fs::write(dir.join("entities.ron"), RON_ENTITIES).unwrap();

        let result = load_catalog_dir(&dir, &HyphenNames);
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }
}
