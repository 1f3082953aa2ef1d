//! The static style catalogue.
//!
//! Loaded once at startup from a JSON or TOML file and treated as
//! immutable reference data afterwards. Lookups never modify records;
//! enrichment works on clones.

use std::collections::BTreeMap;
use std::path::Path;

use cadastre_map_style_models::{CatalogueFile, LayerPaint, StyleRecord};
use serde::Deserialize;

use crate::{StyleError, name::strip_count_suffix};

/// Accepted JSON layouts: a bare array of records or `{ "styles": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogueJson {
    List(Vec<StyleRecord>),
    File(CatalogueFile),
}

/// Style records keyed by style id.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalogue {
    styles: BTreeMap<i64, StyleRecord>,
}

impl StyleCatalogue {
    /// Builds a catalogue from records.
    ///
    /// When an id appears more than once the first record wins and the
    /// rest are logged and ignored.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = StyleRecord>) -> Self {
        let mut styles = BTreeMap::new();
        for record in records {
            if styles.contains_key(&record.id) {
                log::warn!(
                    "Duplicate style id {} ({:?}), keeping the first entry",
                    record.id,
                    record.name
                );
                continue;
            }
            styles.insert(record.id, record);
        }
        Self { styles }
    }

    /// Parses a JSON catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Json`] if the document is not a record array
    /// or a `{ "styles": [...] }` object.
    pub fn from_json_str(json: &str) -> Result<Self, StyleError> {
        let records = match serde_json::from_str(json)? {
            CatalogueJson::List(records) => records,
            CatalogueJson::File(file) => file.styles,
        };
        Ok(Self::from_records(records))
    }

    /// Parses a TOML catalogue made of `[[styles]]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Toml`] if the document cannot be parsed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, StyleError> {
        let file: CatalogueFile = toml::de::from_str(toml_str)?;
        Ok(Self::from_records(file.styles))
    }

    /// Loads a catalogue file, picking the parser from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] if the file cannot be read or parsed, or if
    /// its extension is not `.json` or `.toml`.
    pub fn load(path: &Path) -> Result<Self, StyleError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let catalogue = match extension.as_deref() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            Some("toml") => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            _ => {
                return Err(StyleError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        log::info!(
            "Loaded {} style records from {}",
            catalogue.len(),
            path.display()
        );
        Ok(catalogue)
    }

    /// Looks up a record by style id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&StyleRecord> {
        self.styles.get(&id)
    }

    /// Finds a record by display name, ignoring trailing counts on both
    /// sides.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&StyleRecord> {
        let wanted = strip_count_suffix(name);
        self.styles
            .values()
            .find(|record| strip_count_suffix(&record.name) == wanted)
    }

    /// Overlay paint for the style with the given display name.
    #[must_use]
    pub fn paint_for_name(&self, name: &str) -> Option<LayerPaint> {
        self.find_by_name(name)
            .and_then(|record| LayerPaint::from_color(record.color.as_ref()))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the catalogue has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterates records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleRecord> {
        self.styles.values()
    }
}
