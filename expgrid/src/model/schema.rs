//! Runtime column schema.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;

/// Value type of a schema column. Picks the renderer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnType {
    #[serde(rename = "COLUMN_TYPE_NUMBER")]
    Number,
    #[serde(rename = "COLUMN_TYPE_DATE")]
    Date,
    #[serde(rename = "COLUMN_TYPE_TEXT")]
    Text,
    #[default]
    #[serde(rename = "COLUMN_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

/// Where in a row document a schema column lives. Picks the data path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationType {
    /// A top-level experiment field.
    #[serde(rename = "LOCATION_TYPE_EXPERIMENT")]
    Experiment,
    /// A hyperparameter, ids carry an `hp.` prefix.
    #[serde(rename = "LOCATION_TYPE_HYPERPARAMETERS")]
    Hyperparameters,
    /// A validation metric, ids carry a `validation.` prefix.
    #[serde(rename = "LOCATION_TYPE_VALIDATIONS")]
    Validations,
    #[default]
    #[serde(rename = "LOCATION_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

/// One entry of the runtime schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    /// Column id, e.g. `hp.lr` or `validation.loss`.
    #[serde(rename = "column")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub location: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ColumnSchema {
    pub fn new(id: impl Into<String>, column_type: ColumnType, location: LocationType) -> Self {
        Self {
            id: id.into(),
            column_type,
            location,
            display_name: None,
        }
    }

    /// Header text: the display name when present, else the id.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// The schema list indexed by column id, keeping the order it arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaMap {
    entries: Vec<ColumnSchema>,
    index: HashMap<String, usize>,
}

impl SchemaMap {
    /// Builds the map. Later duplicates of an id replace earlier ones.
    pub fn new(entries: Vec<ColumnSchema>) -> Self {
        let mut map = Self::default();
        for entry in entries {
            match map.index.get(&entry.id) {
                Some(&i) => {
                    if let Some(slot) = map.entries.get_mut(i) {
                        *slot = entry;
                    }
                }
                None => {
                    map.index.insert(entry.id.clone(), map.entries.len());
                    map.entries.push(entry);
                }
            }
        }
        map
    }

    /// Decodes a JSON array of schema entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ColumnSchema> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn get(&self, id: &str) -> Option<&ColumnSchema> {
        self.index.get(id).and_then(|&i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[ColumnSchema] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_api_schema() {
        let map = SchemaMap::from_json(
            r#"[
                {"column": "hp.lr", "type": "COLUMN_TYPE_NUMBER", "location": "LOCATION_TYPE_HYPERPARAMETERS"},
                {"column": "searcher", "type": "COLUMN_TYPE_TEXT", "location": "LOCATION_TYPE_EXPERIMENT", "displayName": "Searcher"},
                {"column": "odd", "type": "COLUMN_TYPE_SOMETHING_NEW", "location": "LOCATION_TYPE_ELSEWHERE"}
            ]"#,
        )
        .unwrap();

        assert_eq!(map.len(), 3);
        let lr = map.get("hp.lr").unwrap();
        assert_eq!(lr.column_type, ColumnType::Number);
        assert_eq!(lr.location, LocationType::Hyperparameters);
        assert_eq!(map.get("searcher").unwrap().title(), "Searcher");

        let odd = map.get("odd").unwrap();
        assert_eq!(odd.column_type, ColumnType::Unspecified);
        assert_eq!(odd.location, LocationType::Unspecified);
    }

    #[test]
    fn test_duplicate_ids_replace_in_place() {
        let map = SchemaMap::new(vec![
            ColumnSchema::new("a", ColumnType::Text, LocationType::Experiment),
            ColumnSchema::new("b", ColumnType::Text, LocationType::Experiment),
            ColumnSchema::new("a", ColumnType::Number, LocationType::Experiment),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[0].column_type, ColumnType::Number);
    }
}
