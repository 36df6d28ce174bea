//! Loaded row records and dot-path field access.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::GridError;
use crate::error::Result;

/// Path of the stable identity inside a row document.
pub const RECORD_ID_PATH: &str = "experiment.id";

/// Stable identity of a record, independent of its row position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A dot-delimited accessor such as `experiment.config.hyperparameters.lr.val`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPath(String);

impl DataPath {
    /// Creates a path from its dotted form.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the dotted form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Walks `root` along the path.
    ///
    /// Object keys are matched by name, array elements by numeric segment.
    /// Returns `None` as soon as a segment is missing.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(root, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loaded row: a stable id plus the nested document supplied by the fetch layer.
///
/// The grid never mutates records; they are replaced wholesale when the
/// fetch layer delivers new pages.
///
/// # Example
///
/// ```
/// use expgrid::model::{DataPath, Record};
/// use serde_json::json;
///
/// let record = Record::from_value(json!({
///     "experiment": { "id": 7, "name": "mnist" }
/// })).unwrap();
///
/// assert_eq!(record.id().0, 7);
/// assert_eq!(record.get_str(&DataPath::new("experiment.name")), Some("mnist"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    data: Value,
}

impl Record {
    /// Creates a record with an explicit id.
    pub fn new(id: impl Into<RecordId>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Builds a record from a row document, reading its id at [`RECORD_ID_PATH`].
    pub fn from_value(data: Value) -> Result<Self> {
        let id = DataPath::new(RECORD_ID_PATH)
            .lookup(&data)
            .and_then(Value::as_u64)
            .ok_or_else(|| GridError::MissingRecordId {
                path: RECORD_ID_PATH.to_string(),
            })?;
        Ok(Self {
            id: RecordId(id),
            data,
        })
    }

    /// Decodes a JSON array of row documents.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        values.into_iter().map(Self::from_value).collect()
    }

    /// Returns the stable id.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the whole document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the value at `path`, treating JSON null as absent.
    pub fn get(&self, path: &DataPath) -> Option<&Value> {
        path.lookup(&self.data).filter(|v| !v.is_null())
    }

    /// Returns the string at `path`, if it is a string.
    pub fn get_str(&self, path: &DataPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Returns the number at `path`, if it is numeric.
    pub fn get_f64(&self, path: &DataPath) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    /// Returns the unsigned integer at `path`.
    pub fn get_u64(&self, path: &DataPath) -> Option<u64> {
        self.get(path).and_then(Value::as_u64)
    }
}
