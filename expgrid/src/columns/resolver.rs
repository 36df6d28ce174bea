//! Per-instance column definition memo.

use std::collections::HashMap;

use log::debug;
use log::trace;

use crate::model::ColumnSchema;
use crate::model::ColumnType;
use crate::model::DataPath;
use crate::model::Loadable;
use crate::model::LocationType;
use crate::model::SchemaMap;

use super::ColumnDef;
use super::ColumnId;
use super::ColumnWidths;
use super::Renderer;
use super::builtin;

/// Data path template for a schema entry.
///
/// Returns `None` for an unspecified location; the renderer then shows an
/// empty value.
pub fn data_path(entry: &ColumnSchema) -> Option<DataPath> {
    let path = match entry.location {
        LocationType::Experiment => format!("experiment.{}", entry.id),
        LocationType::Hyperparameters => format!(
            "experiment.config.hyperparameters.{}.val",
            entry.id.replacen("hp.", "", 1)
        ),
        LocationType::Validations => format!(
            "bestTrial.bestValidationMetric.metrics.{}",
            entry.id.replacen("validation.", "", 1)
        ),
        LocationType::Unspecified => return None,
    };
    Some(DataPath::new(path))
}

/// Definition derived from a schema entry.
pub fn schema_definition(entry: &ColumnSchema, width: u32) -> ColumnDef {
    let path = data_path(entry);
    let renderer = match entry.column_type {
        ColumnType::Number => Renderer::Number { path },
        ColumnType::Date => Renderer::Date { path },
        ColumnType::Text | ColumnType::Unspecified => Renderer::Text { path },
    };
    ColumnDef {
        source: Some(entry.clone()),
        ..ColumnDef::new(entry.id.clone(), entry.title(), width, renderer)
    }
}

/// Resolves column ids to definitions, memoizing each one.
///
/// Exactly one definition exists per id. Width changes update the cached
/// entry in place; a changed schema entry rebuilds it. Each grid instance
/// owns its own resolver.
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    memo: HashMap<ColumnId, ColumnDef>,
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `id` against the current schema and widths.
    ///
    /// Returns `None` when `id` is dynamic and its schema entry is not
    /// available; the caller skips the column until it is. While the schema
    /// itself is still loading, a previously memoized definition is reused.
    pub fn resolve(
        &mut self,
        id: &str,
        schema: &Loadable<SchemaMap>,
        widths: &ColumnWidths,
    ) -> Option<&ColumnDef> {
        let width = widths.get(id);

        let entry = if builtin::is_builtin(id) {
            None
        } else {
            match schema {
                Loadable::Loaded(map) => match map.get(id) {
                    Some(entry) => Some(entry),
                    None => {
                        trace!("ColumnResolver: no schema entry for '{}'", id);
                        return None;
                    }
                },
                Loadable::NotLoaded => {
                    if let Some(def) = self.memo.get_mut(id) {
                        def.width = width;
                    }
                    return self.memo.get(id);
                }
            }
        };

        let stale = match self.memo.get_mut(id) {
            Some(def) if def.source.as_ref() == entry => {
                if def.width != width {
                    def.width = width;
                }
                false
            }
            _ => true,
        };

        if stale {
            let def = match entry {
                Some(entry) => schema_definition(entry, width),
                None => builtin::definition(id, width)?,
            };
            debug!("ColumnResolver: built definition for '{}'", id);
            self.memo.insert(id.to_string(), def);
        }
        self.memo.get(id)
    }

    /// Previously resolved definition, without consulting the schema.
    pub fn definition(&self, id: &str) -> Option<&ColumnDef> {
        self.memo.get(id)
    }

    /// Update a cached width in place. Returns false if `id` is not cached
    /// or already has that width.
    pub fn update_width(&mut self, id: &str, width: u32) -> bool {
        match self.memo.get_mut(id) {
            Some(def) if def.width != width => {
                def.width = width;
                true
            }
            _ => false,
        }
    }

    /// Drop every cached definition (full schema list or theme changed).
    pub fn reset(&mut self) {
        debug!("ColumnResolver: reset ({} definitions)", self.memo.len());
        self.memo.clear();
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}
