//! Tuning parameters and their persisted table.
//!
//! Every configurable knob of the engine lives under a dotted name such as
//! `"Leg/MaxMovement"`. A knob is either a fixed constant or a bounded range
//! that the tuning harness may sweep.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PersistenceError};

/// Tolerance when checking a value against range bounds.
const BOUND_EPSILON: f64 = 1e-9;

/// A single configurable value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Parameter {
    /// Fixed value, never changed by tuning.
    Constant { value: f64 },
    /// Value searchable in `min..=max` by `step`.
    Range {
        value: f64,
        min: f64,
        max: f64,
        step: f64,
    },
}

impl Parameter {
    pub fn constant(value: f64) -> Self {
        Parameter::Constant { value }
    }

    pub fn range(value: f64, min: f64, max: f64, step: f64) -> Self {
        debug_assert!(min <= value && value <= max, "default outside its range");
        Parameter::Range {
            value,
            min,
            max,
            step,
        }
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        match *self {
            Parameter::Constant { value } | Parameter::Range { value, .. } => value,
        }
    }

    /// Try to change the value. Constants refuse; ranges accept values within bounds.
    pub fn set_value(&mut self, new_value: f64) -> bool {
        match self {
            Parameter::Constant { .. } => false,
            Parameter::Range {
                value, min, max, ..
            } => {
                if new_value >= *min - BOUND_EPSILON && new_value <= *max + BOUND_EPSILON {
                    *value = new_value;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Discretized search values (`min..=max` by `step`), empty for constants.
    pub fn steps(&self) -> Vec<f64> {
        match *self {
            Parameter::Constant { .. } => Vec::new(),
            Parameter::Range { min, max, step, .. } => {
                if step <= 0.0 {
                    return vec![min];
                }
                let count = ((max - min) / step + BOUND_EPSILON).floor() as usize;
                (0..=count).map(|i| min + step * i as f64).collect()
            }
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Parameter::Range { .. })
    }
}

/// Ordered name → parameter mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable {
    entries: BTreeMap<String, Parameter>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value of `name`, inserting `default` when the key is absent.
    pub fn value_or_insert(&mut self, name: &str, default: Parameter) -> f64 {
        self.entries
            .entry(name.to_string())
            .or_insert(default)
            .value()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.get(name)
    }

    /// Replace (or add) a parameter, returning the previous one.
    pub fn insert(&mut self, name: &str, parameter: Parameter) -> Option<Parameter> {
        self.entries.insert(name.to_string(), parameter)
    }

    /// Change the value of an existing parameter.
    ///
    /// Returns false when the key is unknown, names a constant, or the value
    /// is outside the range.
    pub fn set_value(&mut self, name: &str, value: f64) -> bool {
        self.entries
            .get_mut(name)
            .is_some_and(|parameter| parameter.set_value(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load a table from `path`.
    ///
    /// A missing file yields `Ok(None)`, meaning there is no prior state.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        load_json(path)
    }

    /// Write the table to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        save_json(path, self)
    }
}

/// Read a JSON document, mapping a missing file to `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `value` as pretty JSON, creating the parent directory if needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
