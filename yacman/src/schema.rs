//! Schema validation for configuration documents.
//!
//! Schemas are YAML (or JSON) documents in JSON Schema form. Validation is
//! delegated to the `jsonschema` crate; the draft is taken from the
//! schema's `$schema` keyword and defaults to the latest one. As with most
//! validators, `format` is an annotation and is not asserted.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::codec;
use crate::error::{Error, Result};
use crate::path::absolutize;

/// A loaded validation schema.
///
/// # Examples
///
/// ```
/// use serde_yaml::Mapping;
/// use yacman::Schema;
///
/// let schema = Schema::from_yaml_str("type: object\nrequired: [x]\n").unwrap();
///
/// let mut data = Mapping::new();
/// assert!(schema.validate(&data).is_err());
/// data.insert("x".into(), 5.into());
/// schema.validate(&data).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    document: Value,
}

impl Schema {
    /// Wrap an already-parsed schema document.
    ///
    /// The document is not compiled until [`Schema::validate`] runs.
    #[must_use]
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    /// Parse a schema from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a YAML mapping, or
    /// [`Error::InvalidSchema`] if it is not a valid JSON Schema.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let schema = Self::from_value(Value::Mapping(codec::load_str(text)?));
        schema.compile()?;
        Ok(schema)
    }

    /// Load a schema from a local path or a URL.
    ///
    /// Local paths have `~` and environment variables expanded first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if a local schema does not exist,
    /// [`Error::InvalidSchema`] if the document is not a valid JSON Schema,
    /// or any loading error from the codec.
    pub fn load(source: &str) -> Result<Self> {
        let document = if codec::is_url(source) {
            codec::load_url(source)?
        } else {
            let path = absolutize(Path::new(source))?;
            if !path.exists() {
                return Err(Error::FileNotFound { path });
            }
            codec::load_path(&path)?
        };
        let schema = Self::from_value(Value::Mapping(document));
        schema.compile()?;
        log::debug!("Loaded schema from {source}");
        Ok(schema)
    }

    /// The raw schema document.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Check `data` against this schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaValidation`] describing the first violation,
    /// or [`Error::InvalidSchema`] if the schema does not compile.
    pub fn validate(&self, data: &Mapping) -> Result<()> {
        let validator = self.compile()?;
        let instance = to_json(&Value::Mapping(data.clone())).map_err(|e| {
            Error::SchemaValidation {
                path: "/".to_string(),
                message: format!("data cannot be represented as JSON: {e}"),
            }
        })?;

        let first = validator.iter_errors(&instance).next().map(|error| {
            let path = error.instance_path.to_string();
            (path, error.to_string())
        });
        match first {
            None => Ok(()),
            Some((path, message)) => Err(Error::SchemaValidation {
                path: if path.is_empty() { "/".to_string() } else { path },
                message,
            }),
        }
    }

    fn compile(&self) -> Result<jsonschema::Validator> {
        let document = to_json(&self.document).map_err(|e| Error::InvalidSchema {
            message: e.to_string(),
        })?;
        jsonschema::validator_for(&document).map_err(|e| Error::InvalidSchema {
            message: e.to_string(),
        })
    }
}

fn to_json(value: &Value) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(value)
}
