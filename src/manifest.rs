//! Bundle manifest (main.json) reading
//!
//! The manifest is parsed into a generic [`ManifestDocument`] first; [`Manifest`]
//! then extracts the two fields the launcher interprets. Other fields are ignored.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::bundle::BundlePath;
use crate::config::BundleLayout;
use crate::error::{Result, manifest};

/// Parsed manifest as a generic key/value document
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl ManifestDocument {
    /// Parse manifest text. The top level must be a JSON object.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| manifest::parse_failed(path.display().to_string(), e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self {
                path: path.to_path_buf(),
                fields,
            }),
            other => Err(manifest::parse_failed(
                path.display().to_string(),
                format!("expected a JSON object, found {}", value_kind(&other)),
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// String value of `key`, or `None` if absent or not a string
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// String elements of the array at `key`, or `None` if absent or not an array.
    ///
    /// Non-string elements are skipped with a warning.
    pub fn string_array_field(&self, key: &str) -> Option<Vec<String>> {
        let items = self.fields.get(key)?.as_array()?;
        let strings = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item.as_str() {
                Some(s) => Some(s.to_string()),
                None => {
                    tracing::warn!(
                        manifest = %self.path.display(),
                        field = key,
                        index,
                        "Skipping non-string {} element",
                        value_kind(item)
                    );
                    None
                }
            })
            .collect();
        Some(strings)
    }

    fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// The fields of a manifest the launcher uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Executable path relative to the bundle's binary directory
    pub executable: String,
    /// Raw `KEY=VALUE` declarations, in manifest order
    pub env_vars: Vec<String>,
}

impl Manifest {
    /// Read and parse the manifest at the root of `bundle`.
    pub fn load(bundle: &BundlePath, layout: &BundleLayout) -> Result<Self> {
        let path = bundle.join(layout.manifest_file);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| manifest::read_failed(path.display().to_string(), e.to_string()))?;
        let document = ManifestDocument::parse(&path, &content)?;
        Self::from_document(&document, layout)
    }

    /// Extract the executable name and declarations from a parsed document.
    pub fn from_document(document: &ManifestDocument, layout: &BundleLayout) -> Result<Self> {
        let manifest_path = document.path().display().to_string();

        let executable = document
            .string_field(layout.exe_field)
            .ok_or_else(|| manifest::missing_field(&manifest_path, layout.exe_field))?;

        let env_vars = match document.string_array_field(layout.env_field) {
            Some(env_vars) => env_vars,
            None => {
                if document.contains(layout.env_field) {
                    tracing::warn!(
                        manifest = %manifest_path,
                        field = layout.env_field,
                        "Field is not an array, no variables declared"
                    );
                } else {
                    tracing::debug!(manifest = %manifest_path, "No environment declarations");
                }
                Vec::new()
            }
        };

        Ok(Self {
            executable: executable.to_string(),
            env_vars,
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
