//! Overlay descriptor model
//!
//! Only two keys of a `kustomization.yaml` matter here: `bases` and
//! `patchesStrategicMerge`. Everything else is carried along untouched so the
//! materializer can write the descriptor back out with only `bases` changed.

use serde_yaml::{Mapping, Value};

use inflator_fs::{NormalizedPath, find_descriptor, io};

use crate::{Error, Result};

const BASES_KEY: &str = "bases";
const PATCHES_KEY: &str = "patchesStrategicMerge";

/// A parsed descriptor file.
#[derive(Debug, Clone)]
pub struct Descriptor {
    file: NormalizedPath,
    raw: Mapping,
}

impl Descriptor {
    /// Read the descriptor of the overlay at `dir`.
    ///
    /// Fails with [`Error::NotFound`] when the directory has no descriptor.
    pub fn load(dir: &NormalizedPath) -> Result<Self> {
        let file = find_descriptor(dir).ok_or_else(|| Error::NotFound {
            path: dir.to_native(),
        })?;
        tracing::debug!(file = %file, "Using descriptor");

        let value: Value = io::read_yaml(&file)?;
        let raw = match value {
            Value::Mapping(raw) => raw,
            // An empty file parses as null
            Value::Null => Mapping::new(),
            other => {
                return Err(inflator_fs::Error::Yaml {
                    path: file.to_native(),
                    message: format!("expected a mapping, found {}", type_name(&other)),
                }
                .into());
            }
        };

        Ok(Self { file, raw })
    }

    /// Base reference strings in declared order.
    ///
    /// A missing or non-sequence `bases` value yields nothing; non-string
    /// entries are skipped with a warning.
    pub fn bases(&self) -> Vec<String> {
        self.string_list(BASES_KEY)
    }

    /// Literal patch texts from `patchesStrategicMerge`.
    ///
    /// Entries naming patch files rather than inlining them are returned as
    /// well; callers only look inside them for marker text.
    pub fn patches_strategic_merge(&self) -> Vec<String> {
        self.string_list(PATCHES_KEY)
    }

    /// Replace the `bases` list, keeping its position among the other keys.
    pub fn set_bases(&mut self, bases: Vec<String>) {
        let list = bases.into_iter().map(Value::String).collect();
        self.raw
            .insert(Value::String(BASES_KEY.to_string()), Value::Sequence(list));
    }

    /// Render the descriptor as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.raw)?)
    }

    /// Write the descriptor as `kustomization.yaml` inside `dir`.
    pub fn write_to(&self, dir: &NormalizedPath) -> Result<NormalizedPath> {
        let target = dir.join(inflator_fs::OverlayPath::Descriptor.as_str());
        io::write_text(&target, &self.to_yaml()?)?;
        Ok(target)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        let Some(Value::Sequence(items)) = self.raw.get(key) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    tracing::warn!(
                        file = %self.file,
                        key,
                        entry = ?other,
                        "Skipping non-string entry"
                    );
                    None
                }
            })
            .collect()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
