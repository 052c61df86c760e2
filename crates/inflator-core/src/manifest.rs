//! Rendered manifest helpers
//!
//! `kustomize build` and `sops -d` both emit multi-document YAML streams.
//! These helpers split such streams into documents and read the handful of
//! fields the collectors care about.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;

use crate::{Error, Result};

/// Data key holding a fragment's values document.
pub const VALUES_KEY: &str = "values.yaml";

/// Placeholder name for objects without `metadata.name`.
pub const UNNAMED: &str = "<no-name>";

/// Anything outside printable ASCII, tab, and line breaks.
static NON_PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x09\x0A\x0D\x20-\x7E]").unwrap());

/// Split a multi-document YAML stream, dropping empty documents.
pub fn parse_documents(source: &str) -> Result<Vec<Value>> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(source) {
        let value = Value::deserialize(document).map_err(|e| Error::Manifest {
            message: e.to_string(),
        })?;
        if !value.is_null() {
            docs.push(value);
        }
    }
    Ok(docs)
}

/// The `kind` of an object document.
pub fn kind_of(doc: &Value) -> Option<&str> {
    doc.get("kind").and_then(Value::as_str)
}

/// The `metadata.name` of an object document.
pub fn name_of(doc: &Value) -> Option<&str> {
    doc.get("metadata")
        .and_then(|meta| meta.get("name"))
        .and_then(Value::as_str)
}

/// `section[values.yaml]` of a document of the given kind, if present.
///
/// Returns the object's name alongside the raw values text.
pub fn values_fragment<'a>(doc: &'a Value, kind: &str, section: &str) -> Option<(&'a str, &'a str)> {
    if kind_of(doc) != Some(kind) {
        return None;
    }
    let raw = doc
        .get(section)
        .and_then(|data| data.get(VALUES_KEY))
        .and_then(Value::as_str)?;
    Some((name_of(doc).unwrap_or(UNNAMED), raw))
}

/// Parse a fragment's raw values text.
pub fn parse_values(source: &str) -> std::result::Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(source)
}

/// Pull the values document out of a single ConfigMap manifest.
pub fn extract_values(manifest: &str) -> Result<Value> {
    let doc: Value = serde_yaml::from_str(manifest)?;
    let raw = doc
        .get("data")
        .and_then(|data| data.get(VALUES_KEY))
        .ok_or(Error::MissingValuesKey)?;

    match raw {
        Value::String(text) => Ok(parse_values(text)?),
        // Already structured; some generators inline the document
        other => Ok(other.clone()),
    }
}

/// Render a document as YAML, keeping key order.
pub fn render_document(value: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// Drop characters helm's YAML reader may choke on.
pub fn sanitize(text: &str) -> String {
    NON_PRINTABLE.replace_all(text, "").into_owned()
}

/// Whether a merged or parsed document carries no data.
pub fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(map) => map.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(_) | Value::Tagged(_) => false,
    }
}
